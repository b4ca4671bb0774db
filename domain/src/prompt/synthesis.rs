//! Synthesis prompts: the final LLM call of either core.

use crate::core::budget::{COMBINED_BLOCK_ENTRY_CHARS, NAMED_PLACEHOLDER_CHARS};
use crate::core::string::truncate;

/// Templates and template rendering for synthesis calls
pub struct SynthesisPrompt;

impl SynthesisPrompt {
    /// System prompt for the reasoning loop's synthesis pass.
    pub fn loop_system() -> &'static str {
        r#"You are a revenue-intelligence analyst writing the final answer to a question.
You are given the question and the evidence gathered while investigating it.
Answer directly and concretely, citing figures from the evidence.
If some evidence entries are marked as failed, answer from what succeeded and
say what could not be verified. Do not invent data."#
    }

    /// User message for the loop's synthesis pass: the original question
    /// plus every evidence entry (each already character-capped).
    pub fn loop_user(question: &str, evidence_block: &str) -> String {
        if evidence_block.is_empty() {
            format!(
                "Question: {}\n\nNo evidence was gathered. Answer from general \
                 knowledge of the domain and say that no data was consulted.",
                question
            )
        } else {
            format!("Question: {}\n\nEvidence:\n\n{}", question, evidence_block)
        }
    }

    /// Render a pipeline synthesis template.
    ///
    /// Each step's serialized output replaces its named `{{output_key}}`
    /// placeholder, capped at [`NAMED_PLACEHOLDER_CHARS`]. The combined
    /// `{{skill_outputs}}` placeholder receives every output, each entry
    /// capped at the tighter [`COMBINED_BLOCK_ENTRY_CHARS`] since the
    /// catch-all block carries all steps at once.
    pub fn render_pipeline_template(template: &str, outputs: &[(String, String)]) -> String {
        let mut rendered = template.to_string();

        for (key, output) in outputs {
            let placeholder = format!("{{{{{}}}}}", key);
            if rendered.contains(&placeholder) {
                rendered = rendered.replace(&placeholder, &truncate(output, NAMED_PLACEHOLDER_CHARS));
            }
        }

        if rendered.contains("{{skill_outputs}}") {
            let combined = outputs
                .iter()
                .map(|(key, output)| {
                    format!("### {}\n{}", key, truncate(output, COMBINED_BLOCK_ENTRY_CHARS))
                })
                .collect::<Vec<_>>()
                .join("\n\n");
            rendered = rendered.replace("{{skill_outputs}}", &combined);
        }

        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_user_includes_question_and_evidence() {
        let message = SynthesisPrompt::loop_user("How many deals?", "### k\n{\"deals\":[]}");
        assert!(message.starts_with("Question: How many deals?"));
        assert!(message.contains("### k"));
    }

    #[test]
    fn test_loop_user_without_evidence() {
        let message = SynthesisPrompt::loop_user("How many deals?", "");
        assert!(message.contains("No evidence was gathered"));
    }

    #[test]
    fn test_named_placeholders_substituted() {
        let rendered = SynthesisPrompt::render_pipeline_template(
            "Health: {{health}}\nRisk: {{risk}}",
            &[
                ("health".to_string(), "{\"score\":0.9}".to_string()),
                ("risk".to_string(), "{\"at_risk\":3}".to_string()),
            ],
        );
        assert_eq!(rendered, "Health: {\"score\":0.9}\nRisk: {\"at_risk\":3}");
    }

    #[test]
    fn test_combined_block_substituted() {
        let rendered = SynthesisPrompt::render_pipeline_template(
            "Report over:\n{{skill_outputs}}",
            &[
                ("health".to_string(), "H".to_string()),
                ("risk".to_string(), "R".to_string()),
            ],
        );
        assert!(rendered.contains("### health\nH"));
        assert!(rendered.contains("### risk\nR"));
    }

    #[test]
    fn test_unused_outputs_and_unknown_placeholders_left_alone() {
        let rendered = SynthesisPrompt::render_pipeline_template(
            "Only {{health}} and {{unknown}}",
            &[
                ("health".to_string(), "H".to_string()),
                ("risk".to_string(), "R".to_string()),
            ],
        );
        assert_eq!(rendered, "Only H and {{unknown}}");
    }

    #[test]
    fn test_named_budget_looser_than_combined_budget() {
        let big = "z".repeat(NAMED_PLACEHOLDER_CHARS * 2);
        let rendered = SynthesisPrompt::render_pipeline_template(
            "{{out}}\n---\n{{skill_outputs}}",
            &[("out".to_string(), big)],
        );

        let (named, combined) = rendered.split_once("\n---\n").unwrap();
        assert!(named.len() <= NAMED_PLACEHOLDER_CHARS);
        assert!(named.len() > COMBINED_BLOCK_ENTRY_CHARS);
        // combined entry carries the "### out\n" header plus the tighter cap
        assert!(combined.len() <= COMBINED_BLOCK_ENTRY_CHARS + 20);
    }
}
