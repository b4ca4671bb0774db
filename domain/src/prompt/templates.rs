//! Prompt templates for the reasoning loop.

use crate::core::budget::TOOL_RESULT_TRANSCRIPT_CHARS;
use crate::core::string::truncate;

/// Templates for each turn of the plan/act/observe loop
pub struct ReasoningPrompt;

impl ReasoningPrompt {
    /// System prompt for a planning call.
    ///
    /// Carries the available tool names and a bounded preview of the
    /// evidence gathered so far, plus the JSON reply contract the plan
    /// parser expects.
    pub fn system(tools: &[String], evidence_preview: &str) -> String {
        let tool_list = if tools.is_empty() {
            "(none)".to_string()
        } else {
            tools.join(", ")
        };

        let evidence_section = if evidence_preview.is_empty() {
            "No evidence has been gathered yet.".to_string()
        } else {
            format!("Evidence gathered so far:\n\n{}", evidence_preview)
        };

        format!(
            r#"You are a revenue-intelligence analyst answering a question over CRM data.
You work iteratively: observe what you know, reason about what is missing, then pick exactly one action.

Available tools: {tool_list}

{evidence_section}

Reply with a single JSON object:
{{
  "observation": "<what you learned from the evidence so far>",
  "reasoning": "<why you chose the next action>",
  "action": "call_tool" | "synthesize_and_deliver",
  "tool_call": {{"name": "<tool>", "params": {{...}}}},
  "goal_progress": "none" | "partial" | "satisfied"
}}

Include "tool_call" only when "action" is "call_tool". Do not call a tool
you have already called with the same parameters. When the evidence answers
the question, set "action" to "synthesize_and_deliver"."#
        )
    }

    /// The seed user turn: prior context (when supplied) followed by the
    /// question itself.
    pub fn seed_question(question: &str, prior_context: Option<&str>) -> String {
        match prior_context {
            Some(context) => format!("{}\n\nCurrent question: {}", context, question),
            None => question.to_string(),
        }
    }

    /// Redirect issued when the model requests a tool call it already made.
    /// Consumes an iteration, never a tool invocation.
    pub fn duplicate_tool_redirect(tool: &str) -> String {
        format!(
            "You have already called '{}' with those parameters. Use the existing \
             evidence above, or pick a different tool or different parameters.",
            tool
        )
    }

    /// Redirect issued for the legacy run_skill action. Skills are pipeline
    /// steps; the ad-hoc loop only exposes tools.
    pub fn run_skill_redirect() -> String {
        "Skills cannot be run from here. Call the equivalent data tool instead, \
         or synthesize an answer from the evidence you already have."
            .to_string()
    }

    /// Transcript message summarizing a successful tool result, bounded so
    /// one large payload cannot crowd out the next planning call.
    pub fn tool_result_message(tool: &str, result_json: &str) -> String {
        format!(
            "Result of '{}':\n{}",
            tool,
            truncate(result_json, TOOL_RESULT_TRANSCRIPT_CHARS)
        )
    }

    /// Transcript message for a failed tool call. The failure is signal, not
    /// a stop condition.
    pub fn tool_failure_message(tool: &str, error: &str) -> String {
        format!(
            "Tool '{}' failed: {}. You may try a different tool or synthesize \
             from the evidence you already have.",
            tool,
            truncate(error, TOOL_RESULT_TRANSCRIPT_CHARS)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_lists_tools_and_contract() {
        let tools = vec!["query_deals".to_string(), "query_accounts".to_string()];
        let prompt = ReasoningPrompt::system(&tools, "");

        assert!(prompt.contains("query_deals, query_accounts"));
        assert!(prompt.contains("synthesize_and_deliver"));
        assert!(prompt.contains("No evidence has been gathered yet."));
    }

    #[test]
    fn test_system_embeds_evidence_preview() {
        let prompt = ReasoningPrompt::system(&[], "### query_deals:abc\n{\"deals\":[]}");
        assert!(prompt.contains("Evidence gathered so far:"));
        assert!(prompt.contains("### query_deals:abc"));
        assert!(prompt.contains("(none)"));
    }

    #[test]
    fn test_seed_question_with_prior_context() {
        let seeded = ReasoningPrompt::seed_question("How many deals?", Some("We spoke about Q3."));
        assert_eq!(seeded, "We spoke about Q3.\n\nCurrent question: How many deals?");

        let bare = ReasoningPrompt::seed_question("How many deals?", None);
        assert_eq!(bare, "How many deals?");
    }

    #[test]
    fn test_tool_result_message_is_bounded() {
        let huge = "x".repeat(TOOL_RESULT_TRANSCRIPT_CHARS * 3);
        let message = ReasoningPrompt::tool_result_message("query_deals", &huge);
        assert!(message.len() < TOOL_RESULT_TRANSCRIPT_CHARS + 100);
        assert!(message.ends_with("..."));
    }

    #[test]
    fn test_redirects_name_the_tool() {
        let redirect = ReasoningPrompt::duplicate_tool_redirect("query_deals");
        assert!(redirect.contains("'query_deals'"));
        assert!(ReasoningPrompt::run_skill_redirect().contains("tool"));
    }
}
