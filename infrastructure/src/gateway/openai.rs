//! OpenAI-compatible chat-completions gateway.
//!
//! Works against any endpoint speaking the `/chat/completions` shape
//! (OpenAI, DeepSeek, self-hosted proxies). Each capability class maps to
//! a configured model name; the core never sees model identifiers.

use async_trait::async_trait;
use dealsense_application::ports::llm_gateway::{
    GatewayError, GenerateOptions, Generation, LlmGateway, Tracking,
};
use dealsense_domain::{Capability, Message, Role, TokenUsage};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiGatewayConfig {
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    pub api_key: String,
    /// Model used for the `reason` capability.
    pub reason_model: String,
    /// Model used for the `extract` capability.
    pub extract_model: String,
}

impl OpenAiGatewayConfig {
    fn model_for(&self, capability: Capability) -> &str {
        match capability {
            Capability::Reason => &self.reason_model,
            Capability::Extract => &self.extract_model,
        }
    }
}

/// LLM gateway adapter over an OpenAI-compatible HTTP API.
pub struct OpenAiGateway {
    client: reqwest::Client,
    config: OpenAiGatewayConfig,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

impl OpenAiGateway {
    pub fn new(config: OpenAiGatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn role_str(role: Role) -> &'static str {
        match role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn generate(
        &self,
        capability: Capability,
        system_prompt: &str,
        messages: &[Message],
        options: GenerateOptions,
        tracking: Tracking,
    ) -> Result<Generation, GatewayError> {
        let model = self.config.model_for(capability);
        let mut chat_messages = Vec::with_capacity(messages.len() + 1);
        chat_messages.push(ChatMessage {
            role: "system",
            content: system_prompt,
        });
        for message in messages {
            chat_messages.push(ChatMessage {
                role: Self::role_str(message.role),
                content: &message.content,
            });
        }

        // Provider-side usage attribution rides in the `user` field
        let user = tracking
            .run_id
            .map(|run_id| format!("{}:{}", tracking.purpose, run_id));

        let request = ChatRequest {
            model,
            messages: chat_messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            user,
        };

        debug!(%capability, model, purpose = tracking.purpose, "Calling chat completions");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "{}: {}",
                status,
                body.trim()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GatewayError::RequestFailed("response had no choices".to_string()))?;

        let usage = parsed
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(Generation { content, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OpenAiGatewayConfig {
        OpenAiGatewayConfig {
            base_url: "https://llm.internal/v1".to_string(),
            api_key: "sk-test".to_string(),
            reason_model: "gpt-4o".to_string(),
            extract_model: "gpt-4o-mini".to_string(),
        }
    }

    #[test]
    fn test_capability_model_mapping() {
        let config = config();
        assert_eq!(config.model_for(Capability::Reason), "gpt-4o");
        assert_eq!(config.model_for(Capability::Extract), "gpt-4o-mini");
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "gpt-4o",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "be brief",
                },
                ChatMessage {
                    role: "user",
                    content: "How many deals?",
                },
            ],
            max_tokens: 500,
            temperature: 0.2,
            user: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][1]["role"], "user");
        assert!(json.get("user").is_none());
    }

    #[test]
    fn test_response_deserialization() {
        let body = r#"{
            "choices": [{"message": {"content": "Jane has 12 open deals."}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 9, "total_tokens": 129}
        }"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Jane has 12 open deals.")
        );
        let usage = parsed.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 120);
        assert_eq!(usage.completion_tokens, 9);
    }

    #[test]
    fn test_response_without_usage() {
        let body = r#"{"choices": [{"message": {"content": "ok"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.usage.is_none());
    }
}
