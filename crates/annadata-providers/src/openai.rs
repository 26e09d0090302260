//! OpenAI-compatible API provider.
//!
//! Works with OpenAI's API and any compatible endpoint. Structured output is
//! requested through `response_format` with a JSON schema.

use annadata_core::{
    error::AnnadataError,
    generation::{Generation, GenerationMetadata},
    prompt::Prompt,
    traits::Provider,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

/// OpenAI-compatible provider.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    /// Create from config values.
    pub fn from_config(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
    pub json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
pub(crate) struct JsonSchemaFormat {
    pub name: String,
    pub schema: Value,
}

#[derive(Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub model: Option<String>,
    pub usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
pub(crate) struct ChatChoice {
    pub message: Option<ReplyMessage>,
    pub finish_reason: Option<String>,
}

/// Assistant reply. Under structured output `content` is null when the model
/// refuses, with the reason in `refusal`.
#[derive(Deserialize)]
pub(crate) struct ReplyMessage {
    pub content: Option<String>,
    pub refusal: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct ChatUsage {
    pub total_tokens: Option<u64>,
}

impl ChatCompletionResponse {
    /// Text of the first choice. Refusals, truncated JSON and blank replies
    /// are errors.
    pub(crate) fn answer(&self) -> Result<String, AnnadataError> {
        let choice = self
            .choices
            .first()
            .ok_or_else(|| AnnadataError::Provider("openai: no choices".to_string()))?;
        let message = choice
            .message
            .as_ref()
            .ok_or_else(|| AnnadataError::Provider("openai: choice has no message".to_string()))?;

        if let Some(refusal) = message.refusal.as_deref().filter(|r| !r.is_empty()) {
            return Err(AnnadataError::Provider(format!("openai refused: {refusal}")));
        }
        if choice.finish_reason.as_deref() == Some("length") {
            return Err(AnnadataError::Provider(
                "openai: output truncated at the token limit".to_string(),
            ));
        }
        message
            .content
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AnnadataError::Provider("openai: empty response".to_string()))
    }
}

/// Build OpenAI-format messages from a prompt (system as a message role).
pub(crate) fn build_openai_messages(prompt: &Prompt) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if !prompt.system.is_empty() {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: prompt.system.clone(),
        });
    }
    messages.push(ChatMessage {
        role: "user".to_string(),
        content: prompt.text.clone(),
    });
    messages
}

fn build_request(prompt: &Prompt, model: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: build_openai_messages(prompt),
        response_format: prompt.output_schema.as_ref().map(|schema| ResponseFormat {
            kind: "json_schema".to_string(),
            json_schema: JsonSchemaFormat {
                name: "advisory_output".to_string(),
                schema: schema.clone(),
            },
        }),
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn requires_api_key(&self) -> bool {
        true
    }

    async fn generate(&self, prompt: &Prompt) -> Result<Generation, AnnadataError> {
        if !prompt.media.is_empty() {
            return Err(AnnadataError::Provider(
                "openai: inline media parts are not supported by this endpoint".to_string(),
            ));
        }

        let effective_model = prompt.model.as_deref().unwrap_or(&self.model);
        let start = Instant::now();
        let body = build_request(prompt, effective_model);

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!(
            "openai: POST {url} model={effective_model} json={}",
            prompt.expects_json()
        );

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AnnadataError::Provider(format!("openai request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AnnadataError::Provider(format!(
                "openai returned {status}: {text}"
            )));
        }

        let parsed: ChatCompletionResponse = resp.json().await.map_err(|e| {
            AnnadataError::Provider(format!("openai: failed to parse response: {e}"))
        })?;

        let text = parsed.answer()?;
        Ok(Generation {
            text,
            metadata: GenerationMetadata {
                provider_used: "openai".to_string(),
                tokens_used: parsed.usage.as_ref().and_then(|u| u.total_tokens),
                processing_time_ms: start.elapsed().as_millis() as u64,
                model: parsed.model.or_else(|| Some(effective_model.to_string())),
                generated_at: Utc::now(),
            },
        })
    }

    async fn is_available(&self) -> bool {
        if self.api_key.is_empty() {
            warn!("openai: no API key configured");
            return false;
        }
        let url = format!("{}/models", self.base_url.trim_end_matches('/'));
        match self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("openai: {url} unreachable: {e}");
                false
            }
        }
    }
}
