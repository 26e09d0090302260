//! Google Gemini API provider.
//!
//! Calls the Gemini `generateContent` endpoint. The key travels in the
//! `x-goog-api-key` header.
//! Structured output uses `responseMimeType` + `responseSchema`; media parts
//! are sent as `inlineData`.

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

/// Keeps the key out of URLs, which end up in transport error text.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini API provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    /// Create from config values.
    pub fn from_config(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    usage_metadata: Option<GeminiUsage>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    total_token_count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Build the request body for a prompt.
fn build_request(prompt: &Prompt) -> GeminiRequest {
    let system_instruction = if prompt.system.is_empty() {
        None
    } else {
        Some(GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: Some(prompt.system.clone()),
                ..Default::default()
            }],
        })
    };

    let mut parts = vec![GeminiPart {
        text: Some(prompt.text.clone()),
        ..Default::default()
    }];
    parts.extend(prompt.media.iter().map(|m| GeminiPart {
        text: None,
        inline_data: Some(InlineData {
            mime_type: m.mime_type.clone(),
            data: m.data.clone(),
        }),
    }));

    let generation_config = prompt.output_schema.as_ref().map(|schema| GenerationConfig {
        response_mime_type: "application/json".to_string(),
        response_schema: to_gemini_schema(schema),
    });

    GeminiRequest {
        contents: vec![GeminiContent {
            role: Some("user".to_string()),
            parts,
        }],
        system_instruction,
        generation_config,
    }
}

/// Convert a JSON schema into Gemini's OpenAPI subset: upper-case `type`
/// names and no `additionalProperties`/`$schema` keys.
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                match k.as_str() {
                    "additionalProperties" | "$schema" => {}
                    "type" => {
                        let t = v.as_str().map(str::to_uppercase).map(Value::String);
                        out.insert(k.clone(), t.unwrap_or_else(|| v.clone()));
                    }
                    _ => {
                        out.insert(k.clone(), to_gemini_schema(v));
                    }
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(resp: &GeminiResponse) -> Option<String> {
    let content = resp
        .candidates
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|c| c.content.as_ref())?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn requires_api_key(&self) -> bool {
        true
    }

    async fn generate(&self, prompt: &Prompt) -> Result<Generation, AnnadataError> {
        let effective_model = prompt.model.as_deref().unwrap_or(&self.model);
        let start = Instant::now();
        let body = build_request(prompt);

        let url = format!(
            "{}/models/{effective_model}:generateContent",
            self.base_url.trim_end_matches('/')
        );
        debug!(
            "gemini: POST models/{effective_model}:generateContent json={}",
            prompt.expects_json()
        );

        let resp = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AnnadataError::Provider(format!("gemini request failed: {}", e.without_url()))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AnnadataError::Provider(format!(
                "gemini returned {status}: {text}"
            )));
        }

        let parsed: GeminiResponse = resp.json().await.map_err(|e| {
            AnnadataError::Provider(format!(
                "gemini: failed to parse response: {}",
                e.without_url()
            ))
        })?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(AnnadataError::Provider(format!(
                "gemini blocked the prompt: {reason}"
            )));
        }

        let text = extract_text(&parsed)
            .ok_or_else(|| AnnadataError::Provider("gemini: empty response".to_string()))?;

        let tokens = parsed.usage_metadata.as_ref().map(|u| u.total_token_count);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        Ok(Generation {
            text,
            metadata: GenerationMetadata {
                provider_used: "gemini".to_string(),
                tokens_used: tokens,
                processing_time_ms: elapsed_ms,
                model: Some(effective_model.to_string()),
                generated_at: Utc::now(),
            },
        })
    }

    async fn is_available(&self) -> bool {
        if self.api_key.is_empty() {
            warn!("gemini: no API key configured");
            return false;
        }
        let url = format!("{}/models", self.base_url.trim_end_matches('/'));
        match self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("gemini not available: {}", e.without_url());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annadata_core::prompt::MediaPart;
    use serde_json::json;

    #[test]
    fn test_gemini_provider_name() {
        let p = GeminiProvider::from_config(
            "AIza-test".into(),
            "gemini-2.0-flash".into(),
            "https://generativelanguage.googleapis.com/v1beta".into(),
        );
        assert_eq!(p.name(), "gemini");
        assert!(p.requires_api_key());
    }

    #[test]
    fn test_gemini_request_serialization() {
        let prompt = Prompt::new("Hello").with_system("Be helpful.");
        let json = serde_json::to_value(build_request(&prompt)).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Be helpful.");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello");
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn test_gemini_request_no_system() {
        let prompt = Prompt::new("Hello").with_system("");
        let json = serde_json::to_value(build_request(&prompt)).unwrap();
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn test_gemini_request_structured_output_and_media() {
        let prompt = Prompt::new("Transcribe")
            .with_media(MediaPart {
                mime_type: "audio/webm".into(),
                data: "UklGRg==".into(),
            })
            .with_output_schema(json!({
                "type": "object",
                "additionalProperties": false,
                "properties": {"query": {"type": "string"}},
                "required": ["query"]
            }));
        let json = serde_json::to_value(build_request(&prompt)).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "Transcribe");
        assert!(parts[0].get("inlineData").is_none());
        assert_eq!(parts[1]["inlineData"]["mimeType"], "audio/webm");
        assert_eq!(parts[1]["inlineData"]["data"], "UklGRg==");
        assert!(parts[1].get("text").is_none());

        let config = &json["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["type"], "OBJECT");
        assert_eq!(
            config["responseSchema"]["properties"]["query"]["type"],
            "STRING"
        );
        assert!(config["responseSchema"].get("additionalProperties").is_none());
        assert_eq!(config["responseSchema"]["required"][0], "query");
    }

    #[test]
    fn test_gemini_response_parsing() {
        let json = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"query\":"},{"text":"\"rice\"}"}]}}],"usageMetadata":{"totalTokenCount":25}}"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(&resp), Some(r#"{"query":"rice"}"#.into()));
        assert_eq!(
            resp.usage_metadata.as_ref().map(|u| u.total_token_count),
            Some(25)
        );
    }

    #[test]
    fn test_gemini_response_without_candidates() {
        let json = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(extract_text(&resp).is_none());
        assert_eq!(
            resp.prompt_feedback.and_then(|f| f.block_reason),
            Some("SAFETY".into())
        );
    }

    #[tokio::test]
    async fn test_gemini_unreachable_is_provider_error() {
        let p = GeminiProvider::from_config(
            "AIza-test".into(),
            "gemini-2.0-flash".into(),
            "http://127.0.0.1:9".into(),
        );
        let err = p.generate(&Prompt::new("hi")).await.unwrap_err();
        assert!(matches!(err, AnnadataError::Provider(_)));
    }

    #[tokio::test]
    async fn test_gemini_transport_error_hides_api_key() {
        let p = GeminiProvider::from_config(
            "AIza-SECRET".into(),
            "m".into(),
            "http://127.0.0.1:9".into(),
        );
        let err = p.generate(&Prompt::new("crops?")).await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("gemini request failed"), "{text}");
        assert!(!text.contains("AIza-SECRET"), "{text}");
        assert!(!text.contains("key="), "{text}");
    }

    #[tokio::test]
    async fn test_gemini_unavailable_without_key() {
        let p = GeminiProvider::from_config(
            String::new(),
            "gemini-2.0-flash".into(),
            "http://127.0.0.1:9".into(),
        );
        assert!(!p.is_available().await);
    }
}
