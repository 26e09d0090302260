use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::AnnadataError;

/// Raw model output returned by a provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    pub metadata: GenerationMetadata,
}

/// Metadata about how a generation was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Which provider produced this response.
    pub provider_used: String,
    /// Token count (if available from the provider).
    pub tokens_used: Option<u64>,
    /// Wall-clock processing time in milliseconds.
    pub processing_time_ms: u64,
    /// Model identifier (if applicable).
    pub model: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl Default for GenerationMetadata {
    fn default() -> Self {
        Self {
            provider_used: String::new(),
            tokens_used: None,
            processing_time_ms: 0,
            model: None,
            generated_at: Utc::now(),
        }
    }
}

impl Generation {
    /// Decode the text as JSON into `T`.
    ///
    /// Tolerates a surrounding markdown code fence, which some models emit
    /// even in JSON mode. Empty output is an error.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AnnadataError> {
        let body = strip_code_fence(&self.text);
        if body.is_empty() {
            return Err(AnnadataError::Provider(format!(
                "{}: empty model output",
                self.metadata.provider_used
            )));
        }
        Ok(serde_json::from_str(body)?)
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening fence line.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Out {
        query: String,
    }

    fn generation(text: &str) -> Generation {
        Generation {
            text: text.to_string(),
            metadata: GenerationMetadata {
                provider_used: "mock".into(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_json_plain() {
        let out: Out = generation(r#"{"query":"tomatoes"}"#).json().unwrap();
        assert_eq!(out.query, "tomatoes");
    }

    #[test]
    fn test_json_fenced() {
        let out: Out = generation("```json\n{\"query\":\"onions\"}\n```").json().unwrap();
        assert_eq!(out.query, "onions");
    }

    #[test]
    fn test_json_empty_is_provider_error() {
        let err = generation("   ").json::<Out>().unwrap_err();
        assert!(matches!(err, AnnadataError::Provider(_)));
        assert!(err.to_string().contains("empty model output"));
    }

    #[test]
    fn test_json_malformed_is_serialization_error() {
        let err = generation("not json").json::<Out>().unwrap_err();
        assert!(matches!(err, AnnadataError::Serialization(_)));
    }
}
