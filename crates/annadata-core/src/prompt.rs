use serde::{Deserialize, Serialize};

/// Inline binary media attached to a prompt (e.g. recorded audio).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPart {
    /// MIME type, e.g. `audio/webm`.
    pub mime_type: String,
    /// Base64-encoded payload.
    pub data: String,
}

/// A single-shot structured-output request passed to a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    /// System instruction sent alongside the user text.
    pub system: String,
    /// The rendered prompt text.
    pub text: String,
    /// Media parts sent after the text, in order.
    #[serde(default)]
    pub media: Vec<MediaPart>,
    /// JSON schema the response must conform to. `None` = free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<serde_json::Value>,
    /// Override the provider's default model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Prompt {
    /// Create a prompt with just user text and the default system instruction.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            system: default_system_instruction(),
            text: text.into(),
            media: Vec::new(),
            output_schema: None,
            model: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    pub fn with_media(mut self, media: MediaPart) -> Self {
        self.media.push(media);
        self
    }

    /// Request structured JSON output matching `schema`.
    pub fn with_output_schema(mut self, schema: serde_json::Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Whether the provider must return JSON.
    pub fn expects_json(&self) -> bool {
        self.output_schema.is_some()
    }
}

fn default_system_instruction() -> String {
    "You are an agricultural assistant for Annadata Connect, a marketplace that \
     connects Indian farmers directly with consumers. Answer practically and concisely."
        .to_string()
}
