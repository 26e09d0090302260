use annadata_core::{
    error::AnnadataError,
    prompt::{MediaPart, Prompt},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Advisory;
use crate::schema::{object_schema, require_text, string_schema, Validate};

const FALLBACK_QUERY: &str = "fresh vegetables";

/// Turns a recorded voice query into a text search query.
pub struct VoiceSearch;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSearchInput {
    /// `data:<mime>;base64,<payload>` with an `audio/*` MIME type.
    pub audio_data_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceSearchOutput {
    pub query: String,
}

/// Split an audio data URI into a media part, checking the payload decodes.
pub(crate) fn parse_audio_data_uri(uri: &str) -> Result<MediaPart, AnnadataError> {
    let invalid = |why: &str| AnnadataError::Validation(format!("audioDataUri {why}"));

    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| invalid("must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| invalid("is missing the ',' separator"))?;
    let mime_and_params = meta
        .strip_suffix(";base64")
        .ok_or_else(|| invalid("must be base64 encoded"))?;
    // Drop parameters such as `;codecs=opus`.
    let mime = mime_and_params.split(';').next().unwrap_or_default().trim();
    if !mime.starts_with("audio/") || mime.len() <= "audio/".len() {
        return Err(invalid(&format!("has non-audio MIME type '{mime}'")));
    }
    let decoded = STANDARD
        .decode(payload.trim())
        .map_err(|e| invalid(&format!("has an invalid base64 payload: {e}")))?;
    if decoded.is_empty() {
        return Err(invalid("has an empty payload"));
    }

    Ok(MediaPart {
        mime_type: mime.to_string(),
        data: payload.trim().to_string(),
    })
}

impl Validate for VoiceSearchInput {
    fn validate(&self) -> Result<(), AnnadataError> {
        require_text("audioDataUri", &self.audio_data_uri)?;
        parse_audio_data_uri(&self.audio_data_uri).map(|_| ())
    }
}

impl Validate for VoiceSearchOutput {
    fn validate(&self) -> Result<(), AnnadataError> {
        require_text("query", &self.query)
    }
}

impl Advisory for VoiceSearch {
    const NAME: &'static str = "voice_search";

    type Input = VoiceSearchInput;
    type Output = VoiceSearchOutput;

    fn prompt(input: &VoiceSearchInput) -> Result<Prompt, AnnadataError> {
        let audio = parse_audio_data_uri(&input.audio_data_uri)?;
        let text = "The attached audio is a shopper speaking a product search on a \
                    farm-produce marketplace. It may be in Hindi, English or another Indian \
                    language. Return a short English search query naming the products asked \
                    for, without filler words.";
        Ok(Prompt::new(text)
            .with_media(audio)
            .with_output_schema(Self::output_schema()))
    }

    fn output_schema() -> Value {
        object_schema(vec![(
            "query",
            string_schema("Short English search query"),
        )])
    }

    fn fallback() -> VoiceSearchOutput {
        VoiceSearchOutput {
            query: FALLBACK_QUERY.to_string(),
        }
    }
}
