//! Advisory variants. Each pairs a prompt template with declared input and
//! output schemas and a canned fallback.

mod crop;
mod guide;
mod voice;
mod weather;

pub use crop::{CropAdvisory, CropAdvisoryInput, CropAdvisoryOutput};
pub use guide::{Guide, GuideGeneration, GuideInput, GuideSection};
pub use voice::{VoiceSearch, VoiceSearchInput, VoiceSearchOutput};
pub use weather::{WeatherAdvisory, WeatherAdvisoryInput, WeatherAdvisoryOutput};

use annadata_core::{error::AnnadataError, prompt::Prompt};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::schema::Validate;

/// One advisory variant.
pub trait Advisory {
    /// Stable variant name, used in logs and cache keys.
    const NAME: &'static str;

    type Input: Validate + Serialize + Send + Sync;
    type Output: Validate + Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Render the prompt for a validated input.
    fn prompt(input: &Self::Input) -> Result<Prompt, AnnadataError>;

    /// JSON schema the model output must follow.
    fn output_schema() -> Value;

    /// Static payload returned when the upstream call fails.
    fn fallback() -> Self::Output;
}
