use annadata_core::{error::AnnadataError, prompt::Prompt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Advisory;
use crate::schema::{object_schema, require_text, string_schema, Validate};

const FALLBACK_CROPS: &str = "Personalized crop recommendations are currently unavailable. \
Please consult your local agricultural extension office for guidance suited to your region and soil.";

/// Crop suggestions for a region and its soil.
pub struct CropAdvisory;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropAdvisoryInput {
    pub region: String,
    pub soil_conditions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropAdvisoryOutput {
    pub suggested_crops: String,
}

impl Validate for CropAdvisoryInput {
    fn validate(&self) -> Result<(), AnnadataError> {
        require_text("region", &self.region)?;
        require_text("soilConditions", &self.soil_conditions)
    }
}

impl Validate for CropAdvisoryOutput {
    fn validate(&self) -> Result<(), AnnadataError> {
        require_text("suggestedCrops", &self.suggested_crops)
    }
}

impl Advisory for CropAdvisory {
    const NAME: &'static str = "crop_advisory";

    type Input = CropAdvisoryInput;
    type Output = CropAdvisoryOutput;

    fn prompt(input: &CropAdvisoryInput) -> Result<Prompt, AnnadataError> {
        let text = format!(
            "You are an agricultural expert advising small farmers in India.\n\
             Suggest the crops best suited to the region and soil described below. \
             For each crop give one line on why it fits and the sowing season.\n\n\
             Region: {}\n\
             Soil conditions: {}\n\n\
             Put the full recommendation as readable text in `suggestedCrops`.",
            input.region.trim(),
            input.soil_conditions.trim()
        );
        Ok(Prompt::new(text).with_output_schema(Self::output_schema()))
    }

    fn output_schema() -> Value {
        object_schema(vec![(
            "suggestedCrops",
            string_schema("Recommended crops with a short reason for each"),
        )])
    }

    fn fallback() -> CropAdvisoryOutput {
        CropAdvisoryOutput {
            suggested_crops: FALLBACK_CROPS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(region: &str, soil: &str) -> CropAdvisoryInput {
        CropAdvisoryInput {
            region: region.into(),
            soil_conditions: soil.into(),
        }
    }

    #[test]
    fn test_prompt_interpolates_fields() {
        let prompt = CropAdvisory::prompt(&input(" Punjab ", "alluvial, well drained")).unwrap();
        assert!(prompt.text.contains("Region: Punjab\n"));
        assert!(prompt.text.contains("Soil conditions: alluvial, well drained"));
        assert_eq!(prompt.output_schema, Some(CropAdvisory::output_schema()));
        assert!(prompt.media.is_empty());
    }

    #[test]
    fn test_input_validation() {
        assert!(input("Punjab", "loam").validate().is_ok());
        assert!(input("", "loam").validate().is_err());
        let err = input("Punjab", " ").validate().unwrap_err();
        assert!(err.to_string().contains("soilConditions"));
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(input("Kerala", "laterite")).unwrap();
        assert_eq!(json["soilConditions"], "laterite");
        let out: CropAdvisoryOutput =
            serde_json::from_str(r#"{"suggestedCrops":"Rice, coconut"}"#).unwrap();
        assert_eq!(out.suggested_crops, "Rice, coconut");
    }

    #[test]
    fn test_fallback_is_valid() {
        let fb = CropAdvisory::fallback();
        assert!(fb.validate().is_ok());
        assert!(fb
            .suggested_crops
            .starts_with("Personalized crop recommendations are currently unavailable"));
    }
}
