use annadata_core::{error::AnnadataError, prompt::Prompt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Advisory;
use crate::schema::{array_schema, object_schema, require_text, string_schema, Validate};

/// Weather-driven alerts and tips for farmers and consumers.
pub struct WeatherAdvisory;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAdvisoryInput {
    pub location: String,
    /// Free-text forecast summary, e.g. "Heavy rain for 3 days, 24-29°C".
    pub forecast: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAdvisoryOutput {
    pub alerts: Vec<String>,
    pub farming_tips: String,
    pub consumer_insight: String,
}

impl Validate for WeatherAdvisoryInput {
    fn validate(&self) -> Result<(), AnnadataError> {
        require_text("location", &self.location)?;
        require_text("forecast", &self.forecast)
    }
}

impl Validate for WeatherAdvisoryOutput {
    fn validate(&self) -> Result<(), AnnadataError> {
        for (i, alert) in self.alerts.iter().enumerate() {
            require_text(&format!("alerts[{i}]"), alert)?;
        }
        require_text("farmingTips", &self.farming_tips)?;
        require_text("consumerInsight", &self.consumer_insight)
    }
}

impl Advisory for WeatherAdvisory {
    const NAME: &'static str = "weather_advisory";

    type Input = WeatherAdvisoryInput;
    type Output = WeatherAdvisoryOutput;

    fn prompt(input: &WeatherAdvisoryInput) -> Result<Prompt, AnnadataError> {
        let text = format!(
            "You advise farmers and shoppers on a farm-to-consumer marketplace.\n\
             Location: {}\n\
             Forecast: {}\n\n\
             1. List weather alerts that matter for crops or livestock (an empty list if none).\n\
             2. Give concrete farming tips for the coming days.\n\
             3. Give one consumer insight on how this weather may affect produce \
             availability, freshness or prices.",
            input.location.trim(),
            input.forecast.trim()
        );
        Ok(Prompt::new(text).with_output_schema(Self::output_schema()))
    }

    fn output_schema() -> Value {
        object_schema(vec![
            (
                "alerts",
                array_schema(string_schema("One alert"), "Weather alerts for farmers"),
            ),
            ("farmingTips", string_schema("Actionable tips for farmers")),
            (
                "consumerInsight",
                string_schema("Effect on produce availability or prices"),
            ),
        ])
    }

    fn fallback() -> WeatherAdvisoryOutput {
        WeatherAdvisoryOutput {
            alerts: Vec::new(),
            farming_tips: "Weather-based farming tips are currently unavailable. Check the \
                           local IMD bulletin before irrigating, spraying or harvesting."
                .to_string(),
            consumer_insight: "Produce availability information is currently unavailable."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_interpolates_fields() {
        let prompt = WeatherAdvisory::prompt(&WeatherAdvisoryInput {
            location: "Nashik".into(),
            forecast: "Hailstorm expected Thursday".into(),
        })
        .unwrap();
        assert!(prompt.text.contains("Location: Nashik\n"));
        assert!(prompt.text.contains("Forecast: Hailstorm expected Thursday\n"));
    }

    #[test]
    fn test_output_wire_names() {
        let out: WeatherAdvisoryOutput = serde_json::from_str(
            r#"{"alerts":["Hail Thursday"],"farmingTips":"Cover nurseries.","consumerInsight":"Grape prices may rise."}"#,
        )
        .unwrap();
        assert_eq!(out.alerts, vec!["Hail Thursday".to_string()]);
        assert!(out.validate().is_ok());
    }

    #[test]
    fn test_missing_field_fails_decode() {
        let res: Result<WeatherAdvisoryOutput, _> =
            serde_json::from_str(r#"{"alerts":[],"farmingTips":"Irrigate early."}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_blank_alert_rejected() {
        let out = WeatherAdvisoryOutput {
            alerts: vec![" ".into()],
            farming_tips: "t".into(),
            consumer_insight: "c".into(),
        };
        assert!(out.validate().is_err());
    }

    #[test]
    fn test_fallback_is_valid() {
        let fb = WeatherAdvisory::fallback();
        assert!(fb.validate().is_ok());
        assert!(fb.alerts.is_empty());
    }
}
