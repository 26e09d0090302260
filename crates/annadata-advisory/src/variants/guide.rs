use annadata_core::{error::AnnadataError, prompt::Prompt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Advisory;
use crate::schema::{array_schema, object_schema, require_text, string_schema, Validate};

/// Sectioned how-to guide on a farming topic, in a requested language.
pub struct GuideGeneration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideInput {
    pub topic: String,
    /// Language the guide is written in, e.g. "Hindi" or "en".
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideSection {
    pub heading: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guide {
    pub title: String,
    pub sections: Vec<GuideSection>,
    pub summary: String,
}

impl Validate for GuideInput {
    fn validate(&self) -> Result<(), AnnadataError> {
        require_text("topic", &self.topic)?;
        require_text("language", &self.language)
    }
}

impl Validate for Guide {
    fn validate(&self) -> Result<(), AnnadataError> {
        require_text("title", &self.title)?;
        if self.sections.is_empty() {
            return Err(AnnadataError::Validation(
                "sections must contain at least one section".to_string(),
            ));
        }
        for (i, section) in self.sections.iter().enumerate() {
            require_text(&format!("sections[{i}].heading"), &section.heading)?;
            require_text(&format!("sections[{i}].content"), &section.content)?;
        }
        require_text("summary", &self.summary)
    }
}

impl Advisory for GuideGeneration {
    const NAME: &'static str = "guide_generation";

    type Input = GuideInput;
    type Output = Guide;

    fn prompt(input: &GuideInput) -> Result<Prompt, AnnadataError> {
        let text = format!(
            "Write a practical, step-by-step guide for farmers on the topic below.\n\
             Write the entire guide in {language}.\n\
             Give it a short title, between three and six sections (each with a heading \
             and a paragraph of content), and a closing summary of two or three sentences.\n\n\
             Topic: {topic}",
            language = input.language.trim(),
            topic = input.topic.trim()
        );
        Ok(Prompt::new(text).with_output_schema(Self::output_schema()))
    }

    fn output_schema() -> Value {
        let section = object_schema(vec![
            ("heading", string_schema("Section heading")),
            ("content", string_schema("Section body")),
        ]);
        object_schema(vec![
            ("title", string_schema("Guide title")),
            ("sections", array_schema(section, "Guide sections in reading order")),
            ("summary", string_schema("Closing summary")),
        ])
    }

    fn fallback() -> Guide {
        Guide {
            title: "Guide unavailable".to_string(),
            sections: vec![GuideSection {
                heading: "We could not generate this guide".to_string(),
                content: "The guide service is temporarily unavailable. Browse the existing \
                          guides in the community section or ask a local extension officer."
                    .to_string(),
            }],
            summary: "Please try again later.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(heading: &str, content: &str) -> GuideSection {
        GuideSection {
            heading: heading.into(),
            content: content.into(),
        }
    }

    #[test]
    fn test_prompt_mentions_topic_and_language() {
        let prompt = GuideGeneration::prompt(&GuideInput {
            topic: "Drip irrigation".into(),
            language: "Hindi".into(),
        })
        .unwrap();
        assert!(prompt.text.contains("Topic: Drip irrigation"));
        assert!(prompt.text.contains("in Hindi."));
        assert!(prompt.expects_json());
    }

    #[test]
    fn test_output_schema_nests_sections() {
        let schema = GuideGeneration::output_schema();
        assert_eq!(schema["properties"]["sections"]["type"], "array");
        assert_eq!(
            schema["properties"]["sections"]["items"]["required"],
            serde_json::json!(["heading", "content"])
        );
    }

    #[test]
    fn test_output_validation() {
        let mut guide = Guide {
            title: "Composting".into(),
            sections: vec![section("Materials", "Dry leaves, cow dung.")],
            summary: "Compost improves soil.".into(),
        };
        assert!(guide.validate().is_ok());

        guide.sections[0].content = String::new();
        let err = guide.validate().unwrap_err();
        assert!(err.to_string().contains("sections[0].content"));

        guide.sections.clear();
        assert!(guide.validate().is_err());
    }

    #[test]
    fn test_fallback_is_valid() {
        let fb = GuideGeneration::fallback();
        assert!(fb.validate().is_ok());
        assert_eq!(fb.summary, "Please try again later.");
    }
}
