mod classification;
mod json;

pub use classification::{round2, Classification, Label};

use crate::error::ParserError;
use schemars::gen::SchemaSettings;
use schemars::schema::RootSchema;

/// Parse a model reply into a validated classification
///
/// Accepts bare JSON or JSON wrapped in a code fence. Unknown fields and
/// labels outside {Good, Bad, Error} are rejected; the confidence score is
/// rounded to two decimals.
pub fn parse_classification(raw: &str) -> Result<Classification, ParserError> {
    let json = json::extract_json(raw).ok_or(ParserError::NoJson)?;
    let mut parsed: Classification = serde_json::from_str(&json)?;

    if !parsed.confidence_score.is_finite() {
        return Err(ParserError::NonFiniteScore);
    }
    parsed.confidence_score = round2(parsed.confidence_score);

    Ok(parsed)
}

/// JSON Schema for the classification reply, with every subschema inlined
pub fn classification_schema() -> RootSchema {
    SchemaSettings::draft07()
        .with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        })
        .into_generator()
        .into_root_schema_for::<Classification>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direct_json() {
        let raw = r#"{"classification": "Good", "confidence_score": 0.876, "reasoning": "clean waveform"}"#;
        let parsed = parse_classification(raw).unwrap();
        assert_eq!(parsed.classification, Label::Good);
        assert_eq!(parsed.confidence_score, 0.88);
        assert_eq!(parsed.reasoning, "clean waveform");
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"classification\": \"Bad\", \"confidence_score\": 0.4, \"reasoning\": \"refractory violations\"}\n```";
        let parsed = parse_classification(raw).unwrap();
        assert_eq!(parsed.classification, Label::Bad);
    }

    #[test]
    fn test_rejects_unknown_label() {
        let raw = r#"{"classification": "Maybe", "confidence_score": 0.5, "reasoning": ""}"#;
        assert!(matches!(
            parse_classification(raw),
            Err(ParserError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_field() {
        let raw = r#"{"classification": "Good", "confidence_score": 0.5, "reasoning": "", "extra": 1}"#;
        assert!(parse_classification(raw).is_err());
    }

    #[test]
    fn test_rejects_missing_json() {
        assert!(matches!(
            parse_classification("I think it is good."),
            Err(ParserError::NoJson)
        ));
    }

    #[test]
    fn test_schema_is_strict_and_inlined() {
        let schema = serde_json::to_value(classification_schema()).unwrap();
        assert_eq!(schema["additionalProperties"], serde_json::json!(false));
        assert!(schema.get("definitions").is_none());
        let labels = &schema["properties"]["classification"]["enum"];
        assert_eq!(labels, &serde_json::json!(["Good", "Bad", "Error"]));
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 3);
    }
}
