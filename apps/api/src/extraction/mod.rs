//! Extractor/Normalizer: turns free-form model output into a `PitchRecord`.
//!
//! 1. locate: greedy span from the first `{` to the last `}`
//! 2. parse : strict JSON, then one retry after textual repair
//! 3. normalize: field defaults and permissive coercion (or strict checks)
//!
//! Pure and deterministic: the same text always yields the same result.

pub mod locate;
pub mod normalize;
pub mod repair;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::pitch::PitchRecord;

pub use locate::locate_json_span;
pub use normalize::{normalize_value, ValidationMode};
pub use repair::repair_json;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON object found in model output")]
    NoJsonFound,

    /// Carries the error from the first, unrepaired parse attempt.
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("pitch failed strict validation: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),
}

/// Extracts and normalizes the single pitch object embedded in `text`.
pub fn extract_pitch(text: &str, mode: ValidationMode) -> Result<PitchRecord, ExtractError> {
    let span = locate_json_span(text).ok_or(ExtractError::NoJsonFound)?;
    let value = parse_with_repair(span)?;
    normalize_value(&value, mode)
}

/// Strict parse, then exactly one retry on the repaired text.
fn parse_with_repair(span: &str) -> Result<Value, ExtractError> {
    let original_err = match serde_json::from_str::<Value>(span) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let repaired = repair_json(span);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => {
            debug!("Recovered pitch JSON after repair (original error: {original_err})");
            Ok(value)
        }
        Err(repair_err) => {
            debug!("Pitch JSON still invalid after repair: {repair_err}");
            Err(ExtractError::InvalidJson(original_err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Result<PitchRecord, ExtractError> {
        extract_pitch(text, ValidationMode::Permissive)
    }

    #[test]
    fn test_extracts_object_wrapped_in_prose() {
        let text = "Here you go:\n{\"name\":\"BudgetBuddy\",\"tagline\":\"Smart money for students\"}\n\n";
        let pitch = extract(text).unwrap();
        assert_eq!(pitch.name, "BudgetBuddy");
        assert_eq!(pitch.tagline, "Smart money for students");
        assert_eq!(pitch.industry, "");
        assert_eq!(pitch.problem, "");
        assert!(pitch.target_audience.is_none());
        assert!(pitch.colors.is_none());
        assert!(pitch.logo_ideas.is_none());
        assert!(pitch.landing_code.is_none());
    }

    #[test]
    fn test_extracts_object_inside_markdown_fence() {
        let text = "```json\n{\"name\": \"Fenced\", \"industry\": \"FinTech\"}\n```";
        let pitch = extract(text).unwrap();
        assert_eq!(pitch.name, "Fenced");
        assert_eq!(pitch.industry, "FinTech");
    }

    #[test]
    fn test_no_braces_is_no_json_found() {
        assert!(matches!(
            extract("Sorry, I can't help with that."),
            Err(ExtractError::NoJsonFound)
        ));
        assert!(matches!(extract(""), Err(ExtractError::NoJsonFound)));
        assert!(matches!(extract("only an opener {"), Err(ExtractError::NoJsonFound)));
        assert!(matches!(extract("} backwards {"), Err(ExtractError::NoJsonFound)));
    }

    #[test]
    fn test_single_quotes_and_trailing_comma_match_valid_input() {
        let valid = r#"{"name": "QuoteCo", "tagline": "Say it twice", "logo_ideas": ["a", "b"]}"#;
        let sloppy = r#"Sure! {'name': 'QuoteCo', 'tagline': 'Say it twice', 'logo_ideas': ['a', 'b',],}"#;
        assert_eq!(extract(sloppy).unwrap(), extract(valid).unwrap());
    }

    #[test]
    fn test_unrepairable_text_is_invalid_json() {
        let result = extract("{name: BudgetBuddy}");
        assert!(matches!(result, Err(ExtractError::InvalidJson(_))));
    }

    #[test]
    fn test_invalid_json_carries_original_parser_error() {
        let err = extract("{\"name\": \"x\" \"tagline\": \"y\"}").unwrap_err();
        match err {
            ExtractError::InvalidJson(source) => {
                assert!(source.is_syntax());
                assert_eq!(source.line(), 1);
            }
            other => panic!("expected InvalidJson, got {other:?}"),
        }
    }

    #[test]
    fn test_greedy_span_swallowing_two_objects_is_invalid_json() {
        // first `{` to last `}` covers both objects; not corrected.
        let text = "{\"name\": \"One\"} and also {\"name\": \"Two\"}";
        assert!(matches!(extract(text), Err(ExtractError::InvalidJson(_))));
    }

    #[test]
    fn test_brace_inside_string_literal_is_tolerated() {
        let text = "{\"name\": \"Curly}\", \"tagline\": \"{braces}\"} trailing note";
        let pitch = extract(text).unwrap();
        assert_eq!(pitch.name, "Curly}");
        assert_eq!(pitch.tagline, "{braces}");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "prefix {'name': 'Repeat', 'colors': {'primary': '#3B82F6',}} suffix";
        assert_eq!(extract(text).unwrap(), extract(text).unwrap());
    }

    #[test]
    fn test_strict_mode_rejects_bad_color() {
        let text = r##"{"name": "Hue", "colors": {"primary": "blue", "accent": "#FFF"}}"##;
        assert!(extract(text).is_ok());
        let err = extract_pitch(text, ValidationMode::Strict).unwrap_err();
        match err {
            ExtractError::SchemaViolation(problems) => {
                assert_eq!(problems.len(), 1);
                assert!(problems[0].contains("primary"));
            }
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }
}
