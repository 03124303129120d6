use std::collections::BTreeMap;

use serde::de::Error as _;
use serde_json::{Map, Value};
use tracing::debug;

use crate::extraction::ExtractError;
use crate::models::pitch::{LandingCopy, PitchRecord, TargetAudience, UNTITLED_STARTUP};

/// How strictly nested pitch fields are checked.
///
/// `Permissive` renders whatever the model produced (numbers become text,
/// nulls are dropped). `Strict` rejects malformed colors and non-string list
/// entries instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    #[default]
    Permissive,
    Strict,
}

/// Builds a `PitchRecord` from a parsed JSON value, applying field defaults.
pub fn normalize_value(value: &Value, mode: ValidationMode) -> Result<PitchRecord, ExtractError> {
    let obj = value.as_object().ok_or_else(|| {
        ExtractError::InvalidJson(serde_json::Error::custom(
            "expected a JSON object at the top level",
        ))
    })?;

    let mut problems = Vec::new();

    let record = PitchRecord {
        name: text_field(obj, "name").unwrap_or_default(),
        tagline: text_field(obj, "tagline").unwrap_or_default(),
        elevator_pitch: text_field(obj, "elevator_pitch").unwrap_or_default(),
        problem: text_field(obj, "problem").unwrap_or_default(),
        solution: text_field(obj, "solution").unwrap_or_default(),
        unique_value_proposition: text_field(obj, "unique_value_proposition"),
        target_audience: obj
            .get("target_audience")
            .and_then(|v| target_audience(v, &mut problems)),
        landing_copy: obj.get("landing_copy").and_then(landing_copy),
        industry: text_field(obj, "industry").unwrap_or_default(),
        colors: obj.get("colors").and_then(|v| colors(v, &mut problems)),
        logo_ideas: obj
            .get("logo_ideas")
            .and_then(|v| string_list(v, "logo_ideas", &mut problems)),
        landing_code: text_field(obj, "landing_code"),
    }
    .normalized();

    if !problems.is_empty() {
        if mode == ValidationMode::Strict {
            return Err(ExtractError::SchemaViolation(problems));
        }
        debug!(
            "Accepted pitch '{}' with {} loosely typed field(s)",
            record.name,
            problems.len()
        );
    }

    Ok(record)
}

impl PitchRecord {
    /// Applies the record-level defaults. Idempotent.
    pub fn normalized(mut self) -> Self {
        if self.name.trim().is_empty() {
            self.name = UNTITLED_STARTUP.to_string();
        }
        self
    }
}

/// `#` followed by 3, 6 or 8 hex digits.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(render_text)
}

/// Text form of a JSON value; `null` has none.
fn render_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn target_audience(value: &Value, problems: &mut Vec<String>) -> Option<TargetAudience> {
    match value {
        Value::Null => None,
        Value::Object(obj) => Some(TargetAudience {
            description: text_field(obj, "description").unwrap_or_default(),
            segments: obj
                .get("segments")
                .and_then(|v| string_list(v, "target_audience.segments", problems))
                .unwrap_or_default(),
        }),
        Value::Array(_) => Some(TargetAudience {
            description: String::new(),
            segments: string_list(value, "target_audience.segments", problems)
                .unwrap_or_default(),
        }),
        other => Some(TargetAudience {
            description: render_text(other).unwrap_or_default(),
            segments: Vec::new(),
        }),
    }
}

fn landing_copy(value: &Value) -> Option<LandingCopy> {
    let obj = value.as_object()?;
    Some(LandingCopy {
        headline: text_field(obj, "headline").unwrap_or_default(),
        subheadline: text_field(obj, "subheadline").unwrap_or_default(),
        call_to_action: text_field(obj, "call_to_action").unwrap_or_default(),
    })
}

fn colors(value: &Value, problems: &mut Vec<String>) -> Option<BTreeMap<String, String>> {
    let obj = match value {
        Value::Null => return None,
        Value::Object(obj) => obj,
        _ => {
            problems.push("colors must be an object of role to hex color".to_string());
            return None;
        }
    };

    let mut palette = BTreeMap::new();
    for (role, color) in obj {
        let Some(text) = render_text(color) else {
            continue;
        };
        if !is_hex_color(&text) {
            problems.push(format!("colors.{role} is not a hex color: {text}"));
        }
        palette.insert(role.clone(), text);
    }
    Some(palette)
}

fn string_list(value: &Value, field: &str, problems: &mut Vec<String>) -> Option<Vec<String>> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(
            items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    if !item.is_string() {
                        problems.push(format!("{field}[{i}] is not a string"));
                    }
                    render_text(item)
                })
                .collect(),
        ),
        Value::String(s) => Some(vec![s.clone()]),
        _ => {
            problems.push(format!("{field} must be a list of strings"));
            render_text(value).map(|s| vec![s])
        }
    }
}
