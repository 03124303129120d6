use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::extraction::{normalize_value, ValidationMode};

/// Name given to a pitch whose model output carried no usable `name`.
pub const UNTITLED_STARTUP: &str = "Untitled Startup";

/// A normalized startup pitch, as produced by the extractor.
///
/// Only `name` is guaranteed non-empty. Everything else may be blank or
/// absent and callers render whatever is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchRecord {
    pub name: String,
    pub tagline: String,
    pub elevator_pitch: String,
    pub problem: String,
    pub solution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_value_proposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<TargetAudience>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landing_copy: Option<LandingCopy>,
    pub industry: String,
    /// Color role (e.g. "primary") to a color string, usually `#RRGGBB`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_ideas: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landing_code: Option<String>,
}

impl Default for PitchRecord {
    fn default() -> Self {
        Self {
            name: UNTITLED_STARTUP.to_string(),
            tagline: String::new(),
            elevator_pitch: String::new(),
            problem: String::new(),
            solution: String::new(),
            unique_value_proposition: None,
            target_audience: None,
            landing_copy: None,
            industry: String::new(),
            colors: None,
            logo_ideas: None,
            landing_code: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetAudience {
    pub description: String,
    pub segments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingCopy {
    pub headline: String,
    pub subheadline: String,
    pub call_to_action: String,
}

/// A row of the `pitches` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredPitch {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub short_description: String,
    pub industry: String,
    pub tone: String,
    pub language: String,
    pub generated_data: Value,
    pub landing_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StoredPitch {
    /// Decodes the embedded pitch blob, attaching the stored landing markup.
    ///
    /// Rows written by older clients may not match the current schema, so the
    /// blob is always read permissively.
    pub fn pitch(&self) -> PitchRecord {
        let mut pitch = normalize_value(&self.generated_data, ValidationMode::Permissive)
            .unwrap_or_else(|_| PitchRecord {
                name: self.title.clone(),
                ..PitchRecord::default()
            })
            .normalized();
        if pitch.landing_code.is_none() {
            pitch.landing_code = self.landing_code.clone();
        }
        pitch
    }
}

/// Everything needed to insert one `pitches` row.
#[derive(Debug, Clone)]
pub struct NewPitch {
    pub title: String,
    pub short_description: String,
    pub industry: String,
    pub tone: String,
    pub language: String,
    pub generated_data: Value,
    pub landing_code: Option<String>,
}

impl NewPitch {
    /// Flattens a pitch into the table's summary columns.
    /// `landing_code` is kept out of the blob and stored in its own column.
    pub fn from_pitch(
        pitch: &PitchRecord,
        tone: &str,
        language: &str,
        landing_code: Option<String>,
    ) -> Result<Self, serde_json::Error> {
        let mut blob = pitch.clone();
        blob.landing_code = None;

        Ok(Self {
            title: pitch.name.clone(),
            short_description: non_blank_or(&pitch.tagline, "No tagline"),
            industry: non_blank_or(&pitch.industry, "Unknown"),
            tone: non_blank_or(tone, "auto"),
            language: non_blank_or(language, "auto"),
            generated_data: serde_json::to_value(&blob)?,
            landing_code: landing_code.or_else(|| pitch.landing_code.clone()),
        })
    }
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
