//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::extract_pitch;
use crate::generation::generator::GenerateRequest;
use crate::models::pitch::PitchRecord;
use crate::notify::{CollectingNotifier, Notice};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub pitch: PitchRecord,
    pub pitch_id: Option<i64>,
    pub saved: bool,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub pitch: PitchRecord,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/pitches/generate
///
/// Full pipeline: pitch call → extraction → optional landing page → insert.
/// A failed insert still returns the pitch, with `saved: false` and a notice.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    if request.idea.trim().is_empty() {
        return Err(AppError::Validation("idea cannot be empty".to_string()));
    }

    let notifier = CollectingNotifier::new();
    let outcome = state
        .generator
        .create_pitch(state.store.as_ref(), &notifier, &request)
        .await?;

    Ok(Json(GenerateResponse {
        saved: outcome.saved(),
        pitch_id: outcome.stored_id,
        pitch: outcome.pitch,
        notices: notifier.drain(),
    }))
}

/// POST /api/v1/pitches/extract
///
/// Runs only the extractor over caller-supplied model output. No LLM call.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let pitch = extract_pitch(&request.text, state.generator.validation_mode())?;
    Ok(Json(ExtractResponse { pitch }))
}
