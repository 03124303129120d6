use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::landing::fallback_landing_page;
use crate::library::{ListFilter, PitchLibrary, SortOrder};
use crate::models::pitch::{PitchRecord, StoredPitch};
use crate::notify::{CollectingNotifier, Notice};
use crate::state::AppState;

/// Preview documents may not run scripts, submit forms, or reach the API origin.
const PREVIEW_CSP: &str = "sandbox; default-src 'none'; style-src 'unsafe-inline'; img-src data: https:";

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub user_id: Uuid,
    pub search: Option<String>,
    pub industry: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl ListQuery {
    fn filter(&self) -> ListFilter {
        ListFilter {
            search: self.search.clone(),
            industry: self.industry.clone(),
            sort: self.sort,
        }
    }
}

#[derive(Serialize)]
pub struct PitchSummary {
    pub id: i64,
    pub name: String,
    pub tagline: String,
    pub industry: String,
    pub has_landing_page: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&StoredPitch> for PitchSummary {
    fn from(stored: &StoredPitch) -> Self {
        let pitch = stored.pitch();
        Self {
            id: stored.id,
            name: pitch.name,
            tagline: pitch.tagline,
            industry: stored.industry.clone(),
            has_landing_page: stored.landing_code.is_some(),
            created_at: stored.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct PitchListResponse {
    pub pitches: Vec<PitchSummary>,
    /// Owned pitches before filtering.
    pub total: usize,
    pub industries: Vec<String>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted_id: i64,
    pub remaining: usize,
    pub notices: Vec<Notice>,
}

#[derive(Serialize)]
pub struct PitchDetailResponse {
    pub id: i64,
    pub tone: String,
    pub language: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub pitch: PitchRecord,
}

/// GET /api/v1/pitches
pub async fn handle_list_pitches(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<PitchListResponse>, AppError> {
    let library = PitchLibrary::fetch(state.store.as_ref(), params.user_id).await?;
    if library.is_empty() {
        debug!("No saved pitches for {}", params.user_id);
    }
    let pitches = library
        .filtered(&params.filter())
        .into_iter()
        .map(PitchSummary::from)
        .collect();

    Ok(Json(PitchListResponse {
        pitches,
        total: library.len(),
        industries: library.industries(),
    }))
}

/// GET /api/v1/pitches/:id
pub async fn handle_get_pitch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<PitchDetailResponse>, AppError> {
    let stored = state.store.get(id, params.user_id).await?;
    Ok(Json(PitchDetailResponse {
        id: stored.id,
        pitch: stored.pitch(),
        tone: stored.tone,
        language: stored.language,
        created_at: stored.created_at,
    }))
}

/// GET /api/v1/pitches/:id/preview
///
/// Serves the stored landing page as a sandboxed HTML document. Pitches saved
/// without one get the fallback page.
pub async fn handle_preview_pitch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<UserIdQuery>,
) -> Result<Response, AppError> {
    let stored = state.store.get(id, params.user_id).await?;
    let markup = match stored.landing_code.as_deref() {
        Some(code) if !code.trim().is_empty() => code.to_string(),
        _ => fallback_landing_page(&stored.pitch()),
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CONTENT_SECURITY_POLICY, PREVIEW_CSP),
        ],
        markup,
    )
        .into_response())
}

/// DELETE /api/v1/pitches/:id
///
/// Returns how many pitches the owner has left so the client can update its
/// list without refetching.
pub async fn handle_delete_pitch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DeleteResponse>, Response> {
    let mut library = PitchLibrary::fetch(state.store.as_ref(), params.user_id)
        .await
        .map_err(|e| AppError::from(e).into_response())?;
    let notifier = CollectingNotifier::new();
    if let Err(e) = library.remove(state.store.as_ref(), &notifier, id).await {
        return Err(AppError::from(e).with_notices(notifier.drain()));
    }

    Ok(Json(DeleteResponse {
        deleted_id: id,
        remaining: library.len(),
        notices: notifier.drain(),
    }))
}
