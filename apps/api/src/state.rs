use std::sync::Arc;

use crate::generation::generator::PitchGenerator;
use crate::store::PitchStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pitch persistence. `PgPitchStore` in production.
    pub store: Arc<dyn PitchStore>,
    pub generator: PitchGenerator,
}
