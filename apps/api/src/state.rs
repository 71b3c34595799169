use std::sync::Arc;

use crate::config::Config;
use crate::generator::DocumentGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable generation backend. Default: HttpDocumentGenerator.
    pub generator: Arc<dyn DocumentGenerator>,
}
