use std::sync::Arc;

use crate::compose::sessions::SessionRegistry;
use crate::config::Config;
use crate::generation::CoverLetterGenerator;
use crate::persistence::ItemStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Job tracker. Default: TrackerClient over HTTP.
    pub items: Arc<dyn ItemStore>,
    pub generator: Arc<dyn CoverLetterGenerator>,
    pub sessions: SessionRegistry,
}
