use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::page::{PageController, SharedPage};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Backend for `POST /analyze`. Default: `AnalysisClient` over HTTP.
    pub analyzer: Arc<dyn Analyzer>,
    /// The one interactive page this service renders.
    pub page: SharedPage,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            analyzer,
            page: PageController::shared(),
            config,
        }
    }
}
