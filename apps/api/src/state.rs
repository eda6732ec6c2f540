use std::sync::Arc;

use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::layout::PageConfig;
use crate::llm_client::CompletionService;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is immutable; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Completion backend. `CompletionClient` in production, a stub in tests.
    pub llm: Arc<dyn CompletionService>,
    pub extractor: Arc<dyn TextExtractor>,
    /// Page geometry used when laying out an optimized CV.
    pub page_config: PageConfig,
}
