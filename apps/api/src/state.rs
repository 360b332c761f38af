use std::sync::Arc;

use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds no per-submission data: every request builds its own profile and blocks.
#[derive(Clone)]
pub struct AppState {
    /// `None` when `GEMINI_API_KEY` is missing; the submit path is disabled then.
    pub llm: Option<Arc<dyn CompletionClient>>,
}

impl AppState {
    pub fn completion_configured(&self) -> bool {
        self.llm.is_some()
    }
}
