use std::sync::Arc;

use crate::services::RecommendationEngine;

/// Shared application state
///
/// Everything behind the `Arc` is read-only after startup, so handlers need
/// no locking.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub default_country: Arc<str>,
}

impl AppState {
    pub fn new(engine: RecommendationEngine, default_country: impl Into<Arc<str>>) -> Self {
        Self {
            engine: Arc::new(engine),
            default_country: default_country.into(),
        }
    }

    /// Country from the request, or the configured default when absent or blank
    pub fn resolve_country<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(self.default_country.as_ref())
    }
}
