#![allow(dead_code)]

use switchyard::testing::{RecordingHandler, RecordingSink};
use switchyard::{MemoryHistory, QueryConfig, Router};

// ============================================================================
// Harness
// ============================================================================

/// A router over an in-memory history with recorders attached.
pub struct Harness {
    pub router: Router,
    pub history: MemoryHistory,
    /// Receives `route:<name>` and `route` from the router.
    pub events: RecordingSink,
    /// Receives the global `route` announcement from the history.
    pub global: RecordingSink,
}

/// A harness whose router uses its own default query config, so tests in the
/// same binary never observe a reconfigured global codec.
pub fn harness() -> Harness {
    harness_at("")
}

pub fn harness_at(fragment: &str) -> Harness {
    let history = MemoryHistory::at(fragment);
    let router = Router::new(history.clone()).with_query_config(QueryConfig::new());
    let (events, global) = (RecordingSink::new(), RecordingSink::new());
    router.events().on_all(events.clone());
    history.events().on_all(global.clone());
    Harness {
        router,
        history,
        events,
        global,
    }
}

// ============================================================================
// Route Tables
// ============================================================================

/// Three `search` routes of decreasing specificity, all handled by `handler`.
pub fn search_routes(router: &mut Router, handler: RecordingHandler) {
    router
        .route("search/:type/p:page", "search")
        .route("search/:type", "search")
        .route("search", "search")
        .method("search", handler);
}
