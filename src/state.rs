//! Process-wide application state.

use crate::db::Database;

/// State shared with every handler.
///
/// Built once in `main` after [`bootstrap`](crate::db::bootstrap) succeeds and
/// passed to the router with `with_state`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}
