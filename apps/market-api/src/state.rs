//! Shared router state.

use market_db::Database;

/// Handed to every handler by axum. `Database` wraps a pool, so cloning is
/// cheap and every clone talks to the same connections.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
