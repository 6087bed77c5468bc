//! # market-api: Marketplace REST Server
//!
//! axum application serving the single-page marketplace client.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP request                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TraceLayer (span per request) ─► CorsLayer (optional)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  routes::{item, category, user, review, transaction}                    │
//! │       │  ApiJson / ApiPath / ApiQuery ── rejection ──► ApiError (400)   │
//! │       ▼                                                                 │
//! │  market_core::validation ── ValidationError ──► ApiError (400)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  market_db (repositories, PurchaseProcessor)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Json<T> or ApiError → {"error", "code"}                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Builds the full application: routes, state and middleware.
pub fn app(state: AppState, cors_allow_any: bool) -> Router {
    let router = routes::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors_allow_any {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,market=debug,sqlx=warn,tower_http=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
