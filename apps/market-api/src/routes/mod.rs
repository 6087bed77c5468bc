//! # HTTP Routes
//!
//! One module per resource. Each exposes `routes()` returning a
//! `Router<AppState>` with full paths, merged here.
//!
//! ## Route Map
//! ```text
//! GET    /                                  "Server is running"
//! /item         list, search, per-seller, detail, create, patch, delete
//! /category     list, search by name
//! /user         list, by id, by email, create, patch, delete
//! /review       list, per item, per reviewer, create, delete
//! /transaction  ledger, per user {purchases, sales}, purchase
//! ```
//!
//! Handlers stay thin: parse, validate with `market_core::validation`,
//! delegate to `market_db`, let `ApiError` pick the status.

pub mod category;
pub mod item;
pub mod review;
pub mod transaction;
pub mod user;

use axum::routing::get;
use axum::Router;
use serde::Serialize;

use market_core::CoreError;
use market_db::DbError;

use crate::error::ApiError;
use crate::state::AppState;

/// Every route of the API, without middleware or state.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .merge(item::routes())
        .merge(category::routes())
        .merge(user::routes())
        .merge(review::routes())
        .merge(transaction::routes())
}

async fn root() -> &'static str {
    "Server is running"
}

/// Body returned by successful deletes.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// Maps a foreign-key failure on delete to a conflict naming `entity`.
pub(crate) fn referenced_conflict(entity: &'static str) -> impl FnOnce(DbError) -> ApiError {
    move |err| {
        if err.is_foreign_key_violation() {
            CoreError::StillReferenced {
                entity: entity.to_string(),
            }
            .into()
        } else {
            err.into()
        }
    }
}
