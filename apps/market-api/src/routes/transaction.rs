//! Ledger and purchase routes.
//!
//! `POST /transaction/create` is the only way stock leaves the catalog. The
//! handler checks the body shape and hands off to
//! [`PurchaseProcessor`](market_db::PurchaseProcessor); everything else
//! (existence, stock, the write itself) happens inside one database
//! transaction.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use market_core::validation::validate_purchase;
use market_core::{LedgerEntry, PurchaseRequest, UserTransactions};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transaction", get(list_transactions))
        .route("/transaction/user/{user_id}", get(user_transactions))
        .route("/transaction/create", post(create_transaction))
}

async fn list_transactions(State(state): State<AppState>) -> ApiResult<Json<Vec<LedgerEntry>>> {
    Ok(Json(state.db.ledger().list().await?))
}

async fn user_transactions(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Json<UserTransactions>> {
    Ok(Json(state.db.ledger().for_user(user_id).await?))
}

/// `POST /transaction/create` with `{"itemId": 1, "buyerId": 42}`.
///
/// ```text
/// 201  ledger entry
/// 400  Missing required fields | Item is out of stock
/// 404  Item not found | Buyer not found
/// 500  Internal Server Error
/// ```
async fn create_transaction(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PurchaseRequest>,
) -> ApiResult<(StatusCode, Json<LedgerEntry>)> {
    let (item_id, buyer_id) = validate_purchase(&req)?;
    let entry = state.db.purchases().purchase(item_id, buyer_id).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
