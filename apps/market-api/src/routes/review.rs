//! Review routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use market_core::validation::validate_new_review;
use market_core::{ItemReview, Review, ReviewRequest};

use super::Message;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/review", get(list_reviews))
        .route("/review/create", post(create_review))
        .route("/review/user/{user_id}", get(list_user_reviews))
        // GET takes an item id, DELETE a review id
        .route("/review/{id}", get(list_item_reviews).delete(delete_review))
}

async fn list_reviews(State(state): State<AppState>) -> ApiResult<Json<Vec<Review>>> {
    Ok(Json(state.db.reviews().list().await?))
}

async fn list_item_reviews(
    State(state): State<AppState>,
    ApiPath(item_id): ApiPath<i64>,
) -> ApiResult<Json<Vec<ItemReview>>> {
    Ok(Json(state.db.reviews().list_for_item(item_id).await?))
}

async fn list_user_reviews(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Json<Vec<Review>>> {
    Ok(Json(state.db.reviews().list_by_reviewer(user_id).await?))
}

async fn create_review(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ReviewRequest>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let new = validate_new_review(req)?;
    let review = state.db.reviews().create(&new).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

async fn delete_review(
    State(state): State<AppState>,
    ApiPath(review_id): ApiPath<i64>,
) -> ApiResult<Json<Message>> {
    state.db.reviews().delete(review_id).await?;
    Ok(Json(Message {
        message: "Review deleted successfully",
    }))
}
