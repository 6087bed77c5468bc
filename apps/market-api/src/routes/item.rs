//! Item catalog routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use market_core::validation::{validate_item_changes, validate_new_item, validate_search_query};
use market_core::{CoreError, Item, ItemDetail, ItemRequest, SearchQuery};

use super::{referenced_conflict, Message};
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/item", get(list_items))
        .route("/item/search", get(search_items))
        .route("/item/create", post(create_item))
        .route("/item/user/{user_id}", get(list_seller_items))
        .route("/item/user/{user_id}/search", get(search_seller_items))
        .route(
            "/item/{id}",
            get(get_item).patch(update_item).delete(delete_item),
        )
}

async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<Item>>> {
    Ok(Json(state.db.items().list().await?))
}

/// `GET /item/search?query=lamp&category_id=2`
///
/// Title matches come before category-only matches.
async fn search_items(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> ApiResult<Json<Vec<Item>>> {
    validate_search_query(&params.query)?;
    let items = state
        .db
        .items()
        .search(&params.query, params.category_id)
        .await?;
    Ok(Json(items))
}

async fn list_seller_items(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Json<Vec<Item>>> {
    Ok(Json(state.db.items().list_by_seller(user_id).await?))
}

async fn search_seller_items(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> ApiResult<Json<Vec<Item>>> {
    validate_search_query(&params.query)?;
    let items = state
        .db
        .items()
        .search_by_seller(user_id, &params.query, params.category_id)
        .await?;
    Ok(Json(items))
}

async fn get_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<ItemDetail>> {
    let item = state
        .db
        .items()
        .get_detail(id)
        .await?
        .ok_or(CoreError::ItemNotFound(id))?;
    Ok(Json(item))
}

async fn create_item(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ItemRequest>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let new = validate_new_item(req)?;
    let item = state.db.items().create(&new).await?;

    tracing::info!(id = item.id, seller_id = item.seller_id, "Item listed");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<ItemRequest>,
) -> ApiResult<Json<Item>> {
    let changes = validate_item_changes(req)?;
    if changes.is_empty() {
        return Err(CoreError::NothingToUpdate.into());
    }
    Ok(Json(state.db.items().update(id, &changes).await?))
}

async fn delete_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Message>> {
    state
        .db
        .items()
        .delete(id)
        .await
        .map_err(referenced_conflict("Item"))?;

    Ok(Json(Message {
        message: "Item deleted successfully",
    }))
}
