//! User routes.
//!
//! `GET /user/email/{email}` is how the client maps the identity provider's
//! verified email to a local user id.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use market_core::validation::{validate_new_user, validate_user_changes};
use market_core::{CoreError, User, UserRequest};
use market_db::DbError;

use super::{referenced_conflict, Message};
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(list_users))
        .route("/user/create", post(create_user))
        .route("/user/email/{email}", get(get_user_by_email))
        .route(
            "/user/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.db.users().list().await?))
}

async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<User>> {
    let user = state
        .db
        .users()
        .get_by_id(id)
        .await?
        .ok_or_else(|| CoreError::UserNotFound(id.to_string()))?;
    Ok(Json(user))
}

async fn get_user_by_email(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<Json<User>> {
    let user = state
        .db
        .users()
        .get_by_email(&email)
        .await?
        .ok_or(CoreError::UserNotFound(email))?;
    Ok(Json(user))
}

/// Creation is a single insert; a taken email is caught by the unique index.
async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let new = validate_new_user(req)?;
    let user = state
        .db
        .users()
        .create(&new)
        .await
        .map_err(email_taken(&new.email))?;

    tracing::info!(id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UserRequest>,
) -> ApiResult<Json<User>> {
    let changes = validate_user_changes(req)?;
    if changes.is_empty() {
        return Err(CoreError::NothingToUpdate.into());
    }

    let email = changes.email.clone().unwrap_or_default();
    let user = state
        .db
        .users()
        .update(id, &changes)
        .await
        .map_err(email_taken(&email))?;
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Message>> {
    state
        .db
        .users()
        .delete(id)
        .await
        .map_err(referenced_conflict("User"))?;

    Ok(Json(Message {
        message: "User deleted successfully",
    }))
}

fn email_taken(email: &str) -> impl FnOnce(DbError) -> ApiError + '_ {
    move |err| {
        if err.is_unique_violation() {
            CoreError::EmailTaken(email.to_string()).into()
        } else {
            err.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{item, send, test_app, user};

    #[tokio::test]
    async fn test_register_and_lookup() {
        let (app, _db) = test_app().await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/user/create",
            Some(json!({ "name": "Ada", "email": "ada@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created["phone_number"].is_null());

        let (status, body) = send(&app, Method::GET, "/user/email/ada@example.com", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], created["id"]);

        let uri = format!("/user/{}", created["id"]);
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Ada");

        let (_, body) = send(&app, Method::GET, "/user", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (app, db) = test_app().await;
        user(&db, "Ada").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/user/create",
            Some(json!({ "name": "Other Ada", "email": "ada@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Email already exists", "code": "CONFLICT" }));

        let (status, body) = send(
            &app,
            Method::POST,
            "/user/create",
            Some(json!({ "name": "No Email" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields");
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let (app, _db) = test_app().await;

        let (status, body) = send(&app, Method::GET, "/user/77", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");

        let (status, _) = send(&app, Method::GET, "/user/email/ghost@example.com", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_patch_user() {
        let (app, db) = test_app().await;
        let ada = user(&db, "Ada").await;
        user(&db, "Sam").await;
        let uri = format!("/user/{}", ada.id);

        let (status, body) =
            send(&app, Method::PATCH, &uri, Some(json!({ "phone_number": "555-0100" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phone_number"], "555-0100");
        assert_eq!(body["email"], "ada@example.com");

        let (status, body) =
            send(&app, Method::PATCH, &uri, Some(json!({ "email": "sam@example.com" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email already exists");

        let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "phone_number": "" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["phone_number"].is_null());

        let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::PATCH, "/user/999", Some(json!({ "name": "X" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (app, db) = test_app().await;
        let ada = user(&db, "Ada").await;
        let sam = user(&db, "Sam").await;
        item(&db, sam.id, "Desk Lamp", 2500, 1).await;

        let (status, body) = send(&app, Method::DELETE, &format!("/user/{}", ada.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User deleted successfully");

        // Sam still has a listing
        let (status, body) = send(&app, Method::DELETE, &format!("/user/{}", sam.id), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User is referenced by existing records");

        let (status, _) = send(&app, Method::DELETE, &format!("/user/{}", ada.id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
