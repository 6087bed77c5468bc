//! Category routes (read-only).

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use market_core::Category;

use crate::error::ApiResult;
use crate::extract::ApiPath;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/category", get(list_categories))
        .route("/category/{name}", get(search_categories))
}

async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.categories().list().await?))
}

/// Categories whose name contains the path segment.
async fn search_categories(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.categories().search(&name).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::routes::test_support::{send, test_app};

    #[tokio::test]
    async fn test_list_and_search_categories() {
        let (app, db) = test_app().await;
        for name in ["Lamps & Lighting", "Furniture", "Electronics"] {
            db.categories().create(name).await.unwrap();
        }

        let (status, body) = send(&app, Method::GET, "/category", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["category_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Electronics", "Furniture", "Lamps & Lighting"]);

        let (_, body) = send(&app, Method::GET, "/category/FURN", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["category_name"], "Furniture");

        let (_, body) = send(&app, Method::GET, "/category/garden", None).await;
        assert!(body.as_array().unwrap().is_empty());
    }
}
