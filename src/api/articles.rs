use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::{ApiError, AppState};
use crate::service::NewArticle;
use crate::storage::Article;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/articles", get(list).post(create))
        .route("/api/articles/{id}", get(fetch).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Article>>, ApiError> {
    Ok(Json(state.articles.list_all().await?))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(state.articles.get_by_id(id).await?))
}

/// 400 when the body names a template that does not exist.
async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewArticle>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(state.articles.create(&body).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewArticle>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(state.articles.update(id, &body).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    state.articles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
