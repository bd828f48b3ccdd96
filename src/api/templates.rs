use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::{ApiError, AppState};
use crate::storage::{NewTemplate, Template};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/templates", get(list).post(create))
        .route("/api/templates/{id}", get(fetch).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Template>>, ApiError> {
    Ok(Json(state.templates.list_all().await?))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Template>, ApiError> {
    Ok(Json(state.templates.get_by_id(id).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewTemplate>,
) -> Result<Json<Template>, ApiError> {
    Ok(Json(state.templates.create(&body).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewTemplate>,
) -> Result<Json<Template>, ApiError> {
    Ok(Json(state.templates.update(id, &body).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    state.templates.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
