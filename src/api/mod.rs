//! HTTP surface: JSON CRUD for articles and templates, image upload, and
//! static serving of uploaded files.
//!
//! Handlers are thin. They decode the request, call one service method and
//! map the result through [`ApiError`].

mod articles;
mod error;
mod templates;
mod upload;

pub use error::ApiError;
pub use upload::UploadResponse;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::service::{ArticleService, TemplateService};
use crate::storage::Database;
use crate::uploads::{UploadStore, PUBLIC_PREFIX};

/// Dependencies shared by all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub templates: TemplateService,
    pub articles: ArticleService,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(db: Database, uploads: UploadStore) -> Self {
        Self {
            templates: TemplateService::new(db.clone()),
            articles: ArticleService::new(db),
            uploads,
        }
    }
}

/// Build the full application router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let uploaded_files = ServeDir::new(state.uploads.dir());

    Router::new()
        .merge(articles::routes())
        .merge(templates::routes())
        .merge(upload::routes(max_upload_bytes))
        .nest_service(PUBLIC_PREFIX, uploaded_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
