//! Service layer: CRUD orchestration over [`Database`](crate::storage::Database).
//!
//! Updates are full replacements. Every mutable field of the stored record is
//! overwritten with the caller's value; nothing is merged.
//!
//! Template references on article writes are validated here rather than in the
//! HTTP handlers, so the "reference must exist" rule holds for every caller.

mod articles;
mod templates;

pub use articles::{ArticleService, NewArticle, TemplateRef};
pub use templates::TemplateService;

use thiserror::Error;

use crate::storage::DatabaseError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// No record with the requested id
    #[error("Record not found")]
    NotFound,

    /// An article write referenced a template id that does not exist
    #[error("Template {0} does not exist")]
    InvalidTemplate(i64),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}
