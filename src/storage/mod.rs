mod articles;
mod schema;
mod templates;
mod types;

pub use schema::Database;
pub use types::{Article, DatabaseError, NewTemplate, Template};
pub(crate) use types::null_as_empty;
