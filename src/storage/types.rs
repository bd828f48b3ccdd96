use serde::{Deserialize, Deserializer, Serialize};
use sqlx::error::ErrorKind;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another process holds a lock on the database file
    #[error("The database is locked by another process. Stop it and try again.")]
    InstanceLocked,

    /// The database file could not be opened or created
    #[error("Cannot open database file (does its directory exist?): {0}")]
    CannotOpen(sqlx::Error),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// A write referenced a row that does not exist (FOREIGN KEY constraint)
    #[error("Referenced row does not exist")]
    ForeignKeyViolation,

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Classify an error raised while opening the pool
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        let error_string = err.to_string().to_lowercase();

        // SQLITE_BUSY (5): database is locked
        // SQLITE_LOCKED (6): database table is locked
        if error_string.contains("database is locked")
            || error_string.contains("database table is locked")
            || error_string.contains("sqlite_busy")
            || error_string.contains("sqlite_locked")
        {
            return DatabaseError::InstanceLocked;
        }

        // SQLITE_CANTOPEN (14): missing directory, permissions, ...
        if error_string.contains("unable to open database file") {
            return DatabaseError::CannotOpen(err);
        }

        DatabaseError::Other(err)
    }

    /// Classify an error raised by an INSERT or UPDATE
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        let is_fk_violation = err
            .as_database_error()
            .is_some_and(|db_err| matches!(db_err.kind(), ErrorKind::ForeignKeyViolation));

        if is_fk_violation {
            DatabaseError::ForeignKeyViolation
        } else {
            DatabaseError::Other(err)
        }
    }
}

/// Read a string field where JSON `null` means the empty string.
///
/// Combined with `#[serde(default)]` this makes a missing key and an explicit
/// null behave the same.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Write Payloads
// ============================================================================

/// Every mutable field of a template.
///
/// Used for both inserts and updates: an update always replaces `name` and
/// `layout_json` together, so a field missing from the request body arrives
/// here as an empty string rather than "unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewTemplate {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub layout_json: String,
}

// ============================================================================
// Row Types
// ============================================================================

/// Article row joined with its (optional) template.
///
/// The `t_*` columns come from a LEFT JOIN, so they are all NULL when the
/// article has no template.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ArticleDbRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub t_id: Option<i64>,
    pub t_name: Option<String>,
    pub t_layout_json: Option<String>,
}

impl ArticleDbRow {
    pub(crate) fn into_article(self) -> Article {
        let template = match (self.t_id, self.t_name, self.t_layout_json) {
            (Some(id), Some(name), Some(layout_json)) => Some(Template {
                id,
                name,
                layout_json,
            }),
            _ => None,
        };

        Article {
            id: self.id,
            title: self.title,
            content: self.content,
            template,
        }
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// A named layout definition. `layout_json` is opaque and stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: i64,
    pub name: String,
    pub layout_json: String,
}

/// Article with its template resolved to the full stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub template: Option<Template>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_serializes_camel_case() {
        let template = Template {
            id: 3,
            name: "Basic".to_string(),
            layout_json: "{\"cols\":2}".to_string(),
        };
        let json = serde_json::to_value(&template).unwrap();
        assert_eq!(json["layoutJson"], "{\"cols\":2}");
        assert!(json.get("layout_json").is_none());
    }

    #[test]
    fn test_new_template_missing_fields_become_empty() {
        let parsed: NewTemplate = serde_json::from_str(r#"{"name":"Only name"}"#).unwrap();
        assert_eq!(parsed.name, "Only name");
        assert_eq!(parsed.layout_json, "");
    }

    #[test]
    fn test_new_template_null_fields_become_empty() {
        let parsed: NewTemplate =
            serde_json::from_str(r#"{"name":null,"layoutJson":null}"#).unwrap();
        assert_eq!(parsed, NewTemplate::default());

        let parsed: NewTemplate = serde_json::from_str(r#"{"name":"n","layoutJson":null}"#).unwrap();
        assert_eq!(parsed.name, "n");
        assert_eq!(parsed.layout_json, "");
    }

    #[test]
    fn test_new_template_rejects_non_string() {
        assert!(serde_json::from_str::<NewTemplate>(r#"{"name":3}"#).is_err());
    }

    #[test]
    fn test_new_template_ignores_id() {
        let parsed: NewTemplate =
            serde_json::from_str(r#"{"id":99,"name":"n","layoutJson":"[]"}"#).unwrap();
        assert_eq!(
            parsed,
            NewTemplate {
                name: "n".to_string(),
                layout_json: "[]".to_string(),
            }
        );
    }

    #[test]
    fn test_row_without_template_maps_to_none() {
        let row = ArticleDbRow {
            id: 1,
            title: "t".to_string(),
            content: "c".to_string(),
            t_id: None,
            t_name: None,
            t_layout_json: None,
        };
        let article = row.into_article();
        assert!(article.template.is_none());

        let json = serde_json::to_value(&article).unwrap();
        assert!(json["template"].is_null());
    }
}
