use serde::Deserialize;

use super::ServiceError;
use crate::storage::{null_as_empty, Article, Database, DatabaseError, Template};

/// Reference to a template inside an article request body.
///
/// Clients usually echo the whole template object back; everything except
/// `id` is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TemplateRef {
    #[serde(default)]
    pub id: Option<i64>,
}

/// Every mutable field of an article, as sent by clients on create and update.
///
/// A missing or null `title` or `content` is the empty string. A missing or
/// null `template`, or one without an `id`, means "no template".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewArticle {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub content: String,
    pub template: Option<TemplateRef>,
}

impl NewArticle {
    /// The referenced template id, if the request names one.
    pub fn template_id(&self) -> Option<i64> {
        self.template.and_then(|t| t.id)
    }
}

/// Translate a failed article write.
///
/// The template can be deleted between `resolve_template` and the write; the
/// foreign key then rejects the row and the request is reported as naming an
/// unknown template.
fn map_write_error(err: DatabaseError, template_id: Option<i64>) -> ServiceError {
    match (err, template_id) {
        (DatabaseError::ForeignKeyViolation, Some(id)) => {
            tracing::warn!(template_id = id, "Template deleted before article write");
            ServiceError::InvalidTemplate(id)
        }
        (err, _) => err.into(),
    }
}

/// Article CRUD with template-reference validation.
#[derive(Clone, Debug)]
pub struct ArticleService {
    db: Database,
}

impl ArticleService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> Result<Vec<Article>, ServiceError> {
        Ok(self.db.list_articles().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Article, ServiceError> {
        self.db.get_article(id).await?.ok_or(ServiceError::NotFound)
    }

    /// Look up the template an article write refers to.
    ///
    /// `None` passes through. An id with no stored template is
    /// `ServiceError::InvalidTemplate`.
    pub async fn resolve_template(
        &self,
        template_id: Option<i64>,
    ) -> Result<Option<Template>, ServiceError> {
        let Some(id) = template_id else {
            return Ok(None);
        };

        match self.db.get_template(id).await? {
            Some(template) => Ok(Some(template)),
            None => {
                tracing::warn!(template_id = id, "Article references unknown template");
                Err(ServiceError::InvalidTemplate(id))
            }
        }
    }

    /// Persist a new article after resolving its template reference.
    ///
    /// Nothing is written when the reference is invalid.
    pub async fn create(&self, article: &NewArticle) -> Result<Article, ServiceError> {
        let template_id = self
            .resolve_template(article.template_id())
            .await?
            .map(|t| t.id);

        let stored = self
            .db
            .insert_article(&article.title, &article.content, template_id)
            .await
            .map_err(|e| map_write_error(e, template_id))?;

        tracing::info!(id = stored.id, template_id = ?template_id, "Article created");
        Ok(stored)
    }

    /// Overwrite `title`, `content` and the template reference of article `id`.
    ///
    /// The reference is checked before the article itself, so an unknown
    /// template wins over an unknown article.
    pub async fn update(&self, id: i64, new_data: &NewArticle) -> Result<Article, ServiceError> {
        let template_id = self
            .resolve_template(new_data.template_id())
            .await?
            .map(|t| t.id);

        let updated = self
            .db
            .update_article(id, &new_data.title, &new_data.content, template_id)
            .await
            .map_err(|e| map_write_error(e, template_id))?
            .ok_or(ServiceError::NotFound)?;

        tracing::info!(id, "Article updated");
        Ok(updated)
    }

    /// Delete article `id`. Deleting an absent id is a no-op.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if self.db.delete_article(id).await? {
            tracing::info!(id, "Article deleted");
        } else {
            tracing::debug!(id, "Delete of absent article ignored");
        }
        Ok(())
    }
}
