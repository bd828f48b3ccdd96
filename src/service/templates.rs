use super::ServiceError;
use crate::storage::{Database, NewTemplate, Template};

/// Template CRUD.
#[derive(Clone, Debug)]
pub struct TemplateService {
    db: Database,
}

impl TemplateService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> Result<Vec<Template>, ServiceError> {
        Ok(self.db.list_templates().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Template, ServiceError> {
        self.db.get_template(id).await?.ok_or(ServiceError::NotFound)
    }

    /// Persist a new template; the store assigns the id.
    pub async fn create(&self, template: &NewTemplate) -> Result<Template, ServiceError> {
        let stored = self.db.insert_template(template).await?;
        tracing::info!(id = stored.id, name = %stored.name, "Template created");
        Ok(stored)
    }

    /// Overwrite `name` and `layout_json` of template `id`. The id never changes.
    pub async fn update(&self, id: i64, new_data: &NewTemplate) -> Result<Template, ServiceError> {
        let updated = self
            .db
            .update_template(id, new_data)
            .await?
            .ok_or(ServiceError::NotFound)?;
        tracing::info!(id, "Template updated");
        Ok(updated)
    }

    /// Delete template `id`. Deleting an absent id is a no-op.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if self.db.delete_template(id).await? {
            tracing::info!(id, "Template deleted");
        } else {
            tracing::debug!(id, "Delete of absent template ignored");
        }
        Ok(())
    }
}
