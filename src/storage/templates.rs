use super::schema::Database;
use super::types::{DatabaseError, NewTemplate, Template};

impl Database {
    // ========================================================================
    // Template Operations
    // ========================================================================

    /// Get all templates, oldest first.
    pub async fn list_templates(&self) -> Result<Vec<Template>, DatabaseError> {
        let templates = sqlx::query_as::<_, Template>(
            "SELECT id, name, layout_json FROM templates ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(templates)
    }

    /// Get a single template by id.
    pub async fn get_template(&self, id: i64) -> Result<Option<Template>, DatabaseError> {
        let template = sqlx::query_as::<_, Template>(
            "SELECT id, name, layout_json FROM templates WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(template)
    }

    /// Insert a template and return the stored row with its assigned id.
    pub async fn insert_template(&self, template: &NewTemplate) -> Result<Template, DatabaseError> {
        let stored = sqlx::query_as::<_, Template>(
            "INSERT INTO templates (name, layout_json) VALUES (?, ?) RETURNING id, name, layout_json",
        )
        .bind(&template.name)
        .bind(&template.layout_json)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    /// Replace `name` and `layout_json` of an existing template.
    ///
    /// Returns `None` when no template has `id`.
    pub async fn update_template(
        &self,
        id: i64,
        template: &NewTemplate,
    ) -> Result<Option<Template>, DatabaseError> {
        let updated = sqlx::query_as::<_, Template>(
            "UPDATE templates SET name = ?, layout_json = ? WHERE id = ? RETURNING id, name, layout_json",
        )
        .bind(&template.name)
        .bind(&template.layout_json)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a template. Articles referencing it are left with no template
    /// (ON DELETE SET NULL). Returns whether a row was removed.
    pub async fn delete_template(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM templates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_templates(&self) -> Result<i64, DatabaseError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM templates")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
