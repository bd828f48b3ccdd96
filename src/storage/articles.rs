use super::schema::Database;
use super::types::{Article, ArticleDbRow, DatabaseError};

/// Article columns plus the LEFT JOINed template, aliased for `ArticleDbRow`.
const ARTICLE_SELECT: &str = r#"
    SELECT a.id, a.title, a.content,
           t.id AS t_id, t.name AS t_name, t.layout_json AS t_layout_json
    FROM articles a
    LEFT JOIN templates t ON t.id = a.template_id
"#;

impl Database {
    // ========================================================================
    // Article Queries
    // ========================================================================

    /// Get all articles with their templates, oldest first.
    pub async fn list_articles(&self) -> Result<Vec<Article>, DatabaseError> {
        let rows = sqlx::query_as::<_, ArticleDbRow>(&format!("{ARTICLE_SELECT} ORDER BY a.id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ArticleDbRow::into_article).collect())
    }

    /// Get a single article by id, template included.
    pub async fn get_article(&self, id: i64) -> Result<Option<Article>, DatabaseError> {
        let row = sqlx::query_as::<_, ArticleDbRow>(&format!("{ARTICLE_SELECT} WHERE a.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ArticleDbRow::into_article))
    }

    pub async fn count_articles(&self) -> Result<i64, DatabaseError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    // ========================================================================
    // Article Writes
    // ========================================================================

    /// Insert an article and return it with its assigned id and joined template.
    ///
    /// `template_id` is written as given. An id with no matching template
    /// (including one deleted after the caller checked it) fails with
    /// `DatabaseError::ForeignKeyViolation` and nothing is written.
    pub async fn insert_article(
        &self,
        title: &str,
        content: &str,
        template_id: Option<i64>,
    ) -> Result<Article, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO articles (title, content, template_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(title)
        .bind(content)
        .bind(template_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from_write)?;

        let row = sqlx::query_as::<_, ArticleDbRow>(&format!("{ARTICLE_SELECT} WHERE a.id = ?"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.into_article())
    }

    /// Replace `title`, `content` and `template_id` of an existing article.
    ///
    /// Returns `None` when no article has `id`. An unknown `template_id` fails
    /// with `DatabaseError::ForeignKeyViolation`.
    pub async fn update_article(
        &self,
        id: i64,
        title: &str,
        content: &str,
        template_id: Option<i64>,
    ) -> Result<Option<Article>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let result =
            sqlx::query("UPDATE articles SET title = ?, content = ?, template_id = ? WHERE id = ?")
                .bind(title)
                .bind(content)
                .bind(template_id)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(DatabaseError::from_write)?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query_as::<_, ArticleDbRow>(&format!("{ARTICLE_SELECT} WHERE a.id = ?"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(row.into_article()))
    }

    /// Delete an article. Its template is untouched. Returns whether a row was removed.
    pub async fn delete_article(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
