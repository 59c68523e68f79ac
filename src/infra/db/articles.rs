use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::repos::{ArticlesRepo, RepoError};
use crate::domain::articles::NewArticle;
use crate::domain::entities::ArticleRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: i64,
    title: String,
    body: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ArticleRow> for ArticleRecord {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            body: row.body,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ArticlesRepo for PostgresRepositories {
    async fn find_all(&self) -> Result<Vec<ArticleRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT id, title, body, created_at, updated_at
            FROM articles
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ArticleRecord::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ArticleRecord>, RepoError> {
        let row = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT id, title, body, created_at, updated_at
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ArticleRecord::from))
    }

    async fn insert(&self, article: NewArticle) -> Result<ArticleRecord, RepoError> {
        let (title, body) = article.into_parts();
        let now = OffsetDateTime::now_utc();

        let row = sqlx::query_as::<_, ArticleRow>(
            r#"
            INSERT INTO articles (title, body, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, title, body, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(body)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn save(&self, article: &ArticleRecord) -> Result<ArticleRecord, RepoError> {
        // fetch_one turns a vanished row into RowNotFound, i.e. RepoError::NotFound.
        let row = sqlx::query_as::<_, ArticleRow>(
            r#"
            UPDATE articles
            SET title = $2, body = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, title, body, created_at, updated_at
            "#,
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.body)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        PostgresRepositories::health_check(self)
            .await
            .map_err(map_sqlx_error)
    }
}
