//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::articles::NewArticle;
use crate::domain::entities::ArticleRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[async_trait]
pub trait ArticlesRepo: Send + Sync {
    /// Every article, ascending by `created_at` (ties by `id`).
    async fn find_all(&self) -> Result<Vec<ArticleRecord>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ArticleRecord>, RepoError>;

    /// Persists a new article, assigning `id`, `created_at` and `updated_at`.
    async fn insert(&self, article: NewArticle) -> Result<ArticleRecord, RepoError>;

    /// Overwrites `title` and `body` of the article with the same id and
    /// refreshes `updated_at`. `created_at` is left untouched.
    async fn save(&self, article: &ArticleRecord) -> Result<ArticleRecord, RepoError>;

    async fn delete_by_id(&self, id: i64) -> Result<(), RepoError>;

    async fn health_check(&self) -> Result<(), RepoError>;
}
