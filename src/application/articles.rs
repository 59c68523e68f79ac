//! Article reads and writes with cache-aside consistency.
//!
//! Reads check the cache first and fill it from the repository on a miss.
//! Writes mutate the repository, then forget the affected keys so the next
//! read repopulates them. A read racing a write may refill a key with the
//! pre-write state; the entry is corrected by the next write to the same
//! article.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{ArticlesRepo, RepoError};
use crate::cache::{
    CacheConfig, CacheError, CacheKey, CacheStore, Retention, forget, remember, remember_forever,
};
use crate::domain::articles::NewArticle;
use crate::domain::entities::ArticleRecord;
use crate::domain::error::ValidationErrors;

#[derive(Debug, Error)]
pub enum ArticleError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("article {id} not found")]
    NotFound { id: i64 },
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl ArticleError {
    fn from_repo(err: RepoError, id: i64) -> Self {
        match err {
            RepoError::NotFound => ArticleError::NotFound { id },
            other => ArticleError::Repo(other),
        }
    }
}

/// Retention of "not found" lookups under `article:<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleCachePolicy {
    pub negative_ttl: Option<Duration>,
}

impl Default for ArticleCachePolicy {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for ArticleCachePolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            negative_ttl: config.negative_ttl,
        }
    }
}

impl ArticleCachePolicy {
    fn retention_for(&self, article: &Option<ArticleRecord>) -> Retention {
        match (article, self.negative_ttl) {
            (Some(_), _) => Retention::Forever,
            (None, Some(ttl)) => Retention::For(ttl),
            (None, None) => Retention::Skip,
        }
    }
}

#[derive(Clone)]
pub struct ArticleService {
    repo: Arc<dyn ArticlesRepo>,
    cache: Arc<dyn CacheStore>,
    policy: ArticleCachePolicy,
}

impl ArticleService {
    pub fn new(repo: Arc<dyn ArticlesRepo>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            repo,
            cache,
            policy: ArticleCachePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ArticleCachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// All articles ascending by creation time, cached forever under
    /// `article:all`.
    pub async fn list_all(&self) -> Result<Vec<ArticleRecord>, ArticleError> {
        let repo = &self.repo;
        remember_forever(self.cache.as_ref(), &CacheKey::ArticleAll, || async move {
            repo.find_all().await.map_err(ArticleError::from)
        })
        .await
    }

    /// One article through `article:<id>`. `None` means not found; that
    /// outcome is cached too, for the policy's negative TTL.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<ArticleRecord>, ArticleError> {
        let repo = &self.repo;
        let policy = self.policy;
        remember(
            self.cache.as_ref(),
            &CacheKey::Article(id),
            || async move { repo.find_by_id(id).await.map_err(ArticleError::from) },
            |article| policy.retention_for(article),
        )
        .await
    }

    /// Like [`get_by_id`](Self::get_by_id) but absence is an error.
    pub async fn require(&self, id: i64) -> Result<ArticleRecord, ArticleError> {
        self.get_by_id(id)
            .await?
            .ok_or(ArticleError::NotFound { id })
    }

    /// Loads the article backing the edit form. Shares `article:<id>` with
    /// [`get_by_id`](Self::get_by_id).
    pub async fn edit_form(&self, id: i64) -> Result<ArticleRecord, ArticleError> {
        self.require(id).await
    }

    pub async fn create(
        &self,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<ArticleRecord, ArticleError> {
        let article = NewArticle::new(title, body)?;
        let created = self.repo.insert(article).await?;

        forget(self.cache.as_ref(), &CacheKey::ArticleAll).await?;

        info!(
            target: "folio::articles",
            article_id = created.id,
            "article created"
        );
        Ok(created)
    }

    /// Overwrites title and body. The existing record is read from the
    /// repository, not the cache. Fields are not validated here.
    pub async fn update(
        &self,
        id: i64,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<ArticleRecord, ArticleError> {
        let outcome = match self.repo.find_by_id(id).await? {
            Some(mut article) => {
                article.title = title.into();
                article.body = body.into();
                self.repo.save(&article).await
            }
            None => Err(RepoError::NotFound),
        };

        let updated = self.settle_write(id, outcome).await?;
        info!(
            target: "folio::articles",
            article_id = id,
            "article updated"
        );
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ArticleError> {
        let outcome = self.repo.delete_by_id(id).await;
        self.settle_write(id, outcome).await?;
        info!(
            target: "folio::articles",
            article_id = id,
            "article deleted"
        );
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), ArticleError> {
        self.repo.health_check().await.map_err(ArticleError::from)
    }

    /// Evicts the keys a write to `id` touches once the repository has
    /// either applied it or reported the article missing. Other repository
    /// failures return before any eviction.
    async fn settle_write<T>(
        &self,
        id: i64,
        outcome: Result<T, RepoError>,
    ) -> Result<T, ArticleError> {
        match outcome {
            Ok(value) => {
                self.evict(id).await?;
                Ok(value)
            }
            Err(RepoError::NotFound) => {
                self.evict(id).await?;
                Err(ArticleError::NotFound { id })
            }
            Err(other) => Err(ArticleError::from_repo(other, id)),
        }
    }

    async fn evict(&self, id: i64) -> Result<(), CacheError> {
        forget(self.cache.as_ref(), &CacheKey::Article(id)).await?;
        forget(self.cache.as_ref(), &CacheKey::ArticleAll).await
    }
}
