//! Process-local article store used when no database is configured.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::application::repos::{ArticlesRepo, RepoError};
use crate::domain::articles::NewArticle;
use crate::domain::entities::ArticleRecord;

#[derive(Default)]
struct State {
    next_id: i64,
    articles: BTreeMap<i64, ArticleRecord>,
}

/// Articles keyed by id. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryRepositories {
    state: Mutex<State>,
    unavailable: AtomicBool,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail with a persistence error until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), RepoError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("article store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl ArticlesRepo for InMemoryRepositories {
    async fn find_all(&self) -> Result<Vec<ArticleRecord>, RepoError> {
        self.ensure_available()?;
        let state = self.state.lock().await;
        let mut articles: Vec<_> = state.articles.values().cloned().collect();
        articles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(articles)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ArticleRecord>, RepoError> {
        self.ensure_available()?;
        Ok(self.state.lock().await.articles.get(&id).cloned())
    }

    async fn insert(&self, article: NewArticle) -> Result<ArticleRecord, RepoError> {
        self.ensure_available()?;
        let (title, body) = article.into_parts();
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let now = OffsetDateTime::now_utc();
        let record = ArticleRecord {
            id: state.next_id,
            title,
            body,
            created_at: now,
            updated_at: now,
        };
        state.articles.insert(record.id, record.clone());
        Ok(record)
    }

    async fn save(&self, article: &ArticleRecord) -> Result<ArticleRecord, RepoError> {
        self.ensure_available()?;
        let mut state = self.state.lock().await;
        let stored = state
            .articles
            .get_mut(&article.id)
            .ok_or(RepoError::NotFound)?;
        stored.title = article.title.clone();
        stored.body = article.body.clone();
        stored.updated_at = OffsetDateTime::now_utc();
        Ok(stored.clone())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), RepoError> {
        self.ensure_available()?;
        self.state
            .lock()
            .await
            .articles
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        self.ensure_available()
    }
}
