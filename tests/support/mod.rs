#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use folio::application::articles::{ArticleCachePolicy, ArticleService};
use folio::application::repos::{ArticlesRepo, RepoError};
use folio::cache::{CacheError, CacheStore, MemoryCacheStore};
use folio::domain::articles::NewArticle;
use folio::domain::entities::ArticleRecord;
use folio::infra::memory::InMemoryRepositories;
use serde_json::Value;

/// In-memory article store that counts every query and write.
#[derive(Default)]
pub struct CountingRepo {
    inner: InMemoryRepositories,
    pub find_all_calls: AtomicUsize,
    pub find_by_id_calls: AtomicUsize,
    pub writes: AtomicUsize,
}

impl CountingRepo {
    pub fn queries(&self) -> usize {
        self.find_all_calls.load(Ordering::SeqCst) + self.find_by_id_calls.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.set_unavailable(unavailable);
    }
}

#[async_trait]
impl ArticlesRepo for CountingRepo {
    async fn find_all(&self) -> Result<Vec<ArticleRecord>, RepoError> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ArticleRecord>, RepoError> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, article: NewArticle) -> Result<ArticleRecord, RepoError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(article).await
    }

    async fn save(&self, article: &ArticleRecord) -> Result<ArticleRecord, RepoError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.save(article).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), RepoError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_by_id(id).await
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        self.inner.health_check().await
    }
}

/// Memory cache that records which keys were written and forgotten.
#[derive(Default)]
pub struct RecordingCache {
    inner: MemoryCacheStore,
    pub puts: Mutex<Vec<(String, Option<Duration>)>>,
    pub forgotten: Mutex<Vec<String>>,
}

impl RecordingCache {
    pub fn forgotten(&self) -> Vec<String> {
        self.forgotten.lock().unwrap().clone()
    }

    pub fn puts(&self) -> Vec<(String, Option<Duration>)> {
        self.puts.lock().unwrap().clone()
    }

    pub fn clear_log(&self) {
        self.puts.lock().unwrap().clear();
        self.forgotten.lock().unwrap().clear();
    }
}

#[async_trait]
impl CacheStore for RecordingCache {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<(), CacheError> {
        self.puts.lock().unwrap().push((key.to_string(), ttl));
        self.inner.put(key, value, ttl).await
    }

    async fn forget(&self, key: &str) -> Result<bool, CacheError> {
        self.forgotten.lock().unwrap().push(key.to_string());
        self.inner.forget(key).await
    }

    async fn flush(&self) -> Result<(), CacheError> {
        self.inner.flush().await
    }

    async fn purge_expired(&self) -> Result<u64, CacheError> {
        self.inner.purge_expired().await
    }
}

pub struct Harness {
    pub service: ArticleService,
    pub repo: Arc<CountingRepo>,
    pub cache: Arc<RecordingCache>,
}

pub fn harness() -> Harness {
    harness_with(ArticleCachePolicy::default())
}

pub fn harness_with(policy: ArticleCachePolicy) -> Harness {
    let repo = Arc::new(CountingRepo::default());
    let cache = Arc::new(RecordingCache::default());
    let service = ArticleService::new(repo.clone(), cache.clone()).with_policy(policy);
    Harness {
        service,
        repo,
        cache,
    }
}
