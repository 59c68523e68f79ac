use std::sync::Arc;
use std::time::Duration;

use folio::application::articles::{ArticleError, ArticleService};
use folio::application::repos::{ArticlesRepo, RepoError};
use folio::application::seed::seed_articles;
use folio::cache::CacheStore;
use folio::domain::articles::NewArticle;
use folio::infra::db::{PostgresCacheStore, PostgresRepositories};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn articles_round_trip_through_postgres(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);

    let first = repos
        .insert(NewArticle::new("First", "one").unwrap())
        .await
        .expect("insert first");
    let second = repos
        .insert(NewArticle::new("Second", "two").unwrap())
        .await
        .expect("insert second");

    let all = repos.find_all().await.expect("list");
    assert_eq!(
        all.iter().map(|a| a.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );

    let mut edited = first.clone();
    edited.title = "First, edited".to_string();
    let saved = repos.save(&edited).await.expect("save");
    assert_eq!(saved.title, "First, edited");
    assert_eq!(saved.created_at, first.created_at);
    assert!(saved.updated_at >= first.updated_at);

    repos.delete_by_id(first.id).await.expect("delete");
    assert!(repos.find_by_id(first.id).await.unwrap().is_none());
    assert!(matches!(
        repos.delete_by_id(first.id).await,
        Err(RepoError::NotFound)
    ));
    assert!(matches!(repos.save(&edited).await, Err(RepoError::NotFound)));
}

#[sqlx::test(migrations = "./migrations")]
async fn database_cache_store_honours_ttl(pool: PgPool) {
    let store = PostgresCacheStore::new(PostgresRepositories::new(pool));

    store.set_forever("article:all", json!([1])).await.unwrap();
    store
        .put("article:9", json!(null), Some(Duration::from_millis(1)))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(store.get("article:all").await.unwrap(), Some(json!([1])));
    assert_eq!(store.get("article:9").await.unwrap(), None);
    assert_eq!(store.purge_expired().await.unwrap(), 1);

    store.set_forever("article:all", json!([2])).await.unwrap();
    assert_eq!(store.get("article:all").await.unwrap(), Some(json!([2])));

    assert!(store.forget("article:all").await.unwrap());
    assert!(!store.forget("article:all").await.unwrap());

    store.set_forever("article:1", json!({})).await.unwrap();
    store.flush().await.unwrap();
    assert_eq!(store.get("article:1").await.unwrap(), None);
}

#[sqlx::test(migrations = "./migrations")]
async fn service_over_postgres_keeps_cache_consistent(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let cache = Arc::new(PostgresCacheStore::new(repos.clone()));
    let service = ArticleService::new(Arc::new(repos.clone()), cache.clone());

    let seeded = seed_articles(&repos).await.expect("seed");
    assert_eq!(seeded.len(), 5);

    let listed = service.list_all().await.unwrap();
    assert_eq!(listed, seeded);
    assert!(cache.get("article:all").await.unwrap().is_some());

    service.update(seeded[0].id, "Renamed", "body").await.unwrap();
    assert!(cache.get("article:all").await.unwrap().is_none());
    assert_eq!(service.list_all().await.unwrap()[0].title, "Renamed");

    let err = service.delete(i64::MAX).await.unwrap_err();
    assert!(matches!(err, ArticleError::NotFound { .. }));
}
