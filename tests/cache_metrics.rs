use std::sync::Arc;

use folio::application::articles::ArticleService;
use folio::cache::{METRIC_CACHE_FORGET, METRIC_CACHE_HIT, METRIC_CACHE_MISS, MemoryCacheStore};
use folio::infra::memory::InMemoryRepositories;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

fn counter_value(
    snapshot: &[(
        metrics_util::CompositeKey,
        Option<metrics::Unit>,
        Option<metrics::SharedString>,
        DebugValue,
    )],
    name: &str,
    kind: &str,
) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|label| label.key() == "key_kind" && label.value() == kind)
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(count) => *count,
            _ => 0,
        })
        .sum()
}

#[tokio::test]
async fn cache_paths_emit_expected_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let service = ArticleService::new(
        Arc::new(InMemoryRepositories::new()),
        Arc::new(MemoryCacheStore::new()),
    );

    let created = service.create("Counted", "body").await.unwrap();
    service.list_all().await.unwrap();
    service.list_all().await.unwrap();
    service.get_by_id(created.id).await.unwrap();
    service.get_by_id(created.id).await.unwrap();
    service.delete(created.id).await.unwrap();

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_value(&snapshot, METRIC_CACHE_MISS, "collection"), 1);
    assert_eq!(counter_value(&snapshot, METRIC_CACHE_HIT, "collection"), 1);
    assert_eq!(counter_value(&snapshot, METRIC_CACHE_MISS, "item"), 1);
    assert_eq!(counter_value(&snapshot, METRIC_CACHE_HIT, "item"), 1);
    // create forgets the collection; delete forgets the item and the collection.
    assert_eq!(counter_value(&snapshot, METRIC_CACHE_FORGET, "collection"), 2);
    assert_eq!(counter_value(&snapshot, METRIC_CACHE_FORGET, "item"), 1);
}
