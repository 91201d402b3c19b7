//! Integration tests for the single-flight cache lifecycle

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use kolink_core::build;
use kolink_engine::{
    AutomatonCache, AutomatonSource, CacheStatus, FormatHint, LoadError, LoaderConfig, Linker,
};
use tokio::sync::Semaphore;

/// Source that counts fetches and blocks each one until released
#[derive(Debug)]
struct GatedSource {
    payload: Option<Vec<u8>>,
    fetches: Arc<AtomicUsize>,
    gate: Arc<Semaphore>,
}

impl GatedSource {
    fn serving(payload: Vec<u8>) -> Self {
        Self {
            payload: Some(payload),
            fetches: Arc::new(AtomicUsize::new(0)),
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    fn failing() -> Self {
        Self {
            payload: None,
            ..Self::serving(Vec::new())
        }
    }
}

impl AutomatonSource for GatedSource {
    fn fetch(&self) -> BoxFuture<'static, kolink_engine::Result<Vec<u8>>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let payload = self.payload.clone();
        let gate = Arc::clone(&self.gate);
        async move {
            let _permit = gate
                .acquire()
                .await
                .map_err(|_| LoadError::Source("gate closed".to_string()))?;
            payload.ok_or_else(|| LoadError::Source("network unreachable".to_string()))
        }
        .boxed()
    }

    fn describe(&self) -> String {
        "gated test source".to_string()
    }
}

fn greeting_payload() -> Vec<u8> {
    build([("id1", "안녕"), ("id2", "안녕하세요")])
        .unwrap()
        .to_binary()
        .unwrap()
}

/// Wait until the cache leaves the loading state
async fn settled(cache: &AutomatonCache) {
    for _ in 0..200 {
        if cache.status() != CacheStatus::Loading {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("cache still loading");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_loads_fetch_once() {
    let source = GatedSource::serving(greeting_payload());
    let fetches = Arc::clone(&source.fetches);
    let gate = Arc::clone(&source.gate);
    let cache = Arc::new(AutomatonCache::new(source));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.load().await })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(cache.status(), CacheStatus::Loading);
    assert!(cache.snapshot().is_empty());

    gate.add_permits(16);
    let mut loaded = Vec::new();
    for handle in handles {
        loaded.push(handle.await.unwrap());
    }

    assert_eq!(fetches.load(Ordering::SeqCst), 1);
    assert!(loaded.iter().all(|automaton| Arc::ptr_eq(automaton, &loaded[0])));
    assert_eq!(cache.status(), CacheStatus::Ready);
    assert!(cache.is_loaded());
}

#[tokio::test]
async fn test_failed_source_degrades_to_empty() {
    let source = GatedSource::failing();
    let fetches = Arc::clone(&source.fetches);
    source.gate.add_permits(8);
    let cache = AutomatonCache::new(source);

    assert!(cache.load().await.is_empty());
    assert_eq!(cache.status(), CacheStatus::Failed);
    assert!(!cache.is_loaded());
    assert_eq!(
        cache.failure().as_deref(),
        Some("source unavailable: network unreachable")
    );

    // Failure is sticky: no retry
    assert!(cache.load().await.is_empty());
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_reset_then_reload_fetches_again() {
    let source = GatedSource::serving(greeting_payload());
    let fetches = Arc::clone(&source.fetches);
    source.gate.add_permits(8);
    let cache = AutomatonCache::new(source);

    cache.load().await;
    assert_eq!(cache.status(), CacheStatus::Ready);

    cache.reset();
    assert_eq!(cache.status(), CacheStatus::Uninitialized);
    assert!(cache.snapshot().is_empty());

    cache.load().await;
    assert_eq!(cache.status(), CacheStatus::Ready);
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stale_load_does_not_overwrite_reset() {
    let source = GatedSource::serving(greeting_payload());
    let gate = Arc::clone(&source.gate);
    let cache = Arc::new(AutomatonCache::new(source));

    let stale = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move { cache.load().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(cache.status(), CacheStatus::Loading);

    cache.reset();
    gate.add_permits(1);

    // The stale caller still gets its automaton
    assert!(!stale.await.unwrap().is_empty());
    assert_eq!(cache.status(), CacheStatus::Uninitialized);
}

#[tokio::test]
async fn test_linker_reads_json_file() {
    let automaton = build([("asia", "아시아"), ("si", "시")]).unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&automaton.to_json_pretty().unwrap()).unwrap();

    let linker = Linker::from_config(&LoaderConfig::for_path(file.path()));
    let spans = linker.find_async("아시아는 크다", None).await;
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].expression, "아시아");
}

#[tokio::test]
async fn test_linker_missing_file_renders_plain() {
    let config = LoaderConfig {
        path: "/nonexistent/kolink/trie.bin".into(),
        format: FormatHint::Binary,
    };
    let linker = Linker::from_config(&config);
    assert!(linker.find_async("아시아", None).await.is_empty());
    assert_eq!(linker.status(), CacheStatus::Failed);
    assert!(linker
        .cache()
        .failure()
        .unwrap()
        .contains("/nonexistent/kolink/trie.bin"));
}
