//! Linking facade over a shared cache

use std::sync::Arc;

use kolink_core::MatchSpan;

use crate::cache::{AutomatonCache, CacheStatus};
use crate::config::LoaderConfig;

/// Load the automaton if needed, then scan `text`
///
/// Callers racing on a cold cache share one load. If loading fails, the
/// result is empty.
pub async fn load_then_scan(
    cache: &AutomatonCache,
    text: &str,
    exclude: Option<&str>,
) -> Vec<MatchSpan> {
    cache.load().await.scan(text, exclude)
}

/// Finds linkable expressions using a lazily loaded automaton
///
/// Cloning a `Linker` shares its cache.
#[derive(Debug, Clone)]
pub struct Linker {
    cache: Arc<AutomatonCache>,
}

impl Linker {
    /// Linker over an existing cache
    pub fn new(cache: Arc<AutomatonCache>) -> Self {
        Self { cache }
    }

    /// Linker reading the file named by `config`
    pub fn from_config(config: &LoaderConfig) -> Self {
        let cache = AutomatonCache::with_format(config.source(), config.format);
        Self::new(Arc::new(cache))
    }

    /// Scan with whatever is cached now
    ///
    /// Before the automaton is ready this finds nothing, so text renders
    /// without links.
    pub fn find(&self, text: &str, exclude: Option<&str>) -> Vec<MatchSpan> {
        self.cache.snapshot().scan(text, exclude)
    }

    /// Wait for the automaton, then scan
    pub async fn find_async(&self, text: &str, exclude: Option<&str>) -> Vec<MatchSpan> {
        load_then_scan(&self.cache, text, exclude).await
    }

    /// Start loading without scanning anything
    pub async fn preload(&self) {
        self.cache.load().await;
    }

    /// True once a non-empty automaton is ready
    pub fn is_loaded(&self) -> bool {
        self.cache.is_loaded()
    }

    /// Lifecycle state of the underlying cache
    pub fn status(&self) -> CacheStatus {
        self.cache.status()
    }

    /// The shared cache
    pub fn cache(&self) -> &Arc<AutomatonCache> {
        &self.cache
    }
}
