//! Single-flight automaton cache
//!
//! The cache moves through explicit states:
//!
//! ```text
//! Uninitialized --load--> Loading --ok--> Ready(automaton)
//!                                 \--err--> Failed(empty automaton)
//! ```
//!
//! Every caller arriving while a load is in flight awaits the same shared
//! future, so the source is fetched once. A failure is logged and the cache
//! stays degraded to an empty automaton until [`AutomatonCache::reset`].

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use kolink_core::Automaton;
use parking_lot::Mutex;

use crate::config::FormatHint;
use crate::error::LoadError;
use crate::source::AutomatonSource;

type LoadOutcome = Result<Arc<Automaton>, Arc<LoadError>>;
type LoadFuture = Shared<BoxFuture<'static, LoadOutcome>>;

/// Observable lifecycle state of an [`AutomatonCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// No load has been requested
    Uninitialized,
    /// A load is in flight
    Loading,
    /// The automaton is available
    Ready,
    /// Loading failed; scans see an empty automaton
    Failed,
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CacheStatus::Uninitialized => "uninitialized",
            CacheStatus::Loading => "loading",
            CacheStatus::Ready => "ready",
            CacheStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

enum SlotState {
    Uninitialized,
    Loading(LoadFuture),
    Ready(Arc<Automaton>),
    Failed(Arc<LoadError>),
}

struct Slot {
    /// Bumped by every reset so that stale loads cannot settle the slot
    generation: u64,
    state: SlotState,
}

/// Owned, explicitly passed automaton cache
pub struct AutomatonCache {
    source: Arc<dyn AutomatonSource>,
    format: FormatHint,
    empty: Arc<Automaton>,
    slot: Mutex<Slot>,
}

impl fmt::Debug for AutomatonCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutomatonCache")
            .field("source", &self.source)
            .field("format", &self.format)
            .field("status", &self.status())
            .finish()
    }
}

impl AutomatonCache {
    /// Cache over `source`, detecting the payload format
    pub fn new<S>(source: S) -> Self
    where
        S: AutomatonSource + 'static,
    {
        Self::with_format(source, FormatHint::Auto)
    }

    /// Cache over `source` decoding with `format`
    pub fn with_format<S>(source: S, format: FormatHint) -> Self
    where
        S: AutomatonSource + 'static,
    {
        Self {
            source: Arc::new(source),
            format,
            empty: Arc::new(Automaton::empty()),
            slot: Mutex::new(Slot {
                generation: 0,
                state: SlotState::Uninitialized,
            }),
        }
    }

    /// Current lifecycle state
    pub fn status(&self) -> CacheStatus {
        match self.slot.lock().state {
            SlotState::Uninitialized => CacheStatus::Uninitialized,
            SlotState::Loading(_) => CacheStatus::Loading,
            SlotState::Ready(_) => CacheStatus::Ready,
            SlotState::Failed(_) => CacheStatus::Failed,
        }
    }

    /// True once a non-empty automaton is ready
    pub fn is_loaded(&self) -> bool {
        matches!(&self.slot.lock().state, SlotState::Ready(automaton) if !automaton.is_empty())
    }

    /// Reason of the last failed load, if the cache is in the failed state
    pub fn failure(&self) -> Option<String> {
        match &self.slot.lock().state {
            SlotState::Failed(error) => Some(error.to_string()),
            _ => None,
        }
    }

    /// Whatever is cached right now; never waits
    ///
    /// Anything but a ready cache yields an empty automaton.
    pub fn snapshot(&self) -> Arc<Automaton> {
        match &self.slot.lock().state {
            SlotState::Ready(automaton) => Arc::clone(automaton),
            _ => Arc::clone(&self.empty),
        }
    }

    /// Load the automaton, or wait for the load already in flight
    ///
    /// Never fails: a failed load yields an empty automaton.
    pub async fn load(&self) -> Arc<Automaton> {
        let (pending, generation) = {
            let mut slot = self.slot.lock();
            let in_flight = match &slot.state {
                SlotState::Ready(automaton) => return Arc::clone(automaton),
                SlotState::Failed(_) => return Arc::clone(&self.empty),
                SlotState::Loading(pending) => Some(pending.clone()),
                SlotState::Uninitialized => None,
            };
            let pending = match in_flight {
                Some(pending) => pending,
                None => {
                    log::debug!("loading automaton from {}", self.source.describe());
                    let pending = fetch_and_decode(Arc::clone(&self.source), self.format)
                        .boxed()
                        .shared();
                    slot.state = SlotState::Loading(pending.clone());
                    pending
                }
            };
            (pending, slot.generation)
        };

        let outcome = pending.await;
        self.settle(generation, &outcome);

        match outcome {
            Ok(automaton) => automaton,
            Err(_) => Arc::clone(&self.empty),
        }
    }

    /// Forget the cached automaton; the next load fetches again
    ///
    /// A load in flight keeps running for its callers but no longer updates
    /// this cache.
    pub fn reset(&self) {
        let mut slot = self.slot.lock();
        slot.generation += 1;
        slot.state = SlotState::Uninitialized;
        log::debug!("automaton cache reset (generation {})", slot.generation);
    }

    fn settle(&self, generation: u64, outcome: &LoadOutcome) {
        let mut slot = self.slot.lock();
        if slot.generation != generation {
            log::debug!("discarding automaton load from stale generation {generation}");
            return;
        }
        if !matches!(slot.state, SlotState::Loading(_)) {
            return;
        }

        slot.state = match outcome {
            Ok(automaton) => {
                let stats = automaton.stats();
                log::info!(
                    "automaton ready: {} nodes, {} expressions, {} identifiers",
                    stats.node_count,
                    stats.expression_count,
                    stats.identifier_count
                );
                SlotState::Ready(Arc::clone(automaton))
            }
            Err(error) => {
                log::error!(
                    "failed to load automaton from {}: {error}; linking disabled",
                    self.source.describe()
                );
                SlotState::Failed(Arc::clone(error))
            }
        };
    }
}

async fn fetch_and_decode(source: Arc<dyn AutomatonSource>, format: FormatHint) -> LoadOutcome {
    let bytes = source.fetch().await.map_err(Arc::new)?;
    let automaton = format
        .decode(&bytes)
        .map_err(|error| Arc::new(LoadError::from(error)))?;
    Ok(Arc::new(automaton))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use kolink_core::build;

    fn json_source() -> MemorySource {
        let automaton = build([("k", "김")]).unwrap();
        MemorySource::new(automaton.to_json().unwrap())
    }

    #[test]
    fn test_new_cache_is_uninitialized() {
        let cache = AutomatonCache::new(json_source());
        assert_eq!(cache.status(), CacheStatus::Uninitialized);
        assert!(!cache.is_loaded());
        assert!(cache.snapshot().is_empty());
        assert_eq!(cache.failure(), None);
    }

    #[tokio::test]
    async fn test_load_then_ready() {
        let cache = AutomatonCache::new(json_source());
        let automaton = cache.load().await;
        assert_eq!(automaton.stats().expression_count, 1);
        assert_eq!(cache.status(), CacheStatus::Ready);
        assert!(cache.is_loaded());
        assert!(Arc::ptr_eq(&automaton, &cache.snapshot()));
    }

    #[tokio::test]
    async fn test_decode_failure_degrades() {
        let cache = AutomatonCache::new(MemorySource::new(b"[{\"broken\"".to_vec()));
        assert!(cache.load().await.is_empty());
        assert_eq!(cache.status(), CacheStatus::Failed);
        assert!(cache
            .failure()
            .unwrap()
            .starts_with("failed to decode automaton"));
    }

    #[tokio::test]
    async fn test_empty_payload_is_ready_but_not_loaded() {
        let source = MemorySource::new(b"[]".to_vec());
        let cache = AutomatonCache::with_format(source, FormatHint::Json);
        cache.load().await;
        assert_eq!(cache.status(), CacheStatus::Ready);
        assert!(!cache.is_loaded());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(CacheStatus::Loading.to_string(), "loading");
        assert_eq!(CacheStatus::Failed.to_string(), "failed");
    }
}
