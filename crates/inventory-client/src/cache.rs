//! # Query Cache
//!
//! Keyed cache in front of every remote read.
//!
//! ## Entry Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   (absent) ──fetch──► Pending ──ok──► Success ──invalidate──► (absent)  │
//! │                          │                                              │
//! │                          └──err──► Error ─────invalidate──► (absent)    │
//! │                                                                         │
//! │   fetch on Pending  : attach to the in-flight request (no new call)    │
//! │   fetch on Success  : return the cached value (no call)                │
//! │   fetch on Error    : return the cached error (no call, no retry)      │
//! │   refetch           : discard, then fetch                              │
//! │   last subscriber   : a Pending entry is discarded ("cancel on         │
//! │   dropped             unmount"); Success / Error entries are kept      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The entry map sits behind a `std::sync::Mutex` that is never held across
//! an `.await`. The in-flight request is a [`Shared`] future: every reader of
//! a Pending entry polls the same future, so the underlying call runs once
//! and all readers get the same value. The future is dropped once no reader
//! holds it any more.
//!
//! Every entry carries a generation number. A resolving request only writes
//! its result back if the entry it created is still the one in the map, so a
//! request that was invalidated or cancelled mid-flight cannot resurrect
//! stale data.
//!
//! ## Events
//! Every transition is published as a [`CacheEvent`] on a broadcast channel,
//! after the lock has been released.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult, QueryError};
use crate::key::QueryKey;

/// Capacity of the event channel. Slow receivers lose the oldest events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

type Erased = Arc<dyn Any + Send + Sync>;
type FetchOutcome = Result<Erased, Arc<ClientError>>;
type InFlight = Shared<BoxFuture<'static, FetchOutcome>>;

// =============================================================================
// Public State Types
// =============================================================================

/// Status of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Pending,
    Success,
    Error,
}

/// What a reader sees when it looks at a key without fetching.
#[derive(Debug, Clone)]
pub enum QueryState<T> {
    /// Nothing cached and nothing in flight.
    Idle,
    /// A request is in flight.
    Loading,
    Ready(Arc<T>),
    Failed(QueryError),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    /// The value, if ready.
    pub fn data(&self) -> Option<&Arc<T>> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// A cache transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A request for this key started.
    Loading(QueryKey),
    /// The request resolved and the value is cached.
    Resolved(QueryKey),
    /// The request failed; the entry now holds the error.
    Failed { key: QueryKey, message: String },
    /// The entry was discarded by `invalidate` or `refetch`.
    Invalidated(QueryKey),
    /// A Pending entry was discarded because its last subscriber left.
    Cancelled(QueryKey),
}

impl CacheEvent {
    pub fn key(&self) -> &QueryKey {
        match self {
            CacheEvent::Loading(key)
            | CacheEvent::Resolved(key)
            | CacheEvent::Invalidated(key)
            | CacheEvent::Cancelled(key) => key,
            CacheEvent::Failed { key, .. } => key,
        }
    }
}

// =============================================================================
// Internal State
// =============================================================================

enum Slot {
    Pending(InFlight),
    Success(Erased),
    Error(Arc<ClientError>),
}

struct Entry {
    slot: Slot,
    generation: u64,
    updated_at: DateTime<Utc>,
}

impl Entry {
    fn status(&self) -> EntryStatus {
        match self.slot {
            Slot::Pending(_) => EntryStatus::Pending,
            Slot::Success(_) => EntryStatus::Success,
            Slot::Error(_) => EntryStatus::Error,
        }
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<QueryKey, Entry>,
    // Kept apart from entries so counts survive invalidation.
    subscribers: HashMap<QueryKey, usize>,
    next_generation: u64,
}

struct CacheState {
    inner: Mutex<Inner>,
    events: broadcast::Sender<CacheEvent>,
}

impl CacheState {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, events: Vec<CacheEvent>) {
        for event in events {
            // No receivers is fine
            let _ = self.events.send(event);
        }
    }
}

// =============================================================================
// Query Cache
// =============================================================================

/// Keyed, de-duplicating cache of remote reads.
///
/// Cloning is cheap; clones share the same entries.
#[derive(Clone)]
pub struct QueryCache {
    shared: Arc<CacheState>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        QueryCache {
            shared: Arc::new(CacheState {
                inner: Mutex::new(Inner::default()),
                events,
            }),
        }
    }

    /// Receives every transition from now on.
    pub fn events(&self) -> broadcast::Receiver<CacheEvent> {
        self.shared.events.subscribe()
    }

    /// Returns the value for `key`, calling `fetcher` only if nothing is
    /// cached or in flight.
    ///
    /// `fetcher` is invoked at most once, synchronously, while the cache is
    /// locked; it must only build the future, not touch the cache.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
    {
        let (in_flight, generation, started) = {
            let mut inner = self.shared.lock();
            if let Some(entry) = inner.entries.get(&key) {
                match &entry.slot {
                    Slot::Success(value) => {
                        debug!(key = %key, "Cache hit");
                        return downcast(&key, Arc::clone(value));
                    }
                    Slot::Error(err) => {
                        debug!(key = %key, "Cached error");
                        return Err(QueryError::Fetch(Arc::clone(err)));
                    }
                    Slot::Pending(in_flight) => {
                        debug!(key = %key, "Joining in-flight request");
                        (in_flight.clone(), entry.generation, false)
                    }
                }
            } else {
                let in_flight = erase(fetcher());
                let generation = inner.next_generation;
                inner.next_generation += 1;
                inner.entries.insert(
                    key.clone(),
                    Entry {
                        slot: Slot::Pending(in_flight.clone()),
                        generation,
                        updated_at: Utc::now(),
                    },
                );
                (in_flight, generation, true)
            }
        };

        if started {
            debug!(key = %key, "Cache miss, fetching");
            self.shared.publish(vec![CacheEvent::Loading(key.clone())]);
        }

        let outcome = in_flight.await;
        self.settle(&key, generation, &outcome);

        match outcome {
            Ok(value) => downcast(&key, value),
            Err(err) => Err(QueryError::Fetch(err)),
        }
    }

    /// Discards `key` and fetches it again.
    pub async fn refetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
    {
        let removed = self.shared.lock().entries.remove(&key).is_some();
        if removed {
            self.shared.publish(vec![CacheEvent::Invalidated(key.clone())]);
        }
        self.fetch(key, fetcher).await
    }

    /// Discards every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries discarded. Requests already in flight
    /// still answer their current readers but are not cached.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let removed: Vec<QueryKey> = {
            let mut inner = self.shared.lock();
            let keys: Vec<QueryKey> = inner
                .entries
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect();
            for key in &keys {
                inner.entries.remove(key);
            }
            keys
        };

        debug!(prefix = %prefix, count = removed.len(), "Invalidated cache entries");
        let count = removed.len();
        self.shared
            .publish(removed.into_iter().map(CacheEvent::Invalidated).collect());
        count
    }

    /// Current state of `key` without fetching.
    pub fn peek<T>(&self, key: &QueryKey) -> QueryState<T>
    where
        T: Send + Sync + 'static,
    {
        let inner = self.shared.lock();
        match inner.entries.get(key).map(|e| &e.slot) {
            None => QueryState::Idle,
            Some(Slot::Pending(_)) => QueryState::Loading,
            Some(Slot::Success(value)) => match downcast(key, Arc::clone(value)) {
                Ok(value) => QueryState::Ready(value),
                Err(err) => QueryState::Failed(err),
            },
            Some(Slot::Error(err)) => QueryState::Failed(QueryError::Fetch(Arc::clone(err))),
        }
    }

    /// Registers interest in `key` for as long as the guard lives.
    pub fn subscribe(&self, key: QueryKey) -> QuerySubscription {
        *self.shared.lock().subscribers.entry(key.clone()).or_insert(0) += 1;
        QuerySubscription {
            shared: Arc::clone(&self.shared),
            key,
        }
    }

    pub fn subscriber_count(&self, key: &QueryKey) -> usize {
        self.shared
            .lock()
            .subscribers
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    pub fn status(&self, key: &QueryKey) -> Option<EntryStatus> {
        self.shared.lock().entries.get(key).map(Entry::status)
    }

    /// When the entry last changed state.
    pub fn updated_at(&self, key: &QueryKey) -> Option<DateTime<Utc>> {
        self.shared.lock().entries.get(key).map(|e| e.updated_at)
    }

    /// Number of entries in any state.
    pub fn len(&self) -> usize {
        self.shared.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes a resolved request back, if its entry is still current.
    fn settle(&self, key: &QueryKey, generation: u64, outcome: &FetchOutcome) {
        let event = {
            let mut inner = self.shared.lock();
            let Some(entry) = inner.entries.get_mut(key) else {
                return;
            };
            if entry.generation != generation || !matches!(entry.slot, Slot::Pending(_)) {
                return;
            }

            entry.updated_at = Utc::now();
            match outcome {
                Ok(value) => {
                    entry.slot = Slot::Success(Arc::clone(value));
                    CacheEvent::Resolved(key.clone())
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "Query failed");
                    entry.slot = Slot::Error(Arc::clone(err));
                    CacheEvent::Failed {
                        key: key.clone(),
                        message: err.user_message().to_string(),
                    }
                }
            }
        };
        self.shared.publish(vec![event]);
    }
}

fn erase<T, Fut>(fut: Fut) -> InFlight
where
    T: Send + Sync + 'static,
    Fut: Future<Output = ClientResult<T>> + Send + 'static,
{
    async move {
        fut.await
            .map(|value| Arc::new(value) as Erased)
            .map_err(Arc::new)
    }
    .boxed()
    .shared()
}

fn downcast<T>(key: &QueryKey, value: Erased) -> Result<Arc<T>, QueryError>
where
    T: Send + Sync + 'static,
{
    value.downcast::<T>().map_err(|_| QueryError::TypeMismatch {
        key: key.to_string(),
    })
}

// =============================================================================
// Subscription Guard
// =============================================================================

/// Interest in one key. Dropping the last subscription of a key whose
/// request is still in flight discards that entry.
pub struct QuerySubscription {
    shared: Arc<CacheState>,
    key: QueryKey,
}

impl QuerySubscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl std::fmt::Debug for QuerySubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySubscription")
            .field("key", &self.key)
            .finish()
    }
}

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        let cancelled = {
            let mut inner = self.shared.lock();
            let remaining = match inner.subscribers.get_mut(&self.key) {
                Some(count) => {
                    *count = count.saturating_sub(1);
                    *count
                }
                None => 0,
            };
            if remaining > 0 {
                return;
            }
            inner.subscribers.remove(&self.key);

            let pending = matches!(
                inner.entries.get(&self.key),
                Some(Entry {
                    slot: Slot::Pending(_),
                    ..
                })
            );
            if pending {
                inner.entries.remove(&self.key);
            }
            pending
        };

        if cancelled {
            debug!(key = %self.key, "Last subscriber left, cancelling request");
            self.shared
                .publish(vec![CacheEvent::Cancelled(self.key.clone())]);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::PRODUCTS;
    use inventory_core::PageRequest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn counting_fetch(
        calls: &Arc<AtomicUsize>,
        value: u32,
    ) -> impl FnOnce() -> futures_util::future::Ready<ClientResult<u32>> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            futures_util::future::ready(Ok(value))
        }
    }

    fn page(n: u32) -> QueryKey {
        QueryKey::products(PageRequest::new(n, 10))
    }

    #[tokio::test]
    async fn test_concurrent_reads_share_one_call() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());

        let fetcher = |calls: Arc<AtomicUsize>, gate: Arc<Notify>| {
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    gate.notified().await;
                    Ok::<_, ClientError>(vec![1u32, 2, 3])
                }
            }
        };

        let (a, b, ()) = tokio::join!(
            cache.fetch(page(1), fetcher(Arc::clone(&calls), Arc::clone(&gate))),
            cache.fetch(page(1), fetcher(Arc::clone(&calls), Arc::clone(&gate))),
            async { gate.notify_one() },
        );

        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_resolved_value_is_served_from_cache() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache.fetch(page(1), counting_fetch(&calls, 7)).await.unwrap();
        let second = cache.fetch(page(1), counting_fetch(&calls, 8)).await.unwrap();

        assert_eq!((*first, *second), (7, 7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.status(&page(1)), Some(EntryStatus::Success));
        assert!(cache.updated_at(&page(1)).is_some());
    }

    #[tokio::test]
    async fn test_invalidate_prefix_forces_refetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.fetch(page(1), counting_fetch(&calls, 1)).await.unwrap();
        cache.fetch(page(2), counting_fetch(&calls, 2)).await.unwrap();
        let other = QueryKey::new("categories");
        cache.fetch(other.clone(), counting_fetch(&calls, 3)).await.unwrap();

        assert_eq!(cache.invalidate(&QueryKey::new(PRODUCTS)), 2);
        assert_eq!(cache.status(&page(1)), None);
        assert_eq!(cache.status(&other), Some(EntryStatus::Success));

        let fresh = cache.fetch(page(1), counting_fetch(&calls, 10)).await.unwrap();
        assert_eq!(*fresh, 10);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_error_is_sticky_until_invalidated() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let failing = {
            let calls = Arc::clone(&calls);
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                futures_util::future::ready(Err::<u32, _>(ClientError::Status {
                    status: 500,
                    url: "http://x/products".into(),
                }))
            }
        };

        let err = cache.fetch(page(1), failing).await.unwrap_err();
        assert_eq!(err.user_message(), "Network response was not ok");

        // Second read returns the same error without calling out
        let again = cache.fetch(page(1), counting_fetch(&calls, 1)).await;
        assert!(again.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(cache.peek::<u32>(&page(1)), QueryState::Failed(_)));

        let recovered = cache.refetch(page(1), counting_fetch(&calls, 5)).await.unwrap();
        assert_eq!(*recovered, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_peek_states() {
        let cache = QueryCache::new();
        assert!(matches!(cache.peek::<u32>(&page(1)), QueryState::Idle));

        let calls = Arc::new(AtomicUsize::new(0));
        cache.fetch(page(1), counting_fetch(&calls, 4)).await.unwrap();

        let state = cache.peek::<u32>(&page(1));
        assert_eq!(state.data().map(|v| **v), Some(4));
    }

    #[tokio::test]
    async fn test_type_mismatch_is_reported() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        cache.fetch(page(1), counting_fetch(&calls, 4)).await.unwrap();

        let wrong = cache
            .fetch(page(1), || futures_util::future::ready(Ok(String::new())))
            .await;
        assert!(matches!(wrong, Err(QueryError::TypeMismatch { .. })));
        assert!(matches!(
            cache.peek::<String>(&page(1)),
            QueryState::Failed(QueryError::TypeMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_last_unsubscribe_cancels_pending() {
        let cache = QueryCache::new();
        let mut events = cache.events();
        let gate = Arc::new(Notify::new());

        let sub = cache.subscribe(page(1));
        let other = cache.subscribe(page(1));
        assert_eq!(cache.subscriber_count(&page(1)), 2);

        let waiting = {
            let gate = Arc::clone(&gate);
            cache.fetch(page(1), move || async move {
                gate.notified().await;
                Ok::<_, ClientError>(1u32)
            })
        };
        tokio::pin!(waiting);
        assert!(futures_util::poll!(&mut waiting).is_pending());
        assert!(cache.peek::<u32>(&page(1)).is_loading());

        drop(other);
        assert_eq!(cache.status(&page(1)), Some(EntryStatus::Pending));
        drop(sub);
        assert_eq!(cache.status(&page(1)), None);
        assert_eq!(cache.subscriber_count(&page(1)), 0);

        // The reader still gets its answer, but nothing is cached
        gate.notify_one();
        assert_eq!(*waiting.await.unwrap(), 1);
        assert_eq!(cache.status(&page(1)), None);

        assert_eq!(events.recv().await.unwrap(), CacheEvent::Loading(page(1)));
        assert_eq!(events.recv().await.unwrap(), CacheEvent::Cancelled(page(1)));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unsubscribe_keeps_resolved_entry() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let sub = cache.subscribe(page(1));
        cache.fetch(page(1), counting_fetch(&calls, 3)).await.unwrap();
        drop(sub);

        assert_eq!(cache.status(&page(1)), Some(EntryStatus::Success));
    }

    #[tokio::test]
    async fn test_events_follow_transitions() {
        let cache = QueryCache::new();
        let mut events = cache.events();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.fetch(page(3), counting_fetch(&calls, 1)).await.unwrap();
        cache.invalidate(&page(3));

        assert_eq!(events.recv().await.unwrap(), CacheEvent::Loading(page(3)));
        assert_eq!(events.recv().await.unwrap(), CacheEvent::Resolved(page(3)));
        let last = events.recv().await.unwrap();
        assert_eq!(last, CacheEvent::Invalidated(page(3)));
        assert_eq!(last.key(), &page(3));
    }
}
