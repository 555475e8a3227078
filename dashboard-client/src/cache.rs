//! View state cache
//!
//! Keyed request-result cache for list reads. Mutations never write into it;
//! they mark keys stale and the next read refetches.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::ClientResult;

/// Hierarchical cache key, e.g. `["zones"]` or `["zones", "3", "distributors"]`
///
/// Invalidating a key also invalidates every key it prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Zone collection; prefixes every zone-derived read
    pub fn zones() -> Self {
        Self::new(["zones"])
    }

    /// Backend search results for `term` (normalized)
    pub fn zone_search(term: &str) -> Self {
        Self::new(["zones".to_string(), "search".to_string(), term.trim().to_lowercase()])
    }

    /// Distributors of one zone
    pub fn zone_distributors(zone_id: i64) -> Self {
        Self::new(["zones".to_string(), zone_id.to_string(), "distributors".to_string()])
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// Cache collaborator of the orchestrator: only ever invalidated
pub trait ViewStateCache: Send + Sync {
    /// Mark `key` and every key under it stale
    fn invalidate(&self, key: &QueryKey);
}

impl<C: ViewStateCache + ?Sized> ViewStateCache for Arc<C> {
    fn invalidate(&self, key: &QueryKey) {
        (**self).invalidate(key)
    }
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    stale: bool,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    /// Bumped by every invalidation covering the key
    generations: HashMap<QueryKey, u64>,
}

/// In-memory query cache
#[derive(Default)]
pub struct QueryCache {
    state: Mutex<CacheState>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh cached value for `key`, if any
    pub fn get<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let state = self.state.lock();
        let entry = state.entries.get(key)?;
        if entry.stale {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Return the fresh cached value or run `fetch` and store its result
    ///
    /// The lock is not held while `fetch` runs. A result whose key was
    /// invalidated during the fetch is returned but stored stale, so the next
    /// read refetches. Failed fetches leave the existing entry untouched.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> ClientResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        if let Some(value) = self.get::<T>(&key) {
            tracing::trace!(key = %key, "Query cache hit");
            return Ok(value);
        }

        tracing::trace!(key = %key, "Query cache miss");
        let started = *self.state.lock().generations.entry(key.clone()).or_default();
        let value = fetch().await?;

        let mut state = self.state.lock();
        let stale = state.generations.get(&key).copied().unwrap_or_default() != started;
        if stale {
            tracing::debug!(key = %key, "Key invalidated during fetch; stored stale");
        }
        state.entries.insert(
            key,
            CacheEntry {
                value: Arc::new(value.clone()),
                stale,
            },
        );
        Ok(value)
    }

    /// `Some(true)` when the entry exists but must be refetched
    pub fn is_stale(&self, key: &QueryKey) -> Option<bool> {
        self.state.lock().entries.get(key).map(|e| e.stale)
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        // in-flight fetches must not land as fresh
        for generation in state.generations.values_mut() {
            *generation += 1;
        }
    }
}

impl ViewStateCache for QueryCache {
    fn invalidate(&self, key: &QueryKey) {
        let mut state = self.state.lock();
        for (k, generation) in state.generations.iter_mut() {
            if k.starts_with(key) {
                *generation += 1;
            }
        }
        let mut marked = 0usize;
        for (k, entry) in state.entries.iter_mut() {
            if k.starts_with(key) {
                entry.stale = true;
                marked += 1;
            }
        }
        tracing::debug!(key = %key, marked, "Query cache invalidated");
    }
}
