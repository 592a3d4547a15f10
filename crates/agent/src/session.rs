//! Per-user session state
//!
//! Conversation contexts and the current-product pointer both live in
//! concurrent maps whose entries expire lazily: an entry older than the
//! TTL is removed the next time it is read. There is no sweeper task.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use shopbot_core::{Clock, ContextPatch, ContextStore, Product, ProductCache, UserContext};

/// Concurrent map with lazy per-entry expiry
struct TtlMap<V> {
    entries: DashMap<String, (V, DateTime<Utc>)>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlMap<V> {
    fn new(ttl: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
            clock,
        }
    }

    fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let ttl = self.ttl;
        if self
            .entries
            .remove_if(key, |_, (_, stamped)| now - *stamped > ttl)
            .is_some()
        {
            tracing::trace!(user_id = key, "Session entry expired");
            return None;
        }
        self.entries.get(key).map(|entry| entry.value().0.clone())
    }

    fn insert(&self, key: &str, value: V) {
        self.entries
            .insert(key.to_string(), (value, self.clock.now()));
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// In-process `ContextStore`
pub struct InMemoryContextStore {
    map: TtlMap<UserContext>,
    clock: Arc<dyn Clock>,
}

impl InMemoryContextStore {
    pub fn new(ttl: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            map: TtlMap::new(ttl, clock.clone()),
            clock,
        }
    }

    /// Stored entries, including expired ones not yet read
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContextStore for InMemoryContextStore {
    fn get(&self, user_id: &str) -> Option<UserContext> {
        self.map.get(user_id)
    }

    fn save(&self, user_id: &str, patch: ContextPatch) -> UserContext {
        let now = self.clock.now();
        let mut context = self
            .map
            .get(user_id)
            .unwrap_or_else(|| UserContext::new(user_id, now));
        patch.apply_to(&mut context);
        context.timestamp = now;

        self.map.insert(user_id, context.clone());
        context
    }

    fn clear(&self, user_id: &str) {
        self.map.remove(user_id);
    }
}

/// In-process `ProductCache` with the same lazy expiry
pub struct InMemoryProductCache {
    map: TtlMap<Product>,
}

impl InMemoryProductCache {
    pub fn new(ttl: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            map: TtlMap::new(ttl, clock),
        }
    }
}

impl ProductCache for InMemoryProductCache {
    fn get(&self, user_id: &str) -> Option<Product> {
        self.map.get(user_id)
    }

    fn set(&self, user_id: &str, product: Product) {
        self.map.insert(user_id, product);
    }

    fn clear(&self, user_id: &str) {
        self.map.remove(user_id);
    }
}
