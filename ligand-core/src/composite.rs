use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::blueprint::Blueprint;

/// Ordered list of tags identifying a composite blueprint.
///
/// The order is significant: `["A", "B"]` and `["B", "A"]` are different keys.
pub type CompositeKey = Vec<String>;

/// Memoizes synthesized composite blueprints by their ordered tag list.
///
/// Responsibilities:
/// - Identity: the same tag combination always yields the same `Arc`
/// - Atomic synthesis: a combination is composed at most once, even when
///   several threads ask for it concurrently
///
/// Entries live as long as the cache and are never evicted.
#[derive(Debug, Default)]
pub struct CompositeCache {
    entries: RwLock<HashMap<CompositeKey, Arc<Blueprint>>>,
}

impl CompositeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached composite for `key`, if any.
    pub fn get(&self, key: &[String]) -> Option<Arc<Blueprint>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Returns the composite for `key`, synthesizing it from `constituents` on
    /// first use.
    ///
    /// `constituents` must be the blueprints of `key`'s tags, in the same order.
    /// Returns `None` only when `constituents` is empty.
    pub fn get_or_compose(
        &self,
        key: CompositeKey,
        constituents: &[Arc<Blueprint>],
    ) -> Option<Arc<Blueprint>> {
        if let Some(existing) = self.get(&key) {
            return Some(existing);
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another writer may have won the race between the read and write locks.
        if let Some(existing) = entries.get(&key) {
            return Some(Arc::clone(existing));
        }

        let composite = Arc::new(Blueprint::compose(constituents)?);
        debug!(tags = ?key, fields = composite.len(), "synthesized composite blueprint");
        entries.insert(key, Arc::clone(&composite));
        Some(composite)
    }

    /// Returns the number of cached composites.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been synthesized yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
