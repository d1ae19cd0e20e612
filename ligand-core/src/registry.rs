use std::collections::HashMap;
use std::sync::Arc;

use crate::blueprint::Blueprint;
use crate::view::Vocab;

/// Maps single type tags to their blueprints.
///
/// Registries are plain values: several may coexist, and one can be folded
/// into another with [`Registry::extend`]. Registering a tag that is already
/// bound silently replaces the previous binding.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    blueprints: HashMap<String, Arc<Blueprint>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `tag` to `blueprint`, replacing any previous binding.
    pub fn register(&mut self, tag: impl Into<String>, blueprint: Blueprint) {
        self.blueprints.insert(tag.into(), Arc::new(blueprint));
    }

    /// Binds each blueprint under its own primary tag.
    pub fn register_many(&mut self, blueprints: impl IntoIterator<Item = Blueprint>) {
        for blueprint in blueprints {
            let tag = blueprint.tag().to_string();
            self.register(tag, blueprint);
        }
    }

    /// Binds the blueprint of a typed view under its tag.
    pub fn register_vocab<T: Vocab>(&mut self) {
        self.register(T::TAG, T::blueprint());
    }

    /// Copies every binding of `other` into this registry.
    ///
    /// Bindings from `other` win over existing ones with the same tag.
    pub fn extend(&mut self, other: &Registry) {
        for (tag, blueprint) in &other.blueprints {
            self.blueprints.insert(tag.clone(), Arc::clone(blueprint));
        }
    }

    /// Looks up the blueprint bound to `tag`.
    pub fn get(&self, tag: &str) -> Option<&Arc<Blueprint>> {
        self.blueprints.get(tag)
    }

    /// Checks whether `tag` is bound.
    pub fn contains(&self, tag: &str) -> bool {
        self.blueprints.contains_key(tag)
    }

    /// Iterates over the bound tags in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.blueprints.keys().map(String::as_str)
    }

    /// Returns the number of bound tags.
    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    /// Returns true if no tag is bound.
    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }
}
