use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::blueprint::Blueprint;
use crate::composite::CompositeCache;
use crate::config::load_config;
use crate::instance::Instance;
use crate::link::{LINK_TAG, Link};
use crate::node::Node;
use crate::registry::Registry;
use crate::sequence::Sequence;

/// Knobs controlling how documents are turned into nodes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Turn URL strings found in embedded fields into href-only links.
    pub convert_text_to_links: bool,
    /// Build partial composites when some declared tags are unregistered.
    pub compose_with_missing_constructors: bool,
    /// Synthesize composites for documents declaring several registered tags.
    pub enable_composite_types: bool,
    /// Return the source value instead of `null` when a composite is refused.
    pub always_return_value_on_transform: bool,
    /// Keep fields the blueprint does not recognize, as raw JSON.
    pub retain_unknown_fields: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            convert_text_to_links: true,
            compose_with_missing_constructors: true,
            enable_composite_types: true,
            always_return_value_on_transform: false,
            retain_unknown_fields: false,
        }
    }
}

/// Converts JSON documents into typed nodes, driven by their `type` tag.
///
/// A transformer owns its registry and its composite cache, so independent
/// transformers never see each other's bindings. [`Transformer::global`]
/// returns a lazily built one over the built-in vocabulary.
#[derive(Debug)]
pub struct Transformer {
    registry: RwLock<Registry>,
    composites: CompositeCache,
    options: TransformOptions,
}

enum Lookup {
    Found(Arc<Blueprint>),
    PassThrough,
    Sentinel,
}

impl Transformer {
    pub fn new(registry: Registry, options: TransformOptions) -> Self {
        Self {
            registry: RwLock::new(registry),
            composites: CompositeCache::new(),
            options,
        }
    }

    /// Creates a transformer over the built-in vocabulary with default options.
    pub fn with_vocabulary() -> Self {
        Self::new(Registry::vocabulary(), TransformOptions::default())
    }

    /// Returns the process-wide transformer.
    ///
    /// Built on first use from the built-in vocabulary and the options of
    /// [`load_config`]. Tags registered on it are visible to every later
    /// caller, including the default resolver chain.
    pub fn global() -> &'static Arc<Transformer> {
        static GLOBAL: OnceLock<Arc<Transformer>> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            Arc::new(Transformer::new(
                Registry::vocabulary(),
                load_config().transform,
            ))
        })
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Binds `tag` to `blueprint`, replacing any previous binding.
    ///
    /// Composites already synthesized from the old binding stay cached.
    pub fn register(&self, tag: impl Into<String>, blueprint: Blueprint) {
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(tag, blueprint);
    }

    /// Returns the blueprint bound to `tag`.
    pub fn blueprint(&self, tag: &str) -> Option<Arc<Blueprint>> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tag)
            .cloned()
    }

    pub fn composites(&self) -> &CompositeCache {
        &self.composites
    }

    /// Converts `value` into a node.
    ///
    /// - arrays become sequences of transformed elements, in order
    /// - objects whose `type` resolves to a blueprint become typed instances
    ///   (or links, for link blueprints)
    /// - everything else comes back unchanged
    ///
    /// Never fails; a refused composite yields `null` unless
    /// `always_return_value_on_transform` is set.
    pub fn transform(&self, value: &Value) -> Node {
        match value {
            Value::Array(items) => Node::Sequence(items.iter().map(|v| self.transform(v)).collect()),
            Value::Object(map) => match self.lookup(map.get("type")) {
                Lookup::Found(blueprint) => self.populate(blueprint, map),
                Lookup::PassThrough => Node::Value(value.clone()),
                Lookup::Sentinel => Node::Value(Value::Null),
            },
            _ => Node::Value(value.clone()),
        }
    }

    /// Builds an href-only link, if `href` is URL-shaped and a `Link`
    /// blueprint is registered.
    pub fn link_from_href(&self, href: &str) -> Option<Node> {
        Url::parse(href).ok()?;
        let blueprint = self.blueprint(LINK_TAG)?;
        Some(Node::Link(Link::from_href(blueprint, href)))
    }

    fn lookup(&self, tag: Option<&Value>) -> Lookup {
        match tag {
            Some(Value::String(tag)) => match self.blueprint(tag) {
                Some(blueprint) => Lookup::Found(blueprint),
                None => Lookup::PassThrough,
            },
            Some(Value::Array(tags)) => self.lookup_composite(tags),
            _ => Lookup::PassThrough,
        }
    }

    fn lookup_composite(&self, tags: &[Value]) -> Lookup {
        if !self.options.enable_composite_types {
            return Lookup::PassThrough;
        }

        let mut key: Vec<String> = Vec::new();
        let mut constituents = Vec::new();
        let mut missing = false;
        {
            let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
            for tag in tags {
                let Some((tag, blueprint)) = tag
                    .as_str()
                    .and_then(|t| registry.get(t).map(|bp| (t, bp)))
                else {
                    missing = true;
                    continue;
                };
                if key.iter().any(|k| k == tag) {
                    continue;
                }
                key.push(tag.to_string());
                constituents.push(Arc::clone(blueprint));
            }
        }

        if constituents.is_empty() {
            return Lookup::PassThrough;
        }

        if missing && !self.options.compose_with_missing_constructors {
            debug!(tags = ?tags, "refusing composite with unregistered tags");
            return self.refused();
        }

        match constituents.len() {
            1 => constituents.pop().map_or(Lookup::PassThrough, Lookup::Found),
            _ => match self.composites.get_or_compose(key, &constituents) {
                Some(blueprint) => Lookup::Found(blueprint),
                None => Lookup::PassThrough,
            },
        }
    }

    fn refused(&self) -> Lookup {
        if self.options.always_return_value_on_transform {
            Lookup::PassThrough
        } else {
            Lookup::Sentinel
        }
    }

    fn populate(&self, blueprint: Arc<Blueprint>, source: &Map<String, Value>) -> Node {
        let mut instance = Instance::new(Arc::clone(&blueprint));
        for (name, value) in source {
            if name == "type" {
                instance.set(name.as_str(), Node::Value(value.clone()));
                continue;
            }
            match blueprint.field(name) {
                Some(kind) if kind.is_embedded() => {
                    instance.set(name.as_str(), self.embed(value));
                }
                Some(_) => {
                    instance.set(name.as_str(), Node::Value(value.clone()));
                }
                None if self.options.retain_unknown_fields => {
                    instance.set(name.as_str(), Node::Value(value.clone()));
                }
                None => {}
            }
        }

        if blueprint.is_reference() {
            Node::Link(Link::new(instance))
        } else {
            Node::Object(instance)
        }
    }

    fn embed(&self, value: &Value) -> Node {
        match value {
            Value::String(text) if self.options.convert_text_to_links => self
                .link_from_href(text)
                .unwrap_or_else(|| Node::Value(value.clone())),
            Value::Array(items) => {
                Node::Sequence(items.iter().map(|item| self.embed(item)).collect::<Sequence>())
            }
            _ => self.transform(value),
        }
    }
}
