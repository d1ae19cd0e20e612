use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::node::Node;

/// Error returned when a resolution cannot even be attempted.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("link has no href")]
    MissingHref,
}

/// A strategy that may be able to turn a reference into content.
///
/// Returning `None` means "not handled here": the chain moves on to the next
/// strategy. Implementations are expected to swallow their own failures.
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn try_resolve(&self, href: &str) -> Option<Node>;
}

#[async_trait]
impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    async fn try_resolve(&self, href: &str) -> Option<Node> {
        (**self).try_resolve(href).await
    }
}

/// A node of a chain-of-responsibility of resolution strategies.
///
/// Every node holds at most one strategy and at most one successor. A request
/// is offered to each strategy in chain order; the first one to produce a
/// value wins. When no strategy handles it, the reference itself comes back
/// as a bare string.
///
/// Chains can be wired two ways:
/// - [`ResolverChain::set_next`] attaches a successor and returns *it*, so
///   `a.set_next(b).set_next(c)` builds `a → b → c`
/// - [`ResolverChain::push`] / [`ResolverChain::then`] append at the tail and
///   hand back the head
#[derive(Default)]
pub struct ResolverChain {
    strategy: Option<Arc<dyn Resolve>>,
    next: Option<Box<ResolverChain>>,
}

impl ResolverChain {
    /// Creates a node without a strategy; on its own it passes everything through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a node running `strategy`.
    pub fn with(strategy: impl Resolve + 'static) -> Self {
        Self::from_arc(Arc::new(strategy))
    }

    /// Creates a node running a shared strategy.
    pub fn from_arc(strategy: Arc<dyn Resolve>) -> Self {
        ResolverChain {
            strategy: Some(strategy),
            next: None,
        }
    }

    /// Replaces this node's successor and returns the newly attached node.
    pub fn set_next(&mut self, next: ResolverChain) -> &mut ResolverChain {
        &mut **self.next.insert(Box::new(next))
    }

    /// Appends `node` after the current tail of the chain.
    pub fn push(&mut self, node: ResolverChain) -> &mut Self {
        match self.next.as_mut() {
            Some(next) => {
                next.push(node);
            }
            None => self.next = Some(Box::new(node)),
        }
        self
    }

    /// By-value form of [`ResolverChain::push`].
    pub fn then(mut self, node: ResolverChain) -> Self {
        self.push(node);
        self
    }

    /// Returns the successor, if any.
    pub fn next(&self) -> Option<&ResolverChain> {
        self.next.as_deref()
    }

    /// Returns true if this node has no successor.
    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }

    /// Number of nodes from this one to the tail.
    pub fn len(&self) -> usize {
        self.nodes().count()
    }

    /// A chain always has at least this node.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn nodes(&self) -> impl Iterator<Item = &ResolverChain> {
        std::iter::successors(Some(self), |node| node.next())
    }

    /// Offers `href` to every strategy in order, falling back to `href` itself.
    pub async fn handle(&self, href: &str) -> Node {
        for node in self.nodes() {
            if let Some(strategy) = &node.strategy {
                if let Some(resolved) = strategy.try_resolve(href).await {
                    return resolved;
                }
            }
        }
        debug!(href, "no strategy handled reference, passing through");
        Node::Value(Value::String(href.to_string()))
    }
}

impl fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverChain")
            .field("has_strategy", &self.strategy.is_some())
            .field("next", &self.next)
            .finish()
    }
}

/// Returns the process-wide default chain.
///
/// Built on first use from [`crate::load_config`]: a single network strategy
/// over [`crate::Transformer::global`] when the `http` feature is enabled, a
/// pass-through node otherwise. It is never rebuilt.
pub fn default_chain() -> &'static ResolverChain {
    static DEFAULT: OnceLock<ResolverChain> = OnceLock::new();
    DEFAULT.get_or_init(build_default_chain)
}

#[cfg(feature = "http")]
fn build_default_chain() -> ResolverChain {
    let config = crate::config::load_config();
    let transformer = Arc::clone(crate::Transformer::global());
    ResolverChain::with(crate::http::HttpResolver::with_config(transformer, config.http))
}

#[cfg(not(feature = "http"))]
fn build_default_chain() -> ResolverChain {
    ResolverChain::new()
}

/// An in-memory map from reference to content.
///
/// Useful for testing and as a cache-first node ahead of the network.
#[derive(Debug, Default)]
pub struct MemoryResolver {
    entries: RwLock<HashMap<String, Node>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `node` under `href`, returning the previous entry.
    pub fn insert(&self, href: impl Into<String>, node: Node) -> Option<Node> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(href.into(), node)
    }

    pub fn remove(&self, href: &str) -> Option<Node> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(href)
    }

    pub fn contains(&self, href: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(href)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Resolve for MemoryResolver {
    async fn try_resolve(&self, href: &str) -> Option<Node> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(href)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn memory(entries: &[(&str, Value)]) -> MemoryResolver {
        let resolver = MemoryResolver::new();
        for (href, value) in entries {
            resolver.insert(*href, Node::Value(value.clone()));
        }
        resolver
    }

    /// Counts how often it is asked, never handles anything.
    #[derive(Default)]
    struct Counting(AtomicUsize);

    #[async_trait]
    impl Resolve for Counting {
        async fn try_resolve(&self, _href: &str) -> Option<Node> {
            self.0.fetch_add(1, Ordering::SeqCst);
            None
        }
    }

    #[tokio::test]
    async fn terminal_node_passes_through() {
        let chain = ResolverChain::new();
        assert!(chain.is_terminal());
        let out = chain.handle("https://example.com/x").await;
        assert_eq!(out.as_str(), Some("https://example.com/x"));
    }

    #[tokio::test]
    async fn falls_through_to_identity() {
        // a -> b -> terminal, nobody knows the reference
        let mut a = ResolverChain::with(Counting::default());
        a.set_next(ResolverChain::with(memory(&[])))
            .set_next(ResolverChain::new());
        assert_eq!(a.len(), 3);

        let out = a.handle("https://example.com/unknown").await;
        assert_eq!(out.as_str(), Some("https://example.com/unknown"));
    }

    #[tokio::test]
    async fn successor_result_is_returned() {
        let mut a = ResolverChain::with(Counting::default());
        a.set_next(ResolverChain::with(memory(&[(
            "https://example.com/b",
            json!({"from": "b"}),
        )])));

        let out = a.handle("https://example.com/b").await;
        assert_eq!(out.to_json(), json!({"from": "b"}));
    }

    #[tokio::test]
    async fn first_handler_wins() {
        let chain = ResolverChain::with(memory(&[("https://example.com/x", json!(1))]))
            .then(ResolverChain::with(memory(&[("https://example.com/x", json!(2))])));

        let out = chain.handle("https://example.com/x").await;
        assert_eq!(out.to_json(), json!(1));
    }

    #[tokio::test]
    async fn set_next_returns_the_attached_node() {
        let counter = Arc::new(Counting::default());
        let mut a = ResolverChain::new();
        let b = a.set_next(ResolverChain::from_arc(counter.clone()));
        b.set_next(ResolverChain::with(memory(&[("https://example.com/c", json!("c"))])));

        // Three hops, not a -> c.
        assert_eq!(a.len(), 3);
        let out = a.handle("https://example.com/c").await;
        assert_eq!(out.to_json(), json!("c"));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn set_next_replaces_successor() {
        let mut a = ResolverChain::new();
        a.set_next(ResolverChain::new()).set_next(ResolverChain::new());
        assert_eq!(a.len(), 3);

        a.set_next(ResolverChain::new());
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn push_appends_at_tail() {
        let mut chain = ResolverChain::new();
        chain
            .push(ResolverChain::new())
            .push(ResolverChain::new())
            .push(ResolverChain::new());
        assert_eq!(chain.len(), 4);
    }

    #[tokio::test]
    async fn memory_resolver_basic() {
        let resolver = MemoryResolver::new();
        assert!(resolver.is_empty());

        resolver.insert("https://example.com/a", Node::Value(json!("a")));
        assert!(resolver.contains("https://example.com/a"));
        assert_eq!(
            resolver
                .try_resolve("https://example.com/a")
                .await
                .map(|n| n.to_json()),
            Some(json!("a"))
        );

        resolver.remove("https://example.com/a");
        assert!(resolver.try_resolve("https://example.com/a").await.is_none());
    }
}
