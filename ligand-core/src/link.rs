use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::blueprint::Blueprint;
use crate::instance::Instance;
use crate::node::Node;
use crate::resolver::{ResolveError, ResolverChain, default_chain};

/// Tag of the blueprint used for links built from bare strings.
pub const LINK_TAG: &str = "Link";

/// A typed reference to another document.
///
/// Links exist in two shapes:
/// - **href-only**: built from a bare URL string found in the source document
/// - **full**: built from a link object carrying `href` and descriptive fields
///
/// Either shape can be resolved any number of times. Each call walks a
/// resolver chain again and overwrites the stored result; nothing is memoized
/// across calls.
#[derive(Debug, Clone)]
pub struct Link {
    instance: Instance,
    href_only: bool,
    resolved: Option<Box<Node>>,
}

impl Link {
    /// Wraps a populated link instance.
    pub fn new(instance: Instance) -> Self {
        Link {
            instance,
            href_only: false,
            resolved: None,
        }
    }

    /// Creates an href-only link from a bare reference.
    pub fn from_href(blueprint: Arc<Blueprint>, href: impl Into<String>) -> Self {
        let mut instance = Instance::new(blueprint);
        instance.set("href", Node::Value(Value::String(href.into())));
        Link {
            instance,
            href_only: true,
            resolved: None,
        }
    }

    /// Returns the reference, if set to a string.
    pub fn href(&self) -> Option<&str> {
        self.instance.get("href").and_then(Node::as_str)
    }

    /// Returns true if the link was built from a bare string.
    pub fn is_href_only(&self) -> bool {
        self.href_only
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn instance_mut(&mut self) -> &mut Instance {
        &mut self.instance
    }

    pub fn into_instance(self) -> Instance {
        self.instance
    }

    /// Returns the outcome of the most recent successful resolution.
    pub fn resolved(&self) -> Option<&Node> {
        self.resolved.as_deref()
    }

    /// Returns true if a resolution has been stored.
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Resolves the reference through `resolver`, or the process-wide default
    /// chain when `None`.
    ///
    /// The outcome is stored on the link (replacing any earlier one) and
    /// returned. Fails only when the link has no `href`.
    pub async fn resolve(&mut self, resolver: Option<&ResolverChain>) -> Result<Node, ResolveError> {
        let href = self.href().ok_or(ResolveError::MissingHref)?.to_string();
        let chain = match resolver {
            Some(chain) => chain,
            None => default_chain(),
        };

        let resolved = chain.handle(&href).await;
        debug!(href = %href, passthrough = resolved.is_bare_string(), "resolved link");

        self.resolved = Some(Box::new(resolved.clone()));
        Ok(resolved)
    }

    /// Renders the link for output.
    ///
    /// Prefers the stored resolution unless it is a bare string, then the bare
    /// `href` for href-only links, then the link object itself.
    pub fn to_json(&self) -> Value {
        match self.output() {
            Output::Resolved(node) => node.to_json(),
            Output::Href(href) => Value::String(href.to_string()),
            Output::Object(instance) => instance.to_json(),
        }
    }

    fn output(&self) -> Output<'_> {
        if let Some(resolved) = self.resolved.as_deref() {
            if !resolved.is_bare_string() {
                return Output::Resolved(resolved);
            }
        }
        match self.href() {
            Some(href) if self.href_only => Output::Href(href),
            _ => Output::Object(&self.instance),
        }
    }
}

enum Output<'a> {
    Resolved(&'a Node),
    Href(&'a str),
    Object(&'a Instance),
}

impl Serialize for Link {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.output() {
            Output::Resolved(node) => node.serialize(serializer),
            Output::Href(href) => serializer.serialize_str(href),
            Output::Object(instance) => instance.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;
    use crate::resolver::MemoryResolver;
    use serde_json::json;

    fn link_blueprint() -> Arc<Blueprint> {
        Arc::new(Blueprint::link(
            LINK_TAG,
            [("href", FieldKind::Iri), ("name", FieldKind::Text)],
        ))
    }

    #[test]
    fn href_only_roundtrip() {
        let link = Link::from_href(link_blueprint(), "https://example.com/a");
        assert!(link.is_href_only());
        assert!(!link.is_resolved());
        assert_eq!(link.href(), Some("https://example.com/a"));
        assert_eq!(link.to_json(), json!("https://example.com/a"));
        assert_eq!(
            serde_json::to_value(&link).unwrap(),
            json!("https://example.com/a")
        );
    }

    #[test]
    fn full_link_renders_as_object() {
        let mut instance = Instance::new(link_blueprint());
        instance.set("href", Node::Value(json!("https://example.com/a")));
        instance.set("name", Node::Value(json!("A")));
        let link = Link::new(instance);

        assert!(!link.is_href_only());
        assert_eq!(
            link.to_json(),
            json!({"href": "https://example.com/a", "name": "A"})
        );
    }

    #[tokio::test]
    async fn missing_href_fails() {
        let mut link = Link::new(Instance::new(link_blueprint()));
        let chain = ResolverChain::new();
        let err = link.resolve(Some(&chain)).await.unwrap_err();
        assert!(matches!(err, ResolveError::MissingHref));
        assert!(!link.is_resolved());
    }

    #[tokio::test]
    async fn non_string_href_fails() {
        let mut instance = Instance::new(link_blueprint());
        instance.set("href", Node::Value(json!(42)));
        let mut link = Link::new(instance);
        let chain = ResolverChain::new();
        assert!(link.resolve(Some(&chain)).await.is_err());
    }

    #[tokio::test]
    async fn unresolvable_href_stays_bare() {
        let mut link = Link::from_href(link_blueprint(), "https://example.com/a");
        let chain = ResolverChain::new();

        let resolved = link.resolve(Some(&chain)).await.unwrap();
        assert_eq!(resolved.as_str(), Some("https://example.com/a"));
        assert!(link.is_resolved());
        // A bare-string resolution does not replace the href in output.
        assert_eq!(link.to_json(), json!("https://example.com/a"));
    }

    #[tokio::test]
    async fn resolution_is_stored_and_rendered() {
        let memory = MemoryResolver::new();
        memory.insert("https://example.com/a", Node::Value(json!({"name": "target"})));
        let chain = ResolverChain::with(memory);

        let mut link = Link::from_href(link_blueprint(), "https://example.com/a");
        let resolved = link.resolve(Some(&chain)).await.unwrap();

        assert_eq!(resolved.to_json(), json!({"name": "target"}));
        assert_eq!(link.to_json(), json!({"name": "target"}));
    }

    #[tokio::test]
    async fn every_call_reenters_the_chain() {
        let memory = std::sync::Arc::new(MemoryResolver::new());
        memory.insert("https://example.com/a", Node::Value(json!(1)));
        let chain = ResolverChain::from_arc(memory.clone());

        let mut link = Link::from_href(link_blueprint(), "https://example.com/a");
        link.resolve(Some(&chain)).await.unwrap();

        memory.insert("https://example.com/a", Node::Value(json!(2)));
        let second = link.resolve(Some(&chain)).await.unwrap();

        assert_eq!(second.to_json(), json!(2));
        assert_eq!(link.resolved().map(Node::to_json), Some(json!(2)));
    }
}
