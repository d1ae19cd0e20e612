use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::instance::Instance;
use crate::link::Link;
use crate::resolver::{ResolveError, ResolverChain};
use crate::sequence::Sequence;
use crate::view::Vocab;

/// A value produced by the transformer.
///
/// - **Value**: raw JSON passed through unchanged (scalars, untyped objects,
///   unregistered types), or a bare reference left as a string
/// - **Object**: a typed instance
/// - **Link**: a typed reference that can be resolved
/// - **Sequence**: an ordered, resolvable collection of nodes
#[derive(Debug, Clone)]
pub enum Node {
    Value(Value),
    Object(Instance),
    Link(Link),
    Sequence(Sequence),
}

impl Node {
    /// Returns the string if this node is a bare JSON string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Value(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this node is a bare JSON string.
    pub fn is_bare_string(&self) -> bool {
        self.as_str().is_some()
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Instance> {
        match self {
            Node::Object(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Node::Link(link) => Some(link),
            _ => None,
        }
    }

    pub fn as_link_mut(&mut self) -> Option<&mut Link> {
        match self {
            Node::Link(link) => Some(link),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Node::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Returns the typed instance behind an object or a link.
    pub fn instance(&self) -> Option<&Instance> {
        match self {
            Node::Object(instance) => Some(instance),
            Node::Link(link) => Some(link.instance()),
            Node::Value(_) | Node::Sequence(_) => None,
        }
    }

    /// Returns true if the node is typed as `tag`.
    pub fn is(&self, tag: &str) -> bool {
        self.instance().is_some_and(|instance| instance.is(tag))
    }

    /// Builds a typed view of an object or link node.
    pub fn view<T: Vocab>(&self) -> Option<T> {
        self.instance().and_then(T::from_instance)
    }

    /// Returns true if [`Node::resolve`] does more than clone the node.
    pub fn is_resolvable(&self) -> bool {
        matches!(self, Node::Link(_) | Node::Sequence(_))
    }

    /// Resolves links, recursing into sequences; other nodes pass through.
    ///
    /// Uses the process-wide default chain when `resolver` is `None`.
    pub async fn resolve(&mut self, resolver: Option<&ResolverChain>) -> Result<Node, ResolveError> {
        match self {
            Node::Link(link) => link.resolve(resolver).await,
            Node::Sequence(seq) => Ok(Node::Sequence(seq.resolve(resolver).await?)),
            Node::Value(_) | Node::Object(_) => Ok(self.clone()),
        }
    }

    /// Renders the node to JSON.
    ///
    /// Links follow their own output rule, see [`Link::to_json`].
    pub fn to_json(&self) -> Value {
        match self {
            Node::Value(value) => value.clone(),
            Node::Object(instance) => instance.to_json(),
            Node::Link(link) => link.to_json(),
            Node::Sequence(seq) => seq.to_json(),
        }
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Value(value) => value.serialize(serializer),
            Node::Object(instance) => instance.serialize(serializer),
            Node::Link(link) => link.serialize(serializer),
            Node::Sequence(seq) => seq.serialize(serializer),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::Value(value)
    }
}

impl From<Instance> for Node {
    fn from(instance: Instance) -> Self {
        Node::Object(instance)
    }
}

impl From<Link> for Node {
    fn from(link: Link) -> Self {
        Node::Link(link)
    }
}

impl From<Sequence> for Node {
    fn from(seq: Sequence) -> Self {
        Node::Sequence(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_strings() {
        let node = Node::from(json!("https://example.com"));
        assert!(node.is_bare_string());
        assert_eq!(node.as_str(), Some("https://example.com"));

        let number = Node::from(json!(1));
        assert!(!number.is_bare_string());
        assert!(number.instance().is_none());
        assert!(!number.is("Object"));
    }

    #[tokio::test]
    async fn plain_values_resolve_to_themselves() {
        let mut node = Node::from(json!({"a": 1}));
        assert!(!node.is_resolvable());

        let chain = ResolverChain::new();
        let resolved = node.resolve(Some(&chain)).await.unwrap();
        assert_eq!(resolved.to_json(), json!({"a": 1}));
    }
}
