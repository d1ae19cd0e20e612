use futures::future::{BoxFuture, FutureExt, try_join_all};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::node::Node;
use crate::resolver::{ResolveError, ResolverChain};

/// An ordered collection of nodes that can be resolved as a batch.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    items: Vec<Node>,
}

impl Sequence {
    pub fn new(items: Vec<Node>) -> Self {
        Sequence { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.items.get_mut(index)
    }

    pub fn push(&mut self, node: Node) {
        self.items.push(node);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.items.iter_mut()
    }

    pub fn into_vec(self) -> Vec<Node> {
        self.items
    }

    /// Resolves every element concurrently.
    ///
    /// Links and nested sequences are resolved (links record their result in
    /// place); every other element passes through. Element `i` of the result
    /// always corresponds to element `i` of the input, whatever order the
    /// resolutions complete in. The first failure fails the whole batch.
    pub fn resolve<'a>(
        &'a mut self,
        resolver: Option<&'a ResolverChain>,
    ) -> BoxFuture<'a, Result<Sequence, ResolveError>> {
        async move {
            let resolved =
                try_join_all(self.items.iter_mut().map(|item| item.resolve(resolver))).await?;
            Ok(Sequence::new(resolved))
        }
        .boxed()
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.items.iter().map(Node::to_json).collect())
    }
}

impl FromIterator<Node> for Sequence {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Sequence::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Sequence {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for Sequence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(&self.items)
    }
}
