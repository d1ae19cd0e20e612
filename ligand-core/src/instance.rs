use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::blueprint::Blueprint;
use crate::node::Node;
use crate::view::Vocab;

/// A document materialized from a blueprint.
///
/// Field values keep the order in which they appeared in the source document.
/// The instance shares its blueprint, so two instances built from the same
/// (possibly composite) blueprint can be compared by `Arc::ptr_eq` on
/// [`Instance::blueprint`].
#[derive(Debug, Clone)]
pub struct Instance {
    blueprint: Arc<Blueprint>,
    fields: IndexMap<String, Node>,
}

impl Instance {
    /// Creates an instance with no field set.
    pub fn new(blueprint: Arc<Blueprint>) -> Self {
        Instance {
            blueprint,
            fields: IndexMap::new(),
        }
    }

    /// Returns the blueprint this instance was built from.
    pub fn blueprint(&self) -> &Arc<Blueprint> {
        &self.blueprint
    }

    /// Returns true if this instance is of type `tag`, directly or by inheritance.
    pub fn is(&self, tag: &str) -> bool {
        self.blueprint.is(tag)
    }

    /// Returns the `id` of the document, if it has a string one.
    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(Node::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.fields.get_mut(name)
    }

    /// Sets a field, returning its previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Node) -> Option<Node> {
        self.fields.insert(name.into(), value)
    }

    /// Removes a field, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.fields.shift_remove(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = (&str, &mut Node)> {
        self.fields.iter_mut().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds a typed view of this instance.
    ///
    /// Returns `None` if the instance is not of the view's type.
    pub fn view<T: Vocab>(&self) -> Option<T> {
        T::from_instance(self)
    }

    /// Renders the instance back to JSON.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, node)| (name.clone(), node.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for Instance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, node) in &self.fields {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}
