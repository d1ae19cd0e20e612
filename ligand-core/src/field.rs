use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::node::Node;

/// The kind of value a vocabulary field carries.
///
/// Only [`FieldKind::Embedded`] changes how a field is populated: its values are
/// run back through the transformer (and bare strings may become links). Every
/// other kind is copied verbatim; value validation is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Plain text.
    Text,
    /// An IRI that is never dereferenced (e.g. `id`, `href`).
    Iri,
    /// An xsd:dateTime string.
    DateTime,
    /// An xsd:duration string.
    Duration,
    /// A signed integer.
    Integer,
    /// An unsigned integer.
    NonNegativeInteger,
    /// A floating-point number.
    Number,
    /// A boolean flag.
    Boolean,
    /// A map from language tag to text (`contentMap`, `nameMap`...).
    LanguageMap,
    /// Embedded documents or references to them.
    Embedded,
    /// Anything; kept as raw JSON.
    Any,
}

impl FieldKind {
    /// Returns true if values of this kind go through the transformer.
    pub fn is_embedded(self) -> bool {
        matches!(self, FieldKind::Embedded)
    }
}

/// A Rust type usable as a field of a typed vocabulary view.
///
/// The associated kind is what `#[derive(Vocab)]` writes into the blueprint
/// for a field of this type, and `from_node` reads the populated value back.
pub trait FieldValue: Sized {
    const KIND: FieldKind;

    fn from_node(node: Option<&Node>) -> Self;
}

fn raw(node: Option<&Node>) -> Option<&Value> {
    match node {
        Some(Node::Value(value)) => Some(value),
        _ => None,
    }
}

impl FieldValue for Option<String> {
    const KIND: FieldKind = FieldKind::Text;

    fn from_node(node: Option<&Node>) -> Self {
        raw(node).and_then(Value::as_str).map(str::to_owned)
    }
}

impl FieldValue for Option<bool> {
    const KIND: FieldKind = FieldKind::Boolean;

    fn from_node(node: Option<&Node>) -> Self {
        raw(node).and_then(Value::as_bool)
    }
}

impl FieldValue for Option<u64> {
    const KIND: FieldKind = FieldKind::NonNegativeInteger;

    fn from_node(node: Option<&Node>) -> Self {
        raw(node).and_then(Value::as_u64)
    }
}

impl FieldValue for Option<i64> {
    const KIND: FieldKind = FieldKind::Integer;

    fn from_node(node: Option<&Node>) -> Self {
        raw(node).and_then(Value::as_i64)
    }
}

impl FieldValue for Option<f64> {
    const KIND: FieldKind = FieldKind::Number;

    fn from_node(node: Option<&Node>) -> Self {
        raw(node).and_then(Value::as_f64)
    }
}

impl FieldValue for Option<Url> {
    const KIND: FieldKind = FieldKind::Iri;

    fn from_node(node: Option<&Node>) -> Self {
        raw(node)
            .and_then(Value::as_str)
            .and_then(|s| Url::parse(s).ok())
    }
}

impl FieldValue for Option<IndexMap<String, String>> {
    const KIND: FieldKind = FieldKind::LanguageMap;

    fn from_node(node: Option<&Node>) -> Self {
        let map = raw(node)?.as_object()?;
        Some(
            map.iter()
                .filter_map(|(lang, text)| text.as_str().map(|t| (lang.clone(), t.to_owned())))
                .collect(),
        )
    }
}

impl FieldValue for Option<Value> {
    const KIND: FieldKind = FieldKind::Any;

    fn from_node(node: Option<&Node>) -> Self {
        node.map(Node::to_json)
    }
}

impl FieldValue for Option<Node> {
    const KIND: FieldKind = FieldKind::Embedded;

    fn from_node(node: Option<&Node>) -> Self {
        node.cloned()
    }
}

/// Embedded fields that may hold one value or many; a single value becomes a
/// one-element vector.
impl FieldValue for Vec<Node> {
    const KIND: FieldKind = FieldKind::Embedded;

    fn from_node(node: Option<&Node>) -> Self {
        match node {
            None => Vec::new(),
            Some(Node::Sequence(seq)) => seq.iter().cloned().collect(),
            Some(other) => vec![other.clone()],
        }
    }
}
