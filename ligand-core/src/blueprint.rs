use std::sync::Arc;

use indexmap::IndexMap;

use crate::field::FieldKind;

/// A field-descriptor table bound to a vocabulary type.
///
/// A blueprint knows which fields an instance of its type recognizes, which
/// tags an instance of it *is* (its own tag plus every tag it inherits from),
/// and whether its instances are links.
///
/// Single-tag blueprints are built with [`Blueprint::new`], [`Blueprint::link`]
/// or [`Blueprint::extending`]. Blueprints for documents declaring several tags
/// are folded together with [`Blueprint::compose`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    tags: Vec<String>,
    lineage: Vec<String>,
    fields: IndexMap<String, FieldKind>,
    reference: bool,
}

impl Blueprint {
    /// Creates a blueprint for an object type.
    pub fn new<'a>(tag: &str, fields: impl IntoIterator<Item = (&'a str, FieldKind)>) -> Self {
        Blueprint {
            tags: vec![tag.to_string()],
            lineage: vec![tag.to_string()],
            fields: collect_fields(fields),
            reference: false,
        }
    }

    /// Creates a blueprint whose instances are links.
    pub fn link<'a>(tag: &str, fields: impl IntoIterator<Item = (&'a str, FieldKind)>) -> Self {
        Blueprint {
            reference: true,
            ..Blueprint::new(tag, fields)
        }
    }

    /// Creates a blueprint that inherits every field of `base` and adds its own.
    ///
    /// Own fields override inherited ones of the same name. The result is an
    /// instance of every tag in the base's lineage, and is a link if the base is.
    pub fn extending<'a>(
        tag: &str,
        base: &Blueprint,
        fields: impl IntoIterator<Item = (&'a str, FieldKind)>,
    ) -> Self {
        let mut merged = base.fields.clone();
        merged.extend(collect_fields(fields));

        let mut lineage = base.lineage.clone();
        push_unique(&mut lineage, tag);

        Blueprint {
            tags: vec![tag.to_string()],
            lineage,
            fields: merged,
            reference: base.reference,
        }
    }

    /// Folds an ordered list of constituents into one blueprint.
    ///
    /// Each step keeps everything accumulated so far and layers the next
    /// constituent's fields on top, so later constituents win on name
    /// collisions. Returns `None` for an empty list.
    pub fn compose(constituents: &[Arc<Blueprint>]) -> Option<Blueprint> {
        let (first, rest) = constituents.split_first()?;
        Some(
            rest.iter()
                .fold(Blueprint::clone(first), |acc, next| acc.merge(next)),
        )
    }

    /// Returns a new blueprint carrying this one's fields with `next` layered on top.
    pub fn merge(&self, next: &Blueprint) -> Blueprint {
        let mut fields = self.fields.clone();
        for (name, kind) in &next.fields {
            fields.insert(name.clone(), *kind);
        }

        let mut tags = self.tags.clone();
        tags.extend(next.tags.iter().cloned());

        let mut lineage = self.lineage.clone();
        for tag in &next.lineage {
            push_unique(&mut lineage, tag);
        }

        Blueprint {
            tags,
            lineage,
            fields,
            reference: self.reference || next.reference,
        }
    }

    /// The primary tag (the first declared one for composites).
    pub fn tag(&self) -> &str {
        &self.tags[0]
    }

    /// The declared tags, in composition order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Every tag an instance of this blueprint is considered to be.
    pub fn lineage(&self) -> &[String] {
        &self.lineage
    }

    /// Returns true if instances are of type `tag`, directly or by inheritance.
    pub fn is(&self, tag: &str) -> bool {
        self.lineage.iter().any(|t| t == tag)
    }

    /// Returns true if this blueprint combines several declared tags.
    pub fn is_composite(&self) -> bool {
        self.tags.len() > 1
    }

    /// Returns true if instances are links.
    pub fn is_reference(&self) -> bool {
        self.reference
    }

    /// Looks up the kind of a recognized field.
    pub fn field(&self, name: &str) -> Option<FieldKind> {
        self.fields.get(name).copied()
    }

    /// Iterates over the field table in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldKind)> {
        self.fields.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Number of recognized fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the blueprint recognizes no field at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn collect_fields<'a>(
    fields: impl IntoIterator<Item = (&'a str, FieldKind)>,
) -> IndexMap<String, FieldKind> {
    fields
        .into_iter()
        .map(|(name, kind)| (name.to_string(), kind))
        .collect()
}

fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object() -> Blueprint {
        Blueprint::new(
            "Object",
            [("id", FieldKind::Iri), ("name", FieldKind::Text)],
        )
    }

    #[test]
    fn fields_preserve_order() {
        let bp = Blueprint::new(
            "Thing",
            [
                ("first", FieldKind::Boolean),
                ("second", FieldKind::Integer),
                ("third", FieldKind::Text),
            ],
        );
        let names: Vec<_> = bp.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn extending_inherits_fields_and_lineage() {
        let note = Blueprint::extending("Note", &object(), [("content", FieldKind::Text)]);

        assert_eq!(note.tag(), "Note");
        assert_eq!(note.len(), 3);
        assert!(note.is("Note"));
        assert!(note.is("Object"));
        assert!(!note.is("Link"));
        assert!(!note.is_composite());
    }

    #[test]
    fn extending_overrides_inherited_kind() {
        let bp = Blueprint::extending("Custom", &object(), [("name", FieldKind::Embedded)]);
        assert_eq!(bp.field("name"), Some(FieldKind::Embedded));
        // Overriding keeps the inherited position.
        assert_eq!(bp.fields().nth(1).map(|(n, _)| n), Some("name"));
    }

    #[test]
    fn links_stay_links_when_extended() {
        let link = Blueprint::link("Link", [("href", FieldKind::Iri)]);
        let mention = Blueprint::extending("Mention", &link, []);
        assert!(mention.is_reference());
        assert!(mention.is("Link"));
    }

    #[test]
    fn compose_last_constituent_wins() {
        let a = Arc::new(Blueprint::new(
            "A",
            [("x", FieldKind::Text), ("a", FieldKind::Text)],
        ));
        let b = Arc::new(Blueprint::new(
            "B",
            [("x", FieldKind::Embedded), ("b", FieldKind::Text)],
        ));

        let ab = Blueprint::compose(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(ab.field("x"), Some(FieldKind::Embedded));
        assert_eq!(ab.tags(), ["A".to_string(), "B".to_string()]);
        assert!(ab.is("A") && ab.is("B"));
        assert!(ab.is_composite());

        let ba = Blueprint::compose(&[b, a]).unwrap();
        assert_eq!(ba.field("x"), Some(FieldKind::Text));
        assert_eq!(ba.len(), ab.len());
    }

    #[test]
    fn compose_empty_is_none() {
        assert!(Blueprint::compose(&[]).is_none());
    }

    #[test]
    fn compose_with_link_is_reference() {
        let link = Arc::new(Blueprint::link("Link", [("href", FieldKind::Iri)]));
        let obj = Arc::new(object());
        let bp = Blueprint::compose(&[obj, link]).unwrap();
        assert!(bp.is_reference());
    }
}
