//! The built-in social-graph vocabulary.
//!
//! Every type with properties of its own has a typed view deriving [`Vocab`];
//! types that only refine a parent (`Note`, `Like`, `Person`...) are
//! registered from [`SUBTYPES`] and read through their parent's view.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use url::Url;

use crate::{Blueprint, Node, Registry, Vocab};

type LanguageMap = IndexMap<String, String>;

/// Tags registered by extending a parent without adding fields, in
/// registration order (parents first).
pub const SUBTYPES: &[(&str, &str)] = &[
    // objects
    ("Article", "Object"),
    ("Document", "Object"),
    ("Audio", "Document"),
    ("Image", "Document"),
    ("Video", "Document"),
    ("Page", "Document"),
    ("Event", "Object"),
    ("Note", "Object"),
    // actors
    ("Application", "Actor"),
    ("Group", "Actor"),
    ("Organization", "Actor"),
    ("Person", "Actor"),
    ("Service", "Actor"),
    // activities
    ("Accept", "Activity"),
    ("TentativeAccept", "Accept"),
    ("Add", "Activity"),
    ("Announce", "Activity"),
    ("Create", "Activity"),
    ("Delete", "Activity"),
    ("Dislike", "Activity"),
    ("Flag", "Activity"),
    ("Follow", "Activity"),
    ("Ignore", "Activity"),
    ("Block", "Ignore"),
    ("Join", "Activity"),
    ("Leave", "Activity"),
    ("Like", "Activity"),
    ("Listen", "Activity"),
    ("Move", "Activity"),
    ("Offer", "Activity"),
    ("Invite", "Offer"),
    ("Read", "Activity"),
    ("Reject", "Activity"),
    ("TentativeReject", "Reject"),
    ("Remove", "Activity"),
    ("Undo", "Activity"),
    ("Update", "Activity"),
    ("View", "Activity"),
    ("Arrive", "IntransitiveActivity"),
    ("Travel", "IntransitiveActivity"),
];

#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "Object")]
pub struct Object {
    #[vocab(rename = "@context")]
    pub json_ld_context: Option<Value>,
    pub id: Option<Url>,
    #[vocab(rename = "type")]
    pub kind: Option<Value>,
    pub attachment: Vec<Node>,
    pub attributed_to: Vec<Node>,
    pub audience: Vec<Node>,
    pub content: Option<String>,
    pub content_map: Option<LanguageMap>,
    pub context: Vec<Node>,
    pub name: Option<String>,
    pub name_map: Option<LanguageMap>,
    #[vocab(kind = DateTime)]
    pub end_time: Option<String>,
    pub generator: Vec<Node>,
    pub icon: Vec<Node>,
    pub image: Vec<Node>,
    pub in_reply_to: Vec<Node>,
    pub location: Vec<Node>,
    pub preview: Vec<Node>,
    #[vocab(kind = DateTime)]
    pub published: Option<String>,
    pub replies: Option<Node>,
    #[vocab(kind = DateTime)]
    pub start_time: Option<String>,
    pub summary: Option<String>,
    pub summary_map: Option<LanguageMap>,
    pub tag: Vec<Node>,
    #[vocab(kind = DateTime)]
    pub updated: Option<String>,
    pub url: Vec<Node>,
    pub to: Vec<Node>,
    pub bto: Vec<Node>,
    pub cc: Vec<Node>,
    pub bcc: Vec<Node>,
    pub media_type: Option<String>,
    #[vocab(kind = Duration)]
    pub duration: Option<String>,
    pub source: Option<Value>,
    pub likes: Option<Node>,
    pub shares: Option<Node>,
}

#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "Link", link)]
pub struct Link {
    #[vocab(rename = "@context")]
    pub json_ld_context: Option<Value>,
    pub id: Option<Url>,
    #[vocab(rename = "type")]
    pub kind: Option<Value>,
    pub href: Option<Url>,
    pub rel: Option<Value>,
    pub media_type: Option<String>,
    pub name: Option<String>,
    pub name_map: Option<LanguageMap>,
    pub hreflang: Option<String>,
    pub height: Option<u64>,
    pub width: Option<u64>,
    pub preview: Vec<Node>,
}

#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "Mention")]
pub struct Mention {
    #[vocab(base)]
    pub base: Link,
}

#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "Activity")]
pub struct Activity {
    #[vocab(base)]
    pub base: Object,
    pub actor: Vec<Node>,
    pub object: Vec<Node>,
    pub target: Vec<Node>,
    pub result: Vec<Node>,
    pub origin: Vec<Node>,
    pub instrument: Vec<Node>,
}

#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "IntransitiveActivity")]
pub struct IntransitiveActivity {
    #[vocab(base)]
    pub base: Activity,
}

#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "Question")]
pub struct Question {
    #[vocab(base)]
    pub base: IntransitiveActivity,
    pub one_of: Vec<Node>,
    pub any_of: Vec<Node>,
    #[vocab(kind = Any)]
    pub closed: Option<Value>,
}

/// Properties shared by every actor type.
///
/// `Actor` is not a document type of its own and is not registered; it is
/// the common base of `Application`, `Group`, `Organization`, `Person` and
/// `Service`, so any of them can be viewed as an `Actor`.
#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "Actor")]
pub struct Actor {
    #[vocab(base)]
    pub base: Object,
    pub inbox: Option<Node>,
    pub outbox: Option<Node>,
    pub following: Option<Node>,
    pub followers: Option<Node>,
    pub liked: Option<Node>,
    pub streams: Vec<Node>,
    pub preferred_username: Option<String>,
    pub endpoints: Option<Value>,
}

#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "Collection")]
pub struct Collection {
    #[vocab(base)]
    pub base: Object,
    pub total_items: Option<u64>,
    pub current: Option<Node>,
    pub first: Option<Node>,
    pub last: Option<Node>,
    pub items: Vec<Node>,
}

#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "OrderedCollection")]
pub struct OrderedCollection {
    #[vocab(base)]
    pub base: Collection,
    pub ordered_items: Vec<Node>,
}

#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "CollectionPage")]
pub struct CollectionPage {
    #[vocab(base)]
    pub base: Collection,
    pub part_of: Option<Node>,
    pub next: Option<Node>,
    pub prev: Option<Node>,
}

#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "OrderedCollectionPage")]
pub struct OrderedCollectionPage {
    #[vocab(base)]
    pub collection: OrderedCollection,
    #[vocab(base)]
    pub page: CollectionPage,
    pub start_index: Option<u64>,
}

#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "Place")]
pub struct Place {
    #[vocab(base)]
    pub base: Object,
    pub accuracy: Option<f64>,
    pub altitude: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
    pub units: Option<String>,
}

#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "Profile")]
pub struct Profile {
    #[vocab(base)]
    pub base: Object,
    pub describes: Option<Node>,
}

#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "Relationship")]
pub struct Relationship {
    #[vocab(base)]
    pub base: Object,
    pub subject: Option<Node>,
    pub object: Option<Node>,
    pub relationship: Vec<Node>,
}

#[derive(Debug, Clone, Default, Vocab)]
#[vocab(crate = crate, tag = "Tombstone")]
pub struct Tombstone {
    #[vocab(base)]
    pub base: Object,
    #[vocab(kind = Any)]
    pub former_type: Option<Value>,
    #[vocab(kind = DateTime)]
    pub deleted: Option<String>,
}

impl Registry {
    /// Creates a registry holding the whole built-in vocabulary.
    pub fn vocabulary() -> Self {
        let mut registry = Registry::new();
        registry.register_vocab::<Object>();
        registry.register_vocab::<Link>();
        registry.register_vocab::<Mention>();
        registry.register_vocab::<Activity>();
        registry.register_vocab::<IntransitiveActivity>();
        registry.register_vocab::<Question>();
        registry.register_vocab::<Collection>();
        registry.register_vocab::<OrderedCollection>();
        registry.register_vocab::<CollectionPage>();
        registry.register_vocab::<OrderedCollectionPage>();
        registry.register_vocab::<Place>();
        registry.register_vocab::<Profile>();
        registry.register_vocab::<Relationship>();
        registry.register_vocab::<Tombstone>();

        let actor = Arc::new(Actor::blueprint());
        for (tag, parent) in SUBTYPES {
            let base = if *parent == Actor::TAG {
                Some(Arc::clone(&actor))
            } else {
                registry.get(parent).cloned()
            };
            if let Some(base) = base {
                registry.register(*tag, Blueprint::extending(tag, &base, []));
            }
        }

        registry
    }
}
