//! Ligand decodes loosely-typed social-graph linked data into typed nodes and
//! resolves the references between them.
//!
//! Core concepts:
//! - **Blueprint**: The field table of one vocabulary type, plus the tags it inherits
//! - **Registry**: Maps single type tags to blueprints
//! - **Transformer**: Turns JSON into [`Node`]s, synthesizing composite
//!   blueprints for documents declaring several types
//! - **Link**: A typed reference that can be resolved
//! - **ResolverChain**: An ordered list of resolution strategies, ending in
//!   pass-through
//!
//! # Example
//!
//! ```
//! use ligand_core::{Transformer, vocab::Object};
//! use serde_json::json;
//!
//! let transformer = Transformer::with_vocabulary();
//! let node = transformer.transform(&json!({
//!     "type": "Note",
//!     "content": "hello",
//!     "attributedTo": "https://example.com/users/alice"
//! }));
//!
//! assert!(node.is("Note"));
//! let note = node.view::<Object>().unwrap();
//! assert_eq!(note.content.as_deref(), Some("hello"));
//! assert!(note.attributed_to[0].as_link().is_some());
//! ```
//!
//! Resolving a link walks a [`ResolverChain`]; without one, the process-wide
//! [`default_chain`] fetches the reference over HTTP (feature `http`) and
//! falls back to the bare reference string.

mod blueprint;
mod composite;
mod config;
mod field;
#[cfg(feature = "http")]
mod http;
mod instance;
mod link;
mod node;
mod registry;
mod resolver;
mod sequence;
mod transformer;
mod view;
pub mod vocab;

pub use blueprint::Blueprint;
pub use composite::{CompositeCache, CompositeKey};
pub use config::{CONFIG_ENV, ConfigError, HttpConfig, LigandConfig, config_path, load_config};
pub use field::{FieldKind, FieldValue};
#[cfg(feature = "http")]
pub use http::{FetchError, HttpResolver};
pub use instance::Instance;
pub use ligand_derive::Vocab;
pub use link::{LINK_TAG, Link};
pub use node::Node;
pub use registry::Registry;
pub use resolver::{MemoryResolver, Resolve, ResolveError, ResolverChain, default_chain};
pub use sequence::Sequence;
pub use transformer::{TransformOptions, Transformer};
pub use view::Vocab;

/// Re-exported for implementing [`Resolve`] outside this crate.
pub use async_trait::async_trait;
