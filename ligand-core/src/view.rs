use crate::blueprint::Blueprint;
use crate::instance::Instance;

/// A Rust type bound to a vocabulary tag.
///
/// Usually implemented with `#[derive(Vocab)]`, which builds the blueprint
/// from the struct's fields and reads them back in `from_instance`.
pub trait Vocab: Sized {
    /// The tag this type is registered under.
    const TAG: &'static str;

    /// Builds the field table for this type, inherited fields included.
    fn blueprint() -> Blueprint;

    /// Reads a typed view out of a populated instance.
    ///
    /// Returns `None` if the instance is not of type [`Vocab::TAG`].
    fn from_instance(instance: &Instance) -> Option<Self>;
}
