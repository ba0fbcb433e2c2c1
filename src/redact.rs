//! Redacted copies of config values, for logging.
//!
//! [`redact`] returns a new value of the same type with every field tagged
//! `#[conf(redact)]` (or `redact = "<truthy>"`) reset to
//! `Default::default()`. The input is never modified.
//!
//! Rules, applied per field in declaration order:
//!
//! - The redact tag is parsed first. `1`, `t`, `true` redact; `0`, `f`,
//!   `false` keep; anything else is [`ConfError::RedactTag`]. No tag keeps.
//! - A redacted nested struct is reset as a whole, whatever its own fields
//!   say.
//! - Private fields are always reset, tagged or not.
//! - Everything else is copied. Fields whose type implements [`Conf`] are
//!   redacted recursively, whether or not they are marked `nested`; other
//!   types are copied with `Clone`, so an `Arc` in the copy points at
//!   the same allocation as the original.
//!
//! Redaction tags are independent of flag names: a field dropped from flags
//! with `name = "-"` is still redacted according to its own tag.

use tracing::trace;

use crate::error::ConfError;
use crate::types::{FieldMeta, parse_bool};
use crate::walk::Fields;

/// A config struct that can produce a redacted copy of itself.
///
/// Implemented by `#[derive(Conf)]`, together with [`Fields`]. Every field
/// type must implement `Default`. Public fields whose type implements `Conf`
/// are redacted recursively, other public fields are copied with `Clone`.
pub trait Conf: Fields + Sized {
    fn redacted(&self) -> Result<Self, ConfError>;
}

/// Return a copy of `value` with redacted and private fields reset to their
/// defaults.
pub fn redact<C: Conf>(value: &C) -> Result<C, ConfError> {
    value.redacted()
}

/// Whether the field's value is carried into the redacted copy.
#[doc(hidden)]
pub fn retain(meta: &FieldMeta) -> Result<bool, ConfError> {
    let redacted = match meta.redact {
        Some(text) => parse_bool(text).ok_or_else(|| ConfError::RedactTag {
            text: text.to_string(),
        })?,
        None => false,
    };
    if redacted {
        trace!(field = meta.ident, "redacting field");
        return Ok(false);
    }
    Ok(meta.exported)
}
