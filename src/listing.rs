//! Flattened `path = value` listings of a config, for logs and diagnostics.
//!
//! Built on the read-only walker: every public leaf of a flag kind becomes
//! one entry, keyed by the same path its flag uses. Opaque and private fields
//! are left out. Use [`list_redacted`] for anything that ends up in a log.

use std::fmt;

use crate::error::ConfError;
use crate::redact::{Conf, redact};
use crate::types::Value;
use crate::walk::{Fields, walk};

/// Resolved config values in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub entries: Vec<(String, Value)>,
}

impl Listing {
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == path)
            .map(|(_, value)| value)
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{key} = {value}")?;
        }
        Ok(())
    }
}

/// Serializes as a map from path to value.
#[cfg(feature = "serde")]
impl serde::Serialize for Listing {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(key, value)| (key, value)))
    }
}

/// List every public leaf value of `config`.
pub fn list<C: Fields>(config: &C) -> Listing {
    let entries = walk(config, "")
        .into_iter()
        .filter_map(|field| Some((field.path, field.value?)))
        .collect();
    Listing { entries }
}

/// [`list`] of the [`redact`]ed copy of `config`.
pub fn list_redacted<C: Conf>(config: &C) -> Result<Listing, ConfError> {
    Ok(list(&redact(config)?))
}
