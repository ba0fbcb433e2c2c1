//! Field traversal shared by the binder, the redactor and the listing.
//!
//! A config struct exposes its fields through [`Fields`], which
//! `#[derive(Fields)]` and `#[derive(Conf)]` implement: a static
//! [`FieldMeta`] table plus one [`Target`] per field, in declaration order.
//! Any public field whose type implements [`Fields`] is a nested struct,
//! with or without `#[conf(nested)]`. [`walk_mut`] and [`walk`] flatten that
//! tree depth-first into path-qualified descriptors:
//!
//! ```text
//! struct Config { verbose: bool, server: Server }
//! struct Server { host: String, #[conf(name = "p")] port: u32 }
//!
//! verbose, server-host, server-p
//! ```
//!
//! Fields named with the skip sentinel (`"-"`) are pruned together with their
//! subtree. Private fields, and every field below a private nested struct,
//! are yielded without a settable reference. Fields whose type is not one of
//! the flag kinds are yielded too, also without a reference.

use crate::types::{FieldMeta, Slot, Value};

/// What a struct field points at.
pub enum Target<'a> {
    /// A field that is not a nested struct. `None` when the field is private
    /// or its type is not a flag kind.
    Leaf(Option<Slot<'a>>),
    Nested(&'a mut dyn Fields),
}

/// Read-only counterpart of [`Target`].
pub enum TargetRef<'a> {
    Leaf(Option<Value>),
    Nested(&'a dyn Fields),
}

/// Field table of a config struct. Implemented by `#[derive(Fields)]` and
/// `#[derive(Conf)]`.
pub trait Fields {
    /// One entry per field, in declaration order.
    fn meta(&self) -> &'static [FieldMeta];

    /// Same order and length as [`meta`](Self::meta).
    fn targets_mut(&mut self) -> Vec<Target<'_>>;

    /// Same order and length as [`meta`](Self::meta).
    fn targets(&self) -> Vec<TargetRef<'_>>;
}

/// A leaf field found by [`walk_mut`].
pub struct FieldMut<'a> {
    pub path: String,
    pub meta: &'static FieldMeta,
    pub slot: Option<Slot<'a>>,
}

/// A leaf field found by [`walk`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef {
    pub path: String,
    pub meta: &'static FieldMeta,
    pub value: Option<Value>,
}

/// Join a parent path and a field segment with `-`.
pub fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}-{segment}")
    }
}

/// Flatten `root` into settable leaf descriptors, depth-first.
pub fn walk_mut<'a>(root: &'a mut dyn Fields, prefix: &str) -> Vec<FieldMut<'a>> {
    let mut out = Vec::new();
    collect_mut(root, prefix, true, &mut out);
    out
}

fn collect_mut<'a>(
    node: &'a mut dyn Fields,
    prefix: &str,
    settable: bool,
    out: &mut Vec<FieldMut<'a>>,
) {
    let meta = node.meta();
    for (meta, target) in meta.iter().zip(node.targets_mut()) {
        if meta.is_skipped() {
            continue;
        }
        let path = join_path(prefix, meta.segment());
        match target {
            Target::Nested(child) => {
                collect_mut(child, &path, settable && meta.exported, out);
            }
            Target::Leaf(slot) => out.push(FieldMut {
                path,
                meta,
                slot: slot.filter(|_| settable),
            }),
        }
    }
}

/// Flatten `root` into read-only leaf descriptors, depth-first.
pub fn walk(root: &dyn Fields, prefix: &str) -> Vec<FieldRef> {
    let mut out = Vec::new();
    collect(root, prefix, true, &mut out);
    out
}

fn collect(node: &dyn Fields, prefix: &str, visible: bool, out: &mut Vec<FieldRef>) {
    for (meta, target) in node.meta().iter().zip(node.targets()) {
        if meta.is_skipped() {
            continue;
        }
        let path = join_path(prefix, meta.segment());
        match target {
            TargetRef::Nested(child) => collect(child, &path, visible && meta.exported, out),
            TargetRef::Leaf(value) => out.push(FieldRef {
                path,
                meta,
                value: value.filter(|_| visible),
            }),
        }
    }
}

/// Support code for `#[derive(Fields)]` and `#[derive(Conf)]`.
///
/// The derive cannot see a field's type, so it classifies fields with method
/// resolution. `(&&&TargetProbe::new(&mut field)).target()` resolves to
/// [`NestedTarget`] when the type implements [`Fields`], to [`LeafTarget`]
/// (one auto-deref further) when it implements [`Leaf`](crate::Leaf), and to
/// [`OpaqueTarget`] otherwise. [`CopyProbe`] does the same for redacted
/// copies: `Conf` types are redacted recursively, anything else is cloned.
///
/// This only works for concrete field types; a field whose type is a generic
/// parameter is always opaque.
#[doc(hidden)]
pub mod probe {
    use std::cell::Cell;

    use super::{Fields, Target, TargetRef};
    use crate::error::ConfError;
    use crate::redact::Conf;
    use crate::types::Leaf;

    pub struct TargetProbe<'a, T>(Cell<Option<&'a mut T>>);

    impl<'a, T> TargetProbe<'a, T> {
        pub fn new(field: &'a mut T) -> Self {
            Self(Cell::new(Some(field)))
        }
    }

    pub trait NestedTarget<'a> {
        fn target(&self) -> Target<'a>;
    }

    impl<'a, T: Fields + 'a> NestedTarget<'a> for &&TargetProbe<'a, T> {
        fn target(&self) -> Target<'a> {
            match self.0.take() {
                Some(field) => Target::Nested(field),
                None => Target::Leaf(None),
            }
        }
    }

    pub trait LeafTarget<'a> {
        fn target(&self) -> Target<'a>;
    }

    impl<'a, T: Leaf> LeafTarget<'a> for &TargetProbe<'a, T> {
        fn target(&self) -> Target<'a> {
            Target::Leaf(self.0.take().map(|field| field.slot()))
        }
    }

    pub trait OpaqueTarget<'a> {
        fn target(&self) -> Target<'a>;
    }

    impl<'a, T> OpaqueTarget<'a> for TargetProbe<'a, T> {
        fn target(&self) -> Target<'a> {
            Target::Leaf(None)
        }
    }

    pub struct TargetRefProbe<'a, T>(&'a T);

    impl<'a, T> TargetRefProbe<'a, T> {
        pub fn new(field: &'a T) -> Self {
            Self(field)
        }
    }

    pub trait NestedTargetRef<'a> {
        fn target(&self) -> TargetRef<'a>;
    }

    impl<'a, T: Fields + 'a> NestedTargetRef<'a> for &&TargetRefProbe<'a, T> {
        fn target(&self) -> TargetRef<'a> {
            TargetRef::Nested(self.0)
        }
    }

    pub trait LeafTargetRef<'a> {
        fn target(&self) -> TargetRef<'a>;
    }

    impl<'a, T: Leaf> LeafTargetRef<'a> for &TargetRefProbe<'a, T> {
        fn target(&self) -> TargetRef<'a> {
            TargetRef::Leaf(Some(self.0.value()))
        }
    }

    pub trait OpaqueTargetRef<'a> {
        fn target(&self) -> TargetRef<'a>;
    }

    impl<'a, T> OpaqueTargetRef<'a> for TargetRefProbe<'a, T> {
        fn target(&self) -> TargetRef<'a> {
            TargetRef::Leaf(None)
        }
    }

    pub struct CopyProbe<'a, T>(&'a T);

    impl<'a, T> CopyProbe<'a, T> {
        pub fn new(field: &'a T) -> Self {
            Self(field)
        }
    }

    pub trait NestedCopy {
        type Output;
        fn redacted_copy(&self) -> Result<Self::Output, ConfError>;
    }

    impl<T: Conf> NestedCopy for CopyProbe<'_, T> {
        type Output = T;
        fn redacted_copy(&self) -> Result<T, ConfError> {
            self.0.redacted()
        }
    }

    pub trait PlainCopy {
        type Output;
        fn redacted_copy(&self) -> Result<Self::Output, ConfError>;
    }

    impl<T: Clone> PlainCopy for &CopyProbe<'_, T> {
        type Output = T;
        fn redacted_copy(&self) -> Result<T, ConfError> {
            Ok(self.0.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{AppConfig, Hidden, Service};
    use std::time::Duration;

    fn paths(fields: &[FieldRef]) -> Vec<&str> {
        fields.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn join_path_without_prefix() {
        assert_eq!(join_path("", "port"), "port");
        assert_eq!(join_path("server", "port"), "server-port");
    }

    #[test]
    fn walk_flattens_nested_paths() {
        let config = AppConfig::default();
        let fields = walk(&config, "");
        assert_eq!(
            paths(&fields),
            vec![
                "name",
                "verbose",
                "server-host",
                "server-p",
                "server-timeout",
                "server-tls-cert",
                "server-tls-key",
                "database-url",
                "database-password",
                "database-pool",
                "tags",
                "token",
            ]
        );
    }

    #[test]
    fn walk_skips_sentinel_subtree() {
        let config = AppConfig::default();
        let fields = walk(&config, "");
        assert!(!fields.iter().any(|f| f.path.starts_with("internal")));
        assert!(!fields.iter().any(|f| f.path == "scratch"));
    }

    #[test]
    fn walk_reports_current_values() {
        let config = AppConfig::default();
        let fields = walk(&config, "");
        let port = fields.iter().find(|f| f.path == "server-p").unwrap();
        assert_eq!(port.value, Some(Value::Uint(8080)));
        let timeout = fields.iter().find(|f| f.path == "server-timeout").unwrap();
        assert_eq!(timeout.value, Some(Value::Duration(Duration::from_secs(30))));
    }

    #[test]
    fn opaque_and_private_fields_have_no_value() {
        let config = AppConfig::default();
        let fields = walk(&config, "");
        let tags = fields.iter().find(|f| f.path == "tags").unwrap();
        assert_eq!(tags.value, None);
        let token = fields.iter().find(|f| f.path == "token").unwrap();
        assert!(!token.meta.exported);
        assert_eq!(token.value, None);
    }

    #[test]
    fn walk_mut_slots_write_through() {
        let mut config = AppConfig::default();
        for field in walk_mut(&mut config, "") {
            if field.path == "server-host"
                && let Some(mut slot) = field.slot
            {
                assert!(slot.set(Value::String("example.org".into())));
            }
        }
        assert_eq!(config.server.host, "example.org");
    }

    #[test]
    fn walk_mut_prefix_is_applied() {
        let mut config = AppConfig::default();
        let fields = walk_mut(&mut config, "app");
        assert_eq!(fields[0].path, "app-name");
    }

    #[test]
    fn private_nested_struct_is_not_settable() {
        let mut hidden = Hidden::default();
        let fields = walk_mut(&mut hidden, "");
        let inner: Vec<_> = fields
            .iter()
            .filter(|f| f.path.starts_with("inner-"))
            .collect();
        assert_eq!(inner.len(), 2);
        assert!(inner.iter().all(|f| f.slot.is_none()));
        let visible = fields.iter().find(|f| f.path == "visible").unwrap();
        assert!(visible.slot.is_some());
    }

    #[test]
    fn struct_fields_are_walked_without_nested_attribute() {
        let mut service = Service::default();
        let fields = walk_mut(&mut service, "");
        let paths: Vec<_> = fields.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["name", "db-user", "db-password", "db-max_conns"]);
        assert!(fields.iter().all(|f| f.slot.is_some()));
    }
}
