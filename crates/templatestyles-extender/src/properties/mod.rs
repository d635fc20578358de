//! Property tables.
//!
//! A [`PropertyTable`] maps lowercase property names to the matcher their
//! values must satisfy. Tables are immutable once built; changes go through a
//! [`PropertyTableBuilder`] and produce a new table.
//!
//! The table used by the sanitizer is the base table with the extensions in
//! [`EXTENSIONS`] applied in order, see [`extended_table`].

mod base;
mod extensions;
mod grid;

use std::collections::BTreeMap;
use std::sync::Arc;

use templatestyles_grammar::matcher::Matcher;

use crate::factory::MatcherFactory;
use crate::targets;

pub use base::{base_table, sizing_value};
pub use extensions::{EXTENSIONS, Extension};
pub use grid::track_list;

/// Outcome of an insert-if-absent registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The property was not known and has been added.
    Added,
    /// The property was already known; the existing matcher was kept.
    AlreadyPresent,
}

/// An immutable map from property name to value matcher.
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    entries: Arc<BTreeMap<String, Matcher>>,
}

impl PropertyTable {
    /// Start a builder with no properties.
    pub fn builder() -> PropertyTableBuilder {
        PropertyTableBuilder::default()
    }

    /// Start a builder holding this table's properties.
    pub fn to_builder(&self) -> PropertyTableBuilder {
        PropertyTableBuilder {
            entries: (*self.entries).clone(),
        }
    }

    /// The matcher for `name`, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&Matcher> {
        self.entries.get(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Property names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Matcher)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether both tables hold the same names bound to the same matcher
    /// instances.
    pub fn same_entries(&self, other: &PropertyTable) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((a, ma), (b, mb))| a == b && Matcher::ptr_eq(ma, mb))
    }
}

/// Mutable staging area for a [`PropertyTable`].
#[derive(Debug, Clone, Default)]
pub struct PropertyTableBuilder {
    entries: BTreeMap<String, Matcher>,
}

impl PropertyTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` unless it is already known.
    pub fn insert(&mut self, name: &str, matcher: Matcher) -> Insertion {
        let key = name.to_ascii_lowercase();
        if self.entries.contains_key(&key) {
            tracing::debug!(target: targets::PROPERTIES, property = %key, "property already registered, keeping existing matcher");
            return Insertion::AlreadyPresent;
        }
        self.entries.insert(key, matcher);
        Insertion::Added
    }

    /// Register `name`, replacing any existing matcher.
    pub fn set(&mut self, name: &str, matcher: Matcher) -> &mut Self {
        self.entries.insert(name.to_ascii_lowercase(), matcher);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Matcher> {
        self.entries.get(&name.to_ascii_lowercase())
    }

    pub fn remove(&mut self, name: &str) -> Option<Matcher> {
        self.entries.remove(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Seal the builder.
    pub fn build(self) -> PropertyTable {
        PropertyTable {
            entries: Arc::new(self.entries),
        }
    }
}

/// Apply `extensions` to `builder` in order.
pub fn apply_extensions(
    builder: &mut PropertyTableBuilder,
    factory: &MatcherFactory,
    extensions: &[Extension],
) {
    for extension in extensions {
        tracing::debug!(target: targets::PROPERTIES, extension = extension.name, "applying property extension");
        (extension.apply)(builder, factory);
    }
}

/// The base table with every extension in [`EXTENSIONS`] applied.
pub fn extended_table(factory: &MatcherFactory) -> PropertyTable {
    let mut builder = base_table(factory).to_builder();
    apply_extensions(&mut builder, factory, EXTENSIONS);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_if_absent() {
        let mut builder = PropertyTable::builder();
        let first = Matcher::keyword(["a"]);

        assert_eq!(builder.insert("Float", first.clone()), Insertion::Added);
        assert_eq!(builder.insert("float", Matcher::keyword(["b"])), Insertion::AlreadyPresent);

        let table = builder.build();
        assert!(Matcher::ptr_eq(table.get("FLOAT").unwrap(), &first));
    }

    #[test]
    fn set_replaces() {
        let mut builder = PropertyTable::builder();
        builder.insert("float", Matcher::keyword(["a"]));
        let replacement = Matcher::keyword(["b"]);
        builder.set("float", replacement.clone());

        assert!(Matcher::ptr_eq(builder.get("float").unwrap(), &replacement));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn tables_are_snapshots() {
        let table = {
            let mut builder = PropertyTable::builder();
            builder.insert("color", Matcher::keyword(["red"]));
            builder.build()
        };
        let mut builder = table.to_builder();
        builder.insert("float", Matcher::keyword(["left"]));
        let grown = builder.build();

        assert_eq!(table.len(), 1);
        assert_eq!(grown.len(), 2);
        assert!(!table.same_entries(&grown));
    }

    #[test]
    fn extensions_apply_in_order() {
        fn first(builder: &mut PropertyTableBuilder, _: &MatcherFactory) {
            builder.set("order-test", Matcher::keyword(["first"]));
        }
        fn second(builder: &mut PropertyTableBuilder, _: &MatcherFactory) {
            builder.set("order-test", Matcher::keyword(["second"]));
        }

        let factory = MatcherFactory::new();
        let mut builder = PropertyTable::builder();
        apply_extensions(
            &mut builder,
            &factory,
            &[
                Extension { name: "first", apply: first },
                Extension { name: "second", apply: second },
            ],
        );

        let values = templatestyles_grammar::value::parse_component_values("second");
        assert!(builder.get("order-test").unwrap().matches(&values));
    }

    #[test]
    fn extended_table_contains_additions() {
        let factory = MatcherFactory::with_var_enabled(true);
        let base = base_table(&factory);
        let table = extended_table(&factory);

        for name in [
            "overflow-wrap",
            "-webkit-mask-image",
            "aspect-ratio",
            "inset-inline-start",
            "scroll-padding-top",
            "ruby-align",
            "contain-intrinsic-block-size",
        ] {
            assert!(table.contains(name), "{name} missing");
        }
        assert!(table.len() > base.len());
    }
}
