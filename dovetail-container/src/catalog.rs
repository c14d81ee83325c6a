//! Type catalog — the descriptors auto-resolution reads from.
//!
//! A [`TypeCatalog`] maps identifiers to [`TypeDescriptor`]s. It is filled
//! from two sources:
//! - descriptors submitted at compile time (`#[derive(Injectable)]` does
//!   this automatically, hand-written ones use [`inventory::submit!`]),
//!   collected by [`TypeCatalog::discover`];
//! - explicit insertion at runtime.
//!
//! # Examples
//! ```
//! use dovetail_container::catalog::TypeCatalog;
//! use dovetail_container::descriptor::TypeDescriptor;
//!
//! let catalog = TypeCatalog::new();
//! catalog.insert(TypeDescriptor::interface("Logger"));
//! assert!(catalog.contains(&"Logger".into()));
//! ```

use std::fmt;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::descriptor::{Injectable, TypeDescriptor};
use crate::key::DependencyKey;

/// A compile-time descriptor submission.
///
/// ```rust,ignore
/// inventory::submit! {
///     Discovered::new(|| TypeDescriptor::interface("Logger"))
/// }
/// ```
pub struct Discovered {
    describe: fn() -> TypeDescriptor,
}

impl Discovered {
    pub const fn new(describe: fn() -> TypeDescriptor) -> Self {
        Self { describe }
    }
}

inventory::collect!(Discovered);

static DISCOVERED: Lazy<Vec<TypeDescriptor>> = Lazy::new(|| {
    let descriptors: Vec<TypeDescriptor> = inventory::iter::<Discovered>
        .into_iter()
        .map(|submission| (submission.describe)())
        .collect();
    debug!(count = descriptors.len(), "Discovered type descriptors");
    descriptors
});

/// Identifier → descriptor map, safe to share between threads.
#[derive(Default)]
pub struct TypeCatalog {
    types: DashMap<DependencyKey, TypeDescriptor>,
}

impl TypeCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding every descriptor submitted at compile time.
    ///
    /// Submissions are collected once per process; each call returns a
    /// fresh catalog that can be extended independently.
    pub fn discover() -> Self {
        let catalog = Self::new();
        for descriptor in DISCOVERED.iter() {
            catalog.insert(descriptor.clone());
        }
        catalog
    }

    /// Adds a descriptor, returning the one it replaces.
    pub fn insert(&self, descriptor: TypeDescriptor) -> Option<TypeDescriptor> {
        let key = descriptor.key().clone();
        let replaced = self.types.insert(key.clone(), descriptor);
        if replaced.is_some() {
            warn!(key = %key, "Replaced type descriptor");
        }
        replaced
    }

    /// Adds the descriptor of `T`.
    pub fn describe<T: Injectable>(&self) -> &Self {
        self.insert(T::descriptor());
        self
    }

    /// Returns a copy of the descriptor for `key`.
    pub fn get(&self, key: &DependencyKey) -> Option<TypeDescriptor> {
        self.types.get(key).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: &DependencyKey) -> bool {
        self.types.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns every described identifier.
    pub fn keys(&self) -> Vec<DependencyKey> {
        self.types.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl fmt::Debug for TypeCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = self.keys();
        keys.sort();
        f.debug_struct("TypeCatalog").field("types", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeKind;

    struct Probe;

    impl Injectable for Probe {
        const IDENTIFIER: &'static str = "CatalogProbe";

        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::concrete(Self::IDENTIFIER, |_| Ok(Probe))
        }
    }

    inventory::submit! {
        Discovered::new(Probe::descriptor)
    }

    #[test]
    fn discover_collects_submissions() {
        let catalog = TypeCatalog::discover();
        assert!(catalog.contains(&DependencyKey::of::<Probe>()));
    }

    #[test]
    fn discovered_catalogs_are_independent() {
        let first = TypeCatalog::discover();
        first.insert(TypeDescriptor::interface("OnlyInFirst"));

        let second = TypeCatalog::discover();
        assert!(!second.contains(&"OnlyInFirst".into()));
    }

    #[test]
    fn insert_replaces() {
        let catalog = TypeCatalog::new();
        assert!(catalog.insert(TypeDescriptor::interface("Logger")).is_none());

        let replaced = catalog.insert(TypeDescriptor::concrete("Logger", |_| Ok(())));
        assert_eq!(replaced.map(|d| d.kind()), Some(TypeKind::Interface));
        assert_eq!(catalog.get(&"Logger".into()).map(|d| d.kind()), Some(TypeKind::Concrete));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn describe_uses_identifier() {
        let catalog = TypeCatalog::new();
        catalog.describe::<Probe>();
        assert_eq!(catalog.keys(), vec![DependencyKey::new("CatalogProbe")]);
    }

    #[test]
    fn missing_key() {
        let catalog = TypeCatalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.get(&"Nothing".into()).is_none());
    }
}
