//! Dependency identifiers.
//!
//! [`DependencyKey`] names an abstract contract or a concrete type within
//! the container. Bindings and type descriptors are both addressed by it.

use std::borrow::{Borrow, Cow};
use std::fmt;

use crate::descriptor::Injectable;

/// Identifies a dependency in the container.
///
/// Keys are plain names. When the Rust type is known, prefer
/// [`DependencyKey::of`], which takes the name from the type's
/// [`Injectable`] implementation and keeps typos out of call sites.
///
/// # Examples
/// ```
/// use dovetail_container::key::DependencyKey;
///
/// let key = DependencyKey::new("Logger");
/// assert_eq!(key.as_str(), "Logger");
/// assert_eq!(key, DependencyKey::from("Logger"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyKey(Cow<'static, str>);

impl DependencyKey {
    /// Creates a key from any name.
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Creates the key under which `T` is described.
    #[inline]
    pub fn of<T: Injectable>() -> Self {
        Self(Cow::Borrowed(T::IDENTIFIER))
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for DependencyKey {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for DependencyKey {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<Cow<'static, str>> for DependencyKey {
    fn from(name: Cow<'static, str>) -> Self {
        Self(name)
    }
}

impl From<&DependencyKey> for DependencyKey {
    fn from(key: &DependencyKey) -> Self {
        key.clone()
    }
}

impl AsRef<str> for DependencyKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets maps keyed by DependencyKey be queried with a &str.
impl Borrow<str> for DependencyKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DependencyKey({})", self.0)
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeDescriptor;

    struct Wheel;

    impl Injectable for Wheel {
        const IDENTIFIER: &'static str = "Wheel";

        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::concrete(Self::IDENTIFIER, |_| Ok(Wheel))
        }
    }

    #[test]
    fn key_of_injectable_type() {
        assert_eq!(DependencyKey::of::<Wheel>().as_str(), "Wheel");
    }

    #[test]
    fn borrowed_and_owned_keys_are_equal() {
        assert_eq!(DependencyKey::from("Logger"), DependencyKey::from(String::from("Logger")));
    }

    #[test]
    fn different_names_differ() {
        assert_ne!(DependencyKey::new("Logger"), DependencyKey::new("logger"));
    }

    #[test]
    fn key_in_hashmap_queried_by_str() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(DependencyKey::new("Logger"), 1);
        map.insert(DependencyKey::new("Database"), 2);
        assert_eq!(map.get("Logger"), Some(&1));
        assert_eq!(map.get("Cache"), None);
    }

    #[test]
    fn display_is_bare_name() {
        assert_eq!(DependencyKey::new("Engine").to_string(), "Engine");
        assert_eq!(format!("{:?}", DependencyKey::new("Engine")), "DependencyKey(Engine)");
    }
}
