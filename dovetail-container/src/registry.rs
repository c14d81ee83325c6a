//! Binding registry — stores the factories registered with a container.
//!
//! The registry maps [`DependencyKey`] to factory functions that know
//! how to produce an instance. A key with a binding is never auto-resolved.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::descriptor::Instance;
use crate::error::{AlreadyRegisteredError, DovetailError, Result};
use crate::key::DependencyKey;

/// Type alias for factory functions.
///
/// A factory takes a [`Resolver`] (to resolve its own dependencies)
/// and returns a boxed instance or an error.
///
/// Factories are cloned out of the registry before they run; the registry
/// lock is never held during a factory call.
pub type FactoryFn = Arc<dyn Fn(&dyn Resolver) -> Result<Instance> + Send + Sync>;

/// Trait for resolving dependencies.
///
/// This is what factory functions receive. It is implemented by the
/// container itself and by the context handed to nested factories.
pub trait Resolver {
    /// Produces an instance of `key`, from its binding or by auto-resolution.
    fn resolve_key(&self, key: &DependencyKey) -> Result<Instance>;

    /// Returns `true` if `key` has a binding.
    fn contains_key(&self, key: &DependencyKey) -> bool;
}

/// Typed conveniences available on every [`Resolver`].
pub trait ResolverApi: Resolver {
    /// Produces an instance of `id`.
    fn get(&self, id: impl Into<DependencyKey>) -> Result<Instance> {
        self.resolve_key(&id.into())
    }

    /// Returns `true` if `id` has a binding.
    fn has(&self, id: impl Into<DependencyKey>) -> bool {
        self.contains_key(&id.into())
    }

    /// Produces an instance of `id` and downcasts it to `T`.
    ///
    /// # Errors
    /// [`DovetailError::ConstructionFailed`] if the instance is not a `T`,
    /// on top of everything [`get`](Self::get) can fail with.
    fn get_as<T: Any>(&self, id: impl Into<DependencyKey>) -> Result<T> {
        let key = id.into();
        let instance = self.resolve_key(&key)?;
        downcast(key, instance)
    }

    /// Produces a `T` from the identifier it is described under.
    fn resolve<T: crate::descriptor::Injectable>(&self) -> Result<T> {
        self.get_as(DependencyKey::of::<T>())
    }
}

impl<R: Resolver + ?Sized> ResolverApi for R {}

/// Wraps a typed factory closure into a [`FactoryFn`].
pub fn factory<T, F>(f: F) -> FactoryFn
where
    T: Send + Sync + 'static,
    F: Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
{
    Arc::new(move |resolver: &dyn Resolver| -> Result<Instance> {
        Ok(Box::new(f(resolver)?) as Instance)
    })
}

pub(crate) fn downcast<T: Any>(key: DependencyKey, instance: Instance) -> Result<T> {
    instance.downcast::<T>().map(|b| *b).map_err(|_| {
        DovetailError::construction(key, format!("Type mismatch: expected {}", type_name::<T>()))
    })
}

/// Registration entry for a single identifier.
#[derive(Clone)]
pub(crate) struct Binding {
    pub key: DependencyKey,
    pub factory: FactoryFn,
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding").field("key", &self.key).finish()
    }
}

/// Stores all bindings of a container.
///
/// Entries live as long as the registry; nothing is ever removed.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    bindings: HashMap<DependencyKey, Binding>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a binding, replacing any previous one for the same key.
    ///
    /// # Errors
    /// Returns [`DovetailError::AlreadyRegistered`] if the key is
    /// already bound and `allow_override` is false.
    pub fn register(&mut self, binding: Binding, allow_override: bool) -> Result<()> {
        let key = binding.key.clone();

        if !allow_override && self.bindings.contains_key(&key) {
            return Err(DovetailError::AlreadyRegistered(AlreadyRegisteredError { key }));
        }

        let replaced = self.bindings.insert(key.clone(), binding).is_some();
        debug!(key = %key, replaced, "Registered binding");
        Ok(())
    }

    /// Returns the factory bound to `key`.
    pub fn factory(&self, key: &DependencyKey) -> Option<FactoryFn> {
        self.bindings.get(key).map(|binding| binding.factory.clone())
    }

    pub fn contains(&self, key: &DependencyKey) -> bool {
        self.bindings.contains_key(key)
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns all bound keys.
    pub fn keys(&self) -> impl Iterator<Item = &DependencyKey> {
        self.bindings.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: i32) -> FactoryFn {
        Arc::new(move |_: &dyn Resolver| -> Result<Instance> { Ok(Box::new(value)) })
    }

    fn binding(name: &'static str, value: i32) -> Binding {
        Binding {
            key: DependencyKey::new(name),
            factory: constant(value),
        }
    }

    struct NoResolver;

    impl Resolver for NoResolver {
        fn resolve_key(&self, key: &DependencyKey) -> Result<Instance> {
            Err(DovetailError::construction(key, "unreachable"))
        }

        fn contains_key(&self, _key: &DependencyKey) -> bool {
            false
        }
    }

    fn invoke(registry: &Registry, name: &'static str) -> i32 {
        let factory = registry.factory(&DependencyKey::new(name)).unwrap();
        *factory(&NoResolver).unwrap().downcast::<i32>().unwrap()
    }

    #[test]
    fn register_and_get() {
        let mut reg = Registry::new();
        reg.register(binding("Answer", 42), true).unwrap();
        assert!(reg.contains(&DependencyKey::new("Answer")));
        assert_eq!(invoke(&reg, "Answer"), 42);
    }

    #[test]
    fn reregistering_replaces() {
        let mut reg = Registry::new();
        reg.register(binding("Answer", 1), true).unwrap();
        reg.register(binding("Answer", 2), true).unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(invoke(&reg, "Answer"), 2);
    }

    #[test]
    fn duplicate_fails_without_override() {
        let mut reg = Registry::new();
        reg.register(binding("Answer", 1), false).unwrap();
        match reg.register(binding("Answer", 2), false).unwrap_err() {
            DovetailError::AlreadyRegistered(err) => assert_eq!(err.key.as_str(), "Answer"),
            other => panic!("Expected AlreadyRegistered, got: {other:?}"),
        }
        assert_eq!(invoke(&reg, "Answer"), 1);
    }

    #[test]
    fn unknown_key_has_no_factory() {
        let reg = Registry::new();
        assert!(reg.factory(&DependencyKey::new("Missing")).is_none());
    }

    #[test]
    fn downcast_mismatch_is_construction_error() {
        let err = downcast::<String>(DependencyKey::new("Answer"), Box::new(1i32)).unwrap_err();
        assert!(err.to_string().contains("Type mismatch"));
    }
}
