//! Provider trait — a module of related registrations.
//!
//! Providers group the bindings an application sets up at bootstrap,
//! similar to Laravel's ServiceProvider. They are the place for anything
//! auto-resolution cannot build on its own: interfaces, builtin
//! configuration values, or services that need connection parameters.
//!
//! # Examples
//! ```rust,ignore
//! struct DatabaseProvider { dsn: String }
//!
//! impl Provider for DatabaseProvider {
//!     fn register(&self, registry: &dyn ProviderRegistry) -> Result<()> {
//!         let dsn = self.dsn.clone();
//!         registry.register_factory(
//!             "Database".into(),
//!             factory(move |_| Database::connect(&dsn)),
//!         )
//!     }
//! }
//! ```

use crate::descriptor::TypeDescriptor;
use crate::error::Result;
use crate::key::DependencyKey;
use crate::registry::FactoryFn;

/// A module that registers related dependencies into a container.
pub trait Provider: Send + Sync {
    /// Register bindings and descriptors.
    ///
    /// Called once, when the provider is added to a container.
    fn register(&self, registry: &dyn ProviderRegistry) -> Result<()>;

    /// Optional: human-readable name for log output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Interface that providers use to register dependencies.
///
/// A subset of the container's API, so providers can be tested
/// against a mock registry.
pub trait ProviderRegistry {
    /// Binds a factory to `key`.
    fn register_factory(&self, key: DependencyKey, factory: FactoryFn) -> Result<()>;

    /// Adds a type descriptor for auto-resolution.
    fn register_descriptor(&self, descriptor: TypeDescriptor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Resolver, factory};
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockRegistry {
        factories: RefCell<Vec<DependencyKey>>,
        descriptors: RefCell<Vec<DependencyKey>>,
    }

    impl ProviderRegistry for MockRegistry {
        fn register_factory(&self, key: DependencyKey, _factory: FactoryFn) -> Result<()> {
            self.factories.borrow_mut().push(key);
            Ok(())
        }

        fn register_descriptor(&self, descriptor: TypeDescriptor) {
            self.descriptors.borrow_mut().push(descriptor.key().clone());
        }
    }

    struct LoggingProvider;

    impl Provider for LoggingProvider {
        fn register(&self, registry: &dyn ProviderRegistry) -> Result<()> {
            registry.register_descriptor(TypeDescriptor::interface("Logger"));
            registry.register_factory(
                "Logger".into(),
                factory(|_: &dyn Resolver| Ok(String::from("console"))),
            )?;
            registry.register_factory("LogLevel".into(), factory(|_: &dyn Resolver| Ok(3u8)))
        }
    }

    #[test]
    fn provider_registers_dependencies() {
        let registry = MockRegistry::default();
        LoggingProvider.register(&registry).unwrap();

        assert_eq!(
            *registry.factories.borrow(),
            vec![DependencyKey::new("Logger"), DependencyKey::new("LogLevel")]
        );
        assert_eq!(*registry.descriptors.borrow(), vec![DependencyKey::new("Logger")]);
    }

    #[test]
    fn provider_has_name() {
        assert!(LoggingProvider.name().contains("LoggingProvider"));
    }
}
