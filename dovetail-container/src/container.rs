//! # The Container — heart of Dovetail
//!
//! Maps identifiers to factory bindings and, when no binding exists,
//! builds the requested type itself from its [`TypeDescriptor`],
//! resolving each constructor parameter through the container again.
//!
//! # Architecture
//! ```text
//! get(id) ──has binding?──yes──> factory(resolver)
//!               │
//!               no
//!               ▼
//!          autowire(id) ── for each parameter ──> get(dependency)
//! ```
//!
//! # Examples
//! ```rust
//! use dovetail_container::prelude::*;
//!
//! struct Wheel;
//! struct Engine { wheel: Wheel }
//!
//! let catalog = TypeCatalog::new();
//! catalog.insert(TypeDescriptor::concrete("Wheel", |_| Ok(Wheel)));
//! catalog.insert(
//!     TypeDescriptor::concrete("Engine", |mut args| Ok(Engine { wheel: args.take()? }))
//!         .with_constructor(vec![Parameter::new("wheel", ParameterType::named("Wheel"))]),
//! );
//!
//! let container = Container::with_catalog(catalog);
//! let engine: Engine = container.get_as("Engine").expect("Failed to resolve");
//! ```

use std::fmt;

use dovetail_support::rendering::{render_chain, suggest_similar};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, trace, warn};

use crate::catalog::TypeCatalog;
use crate::descriptor::{Arguments, Injectable, Instance, TypeDescriptor};
use crate::error::{CyclicDependencyError, DovetailError, NotFoundError, Result};
use crate::graph::GraphValidator;
use crate::key::DependencyKey;
use crate::provider::{Provider, ProviderRegistry};
use crate::registry::{Binding, FactoryFn, Registry, Resolver, factory};
use crate::settings::ContainerSettings;

// ============================================================
// ContainerBuilder
// ============================================================

/// Builds a [`Container`] with settings, descriptors and bindings.
///
/// # Examples
/// ```rust,ignore
/// let container = Container::builder()
///     .settings(ContainerSettings::default().allow_override(false))
///     .register("DbConfig", |_| Ok(DbConfig::from_env()))
///     .add_provider(DatabaseProvider)
///     .build()?;
/// ```
pub struct ContainerBuilder {
    settings: ContainerSettings,
    catalog: Option<TypeCatalog>,
    descriptors: Vec<TypeDescriptor>,
    bindings: Vec<Binding>,
    providers: Vec<Box<dyn Provider>>,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self {
            settings: ContainerSettings::default(),
            catalog: None,
            descriptors: Vec::new(),
            bindings: Vec::new(),
            providers: Vec::new(),
        }
    }

    pub fn settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Use `catalog` instead of the discovered one.
    pub fn catalog(mut self, catalog: TypeCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Add a type descriptor.
    pub fn descriptor(mut self, descriptor: TypeDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Add the descriptor of `T`.
    pub fn describe<T: Injectable>(self) -> Self {
        self.descriptor(T::descriptor())
    }

    /// Bind a factory to `id`. Re-invoked on every lookup.
    pub fn register<T, F>(mut self, id: impl Into<DependencyKey>, f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    {
        self.bindings.push(Binding {
            key: id.into(),
            factory: factory(f),
        });
        self
    }

    /// Bind a value to `id`. Cloned on every lookup.
    pub fn register_value<T: Clone + Send + Sync + 'static>(
        self,
        id: impl Into<DependencyKey>,
        value: T,
    ) -> Self {
        self.register(id, move |_: &dyn Resolver| Ok(value.clone()))
    }

    /// Add a [`Provider`] module.
    pub fn add_provider(mut self, provider: impl Provider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Build the container.
    ///
    /// Descriptors are added first, then bindings in registration order,
    /// then providers.
    ///
    /// # Errors
    /// [`DovetailError::AlreadyRegistered`] if an identifier is bound twice
    /// while overriding is disabled, or whatever a provider returns.
    #[instrument(skip(self), name = "container_build")]
    pub fn build(self) -> Result<Container> {
        let catalog = self.catalog.unwrap_or_else(TypeCatalog::discover);
        let container = Container::from_parts(catalog, self.settings);

        for descriptor in self.descriptors {
            container.catalog.insert(descriptor);
        }

        for binding in self.bindings {
            container.register_factory(binding.key, binding.factory)?;
        }

        for provider in &self.providers {
            container.add_provider(provider.as_ref())?;
        }

        info!(
            bindings = container.registry.read().len(),
            types = container.catalog.len(),
            "Container built"
        );
        Ok(container)
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Dependency injection container.
///
/// Thread-safe: registration and lookup may happen from any thread.
/// Lookups go through [`ResolverApi`](crate::registry::ResolverApi):
/// `get`, `has`, `get_as` and `resolve`.
pub struct Container {
    registry: RwLock<Registry>,
    catalog: TypeCatalog,
    settings: ContainerSettings,
}

impl Container {
    /// Creates a container over every discovered type descriptor.
    pub fn new() -> Self {
        Self::with_catalog(TypeCatalog::discover())
    }

    /// Creates a container over `catalog`, with default settings.
    pub fn with_catalog(catalog: TypeCatalog) -> Self {
        Self::from_parts(catalog, ContainerSettings::default())
    }

    /// Creates a container over every discovered type descriptor, with
    /// the given settings.
    pub fn with_settings(settings: ContainerSettings) -> Self {
        Self::from_parts(TypeCatalog::discover(), settings)
    }

    /// Creates a builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    fn from_parts(catalog: TypeCatalog, settings: ContainerSettings) -> Self {
        debug!(types = catalog.len(), ?settings, "Creating container");
        Self {
            registry: RwLock::new(Registry::new()),
            catalog,
            settings,
        }
    }

    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    /// The descriptors used for auto-resolution.
    ///
    /// New descriptors may be inserted at any time.
    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Binds a factory to `id`.
    ///
    /// The factory runs on every lookup of `id` and receives a resolver
    /// for its own dependencies.
    ///
    /// # Errors
    /// [`DovetailError::AlreadyRegistered`] when `id` is already bound and
    /// the settings disable overriding.
    pub fn register<T, F>(&self, id: impl Into<DependencyKey>, f: F) -> Result<()>
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    {
        self.register_factory(id.into(), factory(f))
    }

    /// Binds a value to `id`; every lookup returns a clone.
    pub fn register_value<T: Clone + Send + Sync + 'static>(
        &self,
        id: impl Into<DependencyKey>,
        value: T,
    ) -> Result<()> {
        self.register(id, move |_: &dyn Resolver| Ok(value.clone()))
    }

    /// Binds an already type-erased factory to `key`.
    pub fn register_factory(&self, key: DependencyKey, factory: FactoryFn) -> Result<()> {
        self.registry
            .write()
            .register(Binding { key, factory }, self.settings.allow_override)
    }

    /// Lets `provider` register its bindings and descriptors.
    pub fn add_provider(&self, provider: &dyn Provider) -> Result<()> {
        debug!(provider = provider.name(), "Adding provider");
        provider.register(self)
    }

    /// Checks that `id` could be resolved, without building anything.
    ///
    /// Walks the descriptor graph from `id` applying the same rules as
    /// resolution. Bound identifiers are accepted as they are; their
    /// factories are never run.
    pub fn validate(&self, id: impl Into<DependencyKey>) -> Result<()> {
        GraphValidator::new(self).validate(&id.into())
    }

    /// Resolves `key`, with `parent` being the chain already in progress.
    fn resolve_in(&self, key: &DependencyKey, parent: Option<&ResolutionFrame<'_>>) -> Result<Instance> {
        if let Some(chain) = parent.and_then(|frame| frame.cycle_to(key)) {
            warn!(chain = %render_chain(&chain), "Cyclic dependency detected");
            return Err(DovetailError::CyclicDependency(CyclicDependencyError { chain }));
        }

        let frame = ResolutionFrame { key, parent };

        let bound = self.registry.read().factory(key);
        match bound {
            Some(factory) => {
                trace!(key = %key, "Invoking binding");
                factory(&ContainerResolver {
                    container: self,
                    frame: &frame,
                })
            }
            None => self.autowire(&frame),
        }
    }

    /// Builds `frame.key` from its descriptor.
    fn autowire(&self, frame: &ResolutionFrame<'_>) -> Result<Instance> {
        let key = frame.key;
        let descriptor = self
            .catalog
            .get(key)
            .ok_or_else(|| self.not_found(key, frame.parent.map(|parent| parent.key)))?;

        let build = descriptor.instantiable()?;
        let parameters = descriptor.parameters().unwrap_or_default();

        if parameters.is_empty() {
            trace!(key = %key, "Building without arguments");
            return build(Arguments::new(key.clone()));
        }

        let mut arguments = Arguments::with_capacity(key.clone(), parameters.len());
        for parameter in parameters {
            let dependency = parameter.dependency(key)?;
            trace!(
                owner = %key,
                parameter = parameter.name(),
                dependency = %dependency,
                "Resolving constructor parameter"
            );
            let value = self.resolve_in(&dependency, Some(frame))?;
            arguments.push(parameter.name().to_owned(), value);
        }

        trace!(key = %key, arguments = arguments.len(), "Building");
        build(arguments)
    }

    pub(crate) fn not_found(
        &self,
        key: &DependencyKey,
        required_by: Option<&DependencyKey>,
    ) -> DovetailError {
        let mut known = self.catalog.keys();
        known.extend(self.registry.read().keys().cloned());
        known.sort();
        known.dedup();

        let names: Vec<&str> = known.iter().map(DependencyKey::as_str).collect();
        DovetailError::NotFound(NotFoundError {
            requested: key.clone(),
            required_by: required_by.cloned(),
            suggestions: suggest_similar(key.as_str(), &names, self.settings.max_suggestions),
        })
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for Container {
    fn resolve_key(&self, key: &DependencyKey) -> Result<Instance> {
        trace!(key = %key, "Resolving");
        self.resolve_in(key, None)
    }

    fn contains_key(&self, key: &DependencyKey) -> bool {
        self.registry.read().contains(key)
    }
}

impl ProviderRegistry for Container {
    fn register_factory(&self, key: DependencyKey, factory: FactoryFn) -> Result<()> {
        Container::register_factory(self, key, factory)
    }

    fn register_descriptor(&self, descriptor: TypeDescriptor) {
        self.catalog.insert(descriptor);
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.registry.read().len())
            .field("types", &self.catalog.len())
            .field("settings", &self.settings)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Resolution chain
// ═══════════════════════════════════════════

/// One identifier in progress, linked to the one that asked for it.
struct ResolutionFrame<'a> {
    key: &'a DependencyKey,
    parent: Option<&'a ResolutionFrame<'a>>,
}

impl<'a> ResolutionFrame<'a> {
    /// If `key` is already in progress, returns the cycle from its first
    /// occurrence back to `key`.
    fn cycle_to(&self, key: &DependencyKey) -> Option<Vec<DependencyKey>> {
        let mut path: Vec<&DependencyKey> =
            std::iter::successors(Some(self), |frame| frame.parent).map(|frame| frame.key).collect();
        path.reverse();

        let start = path.iter().position(|&k| k == key)?;
        let mut chain: Vec<DependencyKey> = path[start..].iter().map(|&k| k.clone()).collect();
        chain.push(key.clone());
        Some(chain)
    }
}

/// Resolver handed to factories; lookups through it extend the chain.
struct ContainerResolver<'a> {
    container: &'a Container,
    frame: &'a ResolutionFrame<'a>,
}

impl Resolver for ContainerResolver<'_> {
    fn resolve_key(&self, key: &DependencyKey) -> Result<Instance> {
        self.container.resolve_in(key, Some(self.frame))
    }

    fn contains_key(&self, key: &DependencyKey) -> bool {
        self.container.contains_key(key)
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder};
    pub use crate::catalog::{Discovered, TypeCatalog};
    pub use crate::descriptor::{
        Arguments, Injectable, Instance, Parameter, ParameterType, TypeDescriptor, TypeKind,
    };
    pub use crate::error::{DovetailError, Result};
    pub use crate::key::DependencyKey;
    pub use crate::provider::{Provider, ProviderRegistry};
    pub use crate::registry::{FactoryFn, Resolver, ResolverApi, factory};
    pub use crate::settings::ContainerSettings;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
