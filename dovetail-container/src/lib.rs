//! Core container implementation for Dovetail DI.

pub mod catalog;
pub mod container;
pub mod descriptor;
pub mod error;
mod graph;
pub mod key;
pub mod provider;
pub mod registry;
pub mod settings;

pub use catalog::{Discovered, TypeCatalog};
pub use container::{Container, ContainerBuilder, prelude};
pub use descriptor::{Arguments, Injectable, Instance, Parameter, ParameterType, TypeDescriptor, TypeKind};
pub use error::{DovetailError, Result};
pub use key::DependencyKey;
pub use provider::{Provider, ProviderRegistry};
pub use registry::{FactoryFn, Resolver, ResolverApi, factory};
pub use settings::ContainerSettings;

#[doc(hidden)]
pub mod __private {
    pub use inventory;
}
