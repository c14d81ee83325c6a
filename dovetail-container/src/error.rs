//! Error types for Dovetail container operations.
//!
//! Every resolution failure names the type being built and, where one is
//! involved, the constructor parameter that could not be satisfied.

use std::fmt;

use dovetail_support::rendering::{render_chain, render_union};

use crate::descriptor::TypeKind;
use crate::key::DependencyKey;

/// Main error type for all Dovetail operations.
#[derive(Debug, thiserror::Error)]
pub enum DovetailError {
    /// The target is abstract, an interface, or has no usable constructor.
    #[error("Type \"{key}\" is not instantiable ({kind})")]
    NotInstantiable { key: DependencyKey, kind: TypeKind },

    /// A constructor parameter declares no type.
    #[error("Failed to resolve \"{owner}\": parameter \"{parameter}\" is missing a type hint")]
    MissingTypeHint { owner: DependencyKey, parameter: String },

    /// A constructor parameter declares a union of several types.
    #[error(
        "Failed to resolve \"{owner}\": parameter \"{parameter}\" has union type \"{}\"",
        render_union(.alternatives)
    )]
    UnsupportedUnionType {
        owner: DependencyKey,
        parameter: String,
        alternatives: Vec<String>,
    },

    /// A constructor parameter declares a builtin scalar type.
    #[error(
        "Failed to resolve \"{owner}\": parameter \"{parameter}\" has builtin type \"{type_name}\" which cannot be injected"
    )]
    UnresolvableParameterType {
        owner: DependencyKey,
        parameter: String,
        type_name: String,
    },

    /// The identifier is neither bound nor described.
    #[error("{}", .0)]
    NotFound(NotFoundError),

    /// The identifier is already being resolved further up the chain.
    #[error("{}", .0)]
    CyclicDependency(CyclicDependencyError),

    /// A factory or build function returned an error.
    #[error("Failed to construct \"{key}\": {source}")]
    ConstructionFailed {
        key: DependencyKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Dependency was already registered (when override is disabled).
    #[error("{}", .0)]
    AlreadyRegistered(AlreadyRegisteredError),
}

impl DovetailError {
    /// Wraps an arbitrary error raised while building `key`.
    pub fn construction(
        key: impl Into<DependencyKey>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ConstructionFailed {
            key: key.into(),
            source: source.into(),
        }
    }

    /// Returns `true` if the identifier was unknown to the container.
    ///
    /// Every other variant means the identifier was known but could not
    /// be resolved.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Error when an identifier is neither bound nor described.
///
/// Includes helpful hints about what went wrong.
#[derive(Debug)]
pub struct NotFoundError {
    /// The identifier that was requested
    pub requested: DependencyKey,
    /// The type whose constructor asked for it (if any)
    pub required_by: Option<DependencyKey>,
    /// Known identifiers with similar names
    pub suggestions: Vec<String>,
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No binding or type found for \"{}\"", self.requested)?;

        if let Some(ref parent) = self.required_by {
            write!(f, "\n  Required by: {parent}")?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: register a factory for \"{}\" or derive Injectable on the type",
            self.requested
        )
    }
}

/// Error when an identifier is requested while it is still being resolved.
///
/// Shows the full chain so you can see WHERE the cycle is.
#[derive(Debug)]
pub struct CyclicDependencyError {
    /// The identifiers forming the cycle, first and last being the same.
    /// Example: ["A", "B", "C", "A"]
    pub chain: Vec<DependencyKey>,
}

impl fmt::Display for CyclicDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cyclic dependency detected:\n  {}", render_chain(&self.chain))?;
        write!(
            f,
            "\n  Hint: break the cycle with a factory that builds one side explicitly"
        )
    }
}

/// Error when trying to register an identifier that is already bound.
#[derive(Debug)]
pub struct AlreadyRegisteredError {
    pub key: DependencyKey,
}

impl fmt::Display for AlreadyRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dependency already registered: {}", self.key)?;
        write!(f, "\n  Hint: enable allow_override in the container settings")
    }
}

/// Convenient Result type for Dovetail operations.
pub type Result<T> = std::result::Result<T, DovetailError>;
