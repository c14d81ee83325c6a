//! Type descriptors: what the container knows about a type it may build.
//!
//! A [`TypeDescriptor`] answers three questions for auto-resolution:
//! what kind of type is this, what does its constructor take (in order),
//! and how is an instance built from the resolved arguments.
//!
//! Descriptors are usually generated by `#[derive(Injectable)]`, but they
//! can be written by hand for anything the derive cannot express
//! (interfaces, untyped or union parameters).
//!
//! # Examples
//! ```
//! use dovetail_container::descriptor::{Parameter, ParameterType, TypeDescriptor};
//!
//! struct Wheel;
//! struct Engine { wheel: Wheel }
//!
//! let engine = TypeDescriptor::concrete("Engine", |mut args| {
//!     Ok(Engine { wheel: args.take()? })
//! })
//! .with_constructor(vec![Parameter::new("wheel", ParameterType::named("Wheel"))]);
//!
//! assert_eq!(engine.parameters().map(<[_]>::len), Some(1));
//! ```

use std::any::{Any, type_name};
use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use dovetail_support::is_builtin;

use crate::error::{DovetailError, Result};
use crate::key::DependencyKey;

/// A type-erased instance produced by the container.
pub type Instance = Box<dyn Any + Send + Sync>;

/// Builds an instance from its ordered constructor arguments.
pub type BuildFn = Arc<dyn Fn(Arguments) -> Result<Instance> + Send + Sync>;

/// A type the container knows how to describe.
///
/// Implemented by `#[derive(Injectable)]`; the descriptor is what
/// auto-resolution reads, the identifier is where it is stored.
pub trait Injectable: Sized + Send + Sync + 'static {
    /// The identifier this type is described and resolved under.
    const IDENTIFIER: &'static str;

    /// Describes the type's kind and constructor.
    fn descriptor() -> TypeDescriptor;
}

/// What kind of type a descriptor names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Can be built directly.
    Concrete,
    /// Partially implemented; only subtypes can be built.
    Abstract,
    /// A contract with no implementation of its own.
    Interface,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Concrete => write!(f, "concrete"),
            TypeKind::Abstract => write!(f, "abstract"),
            TypeKind::Interface => write!(f, "interface"),
        }
    }
}

/// The declared type of a constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterType {
    /// No type was declared.
    Untyped,
    /// A named, non-builtin type, resolved through the container.
    Named(Cow<'static, str>),
    /// A builtin scalar such as `String` or `u32`.
    Builtin(Cow<'static, str>),
    /// A union of several types.
    Union(Vec<Cow<'static, str>>),
}

impl ParameterType {
    /// A named type, classified as [`ParameterType::Builtin`] when the name
    /// is a builtin scalar.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        if is_builtin(&name) {
            Self::Builtin(name)
        } else {
            Self::Named(name)
        }
    }

    /// A builtin scalar type.
    pub fn builtin(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Builtin(name.into())
    }

    /// A union of the given alternatives.
    pub fn union<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self::Union(alternatives.into_iter().map(Into::into).collect())
    }
}

/// One constructor parameter: its name and declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: Cow<'static, str>,
    ty: ParameterType,
}

impl Parameter {
    pub fn new(name: impl Into<Cow<'static, str>>, ty: ParameterType) -> Self {
        Self { name: name.into(), ty }
    }

    /// A parameter with no declared type.
    pub fn untyped(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, ParameterType::Untyped)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &ParameterType {
        &self.ty
    }

    /// Returns the identifier this parameter is resolved through.
    ///
    /// # Errors
    /// Only [`ParameterType::Named`] parameters can be injected; every other
    /// declared type fails with an error naming `owner` and the parameter.
    pub fn dependency(&self, owner: &DependencyKey) -> Result<DependencyKey> {
        match &self.ty {
            ParameterType::Named(name) => Ok(DependencyKey::new(name.clone())),
            ParameterType::Untyped => Err(DovetailError::MissingTypeHint {
                owner: owner.clone(),
                parameter: self.name.to_string(),
            }),
            ParameterType::Union(alternatives) => Err(DovetailError::UnsupportedUnionType {
                owner: owner.clone(),
                parameter: self.name.to_string(),
                alternatives: alternatives.iter().map(|a| a.to_string()).collect(),
            }),
            ParameterType::Builtin(type_name) => Err(DovetailError::UnresolvableParameterType {
                owner: owner.clone(),
                parameter: self.name.to_string(),
                type_name: type_name.to_string(),
            }),
        }
    }
}

/// Everything auto-resolution needs to know about one type.
#[derive(Clone)]
pub struct TypeDescriptor {
    key: DependencyKey,
    kind: TypeKind,
    constructor: Option<Vec<Parameter>>,
    build: Option<BuildFn>,
}

impl TypeDescriptor {
    /// A concrete type built by `build`, with no constructor parameters
    /// until [`with_constructor`](Self::with_constructor) is called.
    pub fn concrete<T, F>(key: impl Into<DependencyKey>, build: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(Arguments) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            kind: TypeKind::Concrete,
            constructor: None,
            build: Some(Arc::new(move |args: Arguments| -> Result<Instance> {
                Ok(Box::new(build(args)?) as Instance)
            })),
        }
    }

    /// A concrete type that offers no way to build it.
    pub fn unconstructible(key: impl Into<DependencyKey>) -> Self {
        Self::uninstantiable(key, TypeKind::Concrete)
    }

    /// An abstract type.
    pub fn abstract_type(key: impl Into<DependencyKey>) -> Self {
        Self::uninstantiable(key, TypeKind::Abstract)
    }

    /// An interface.
    pub fn interface(key: impl Into<DependencyKey>) -> Self {
        Self::uninstantiable(key, TypeKind::Interface)
    }

    fn uninstantiable(key: impl Into<DependencyKey>, kind: TypeKind) -> Self {
        Self {
            key: key.into(),
            kind,
            constructor: None,
            build: None,
        }
    }

    /// Declares the constructor's parameters, in order.
    pub fn with_constructor(mut self, parameters: Vec<Parameter>) -> Self {
        self.constructor = Some(parameters);
        self
    }

    pub fn key(&self) -> &DependencyKey {
        &self.key
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// The constructor's parameters, or `None` when no constructor is declared.
    pub fn parameters(&self) -> Option<&[Parameter]> {
        self.constructor.as_deref()
    }

    /// Returns the build function if the type can be instantiated.
    ///
    /// # Errors
    /// [`DovetailError::NotInstantiable`] for abstract types, interfaces and
    /// concrete types without a build function.
    pub fn instantiable(&self) -> Result<&BuildFn> {
        match (&self.kind, &self.build) {
            (TypeKind::Concrete, Some(build)) => Ok(build),
            _ => Err(DovetailError::NotInstantiable {
                key: self.key.clone(),
                kind: self.kind,
            }),
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("constructor", &self.constructor)
            .field("buildable", &self.build.is_some())
            .finish()
    }
}

/// Resolved constructor arguments, consumed in declaration order.
pub struct Arguments {
    owner: DependencyKey,
    values: VecDeque<(Cow<'static, str>, Instance)>,
}

impl Arguments {
    pub fn new(owner: DependencyKey) -> Self {
        Self {
            owner,
            values: VecDeque::new(),
        }
    }

    pub(crate) fn with_capacity(owner: DependencyKey, capacity: usize) -> Self {
        Self {
            owner,
            values: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends the value for the next parameter.
    pub fn push(&mut self, parameter: impl Into<Cow<'static, str>>, value: Instance) {
        self.values.push_back((parameter.into(), value));
    }

    /// Takes the next argument as a `T`.
    ///
    /// # Errors
    /// [`DovetailError::ConstructionFailed`] if no argument is left or the
    /// next one is not a `T`.
    pub fn take<T: Any>(&mut self) -> Result<T> {
        let (parameter, value) = self.values.pop_front().ok_or_else(|| {
            DovetailError::construction(
                self.owner.clone(),
                format!("missing argument of type {}", type_name::<T>()),
            )
        })?;

        value.downcast::<T>().map(|b| *b).map_err(|_| {
            DovetailError::construction(
                self.owner.clone(),
                format!("argument \"{parameter}\" is not a {}", type_name::<T>()),
            )
        })
    }

    /// Number of arguments not yet taken.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("owner", &self.owner)
            .field("remaining", &self.values.iter().map(|(p, _)| p).collect::<Vec<_>>())
            .finish()
    }
}
