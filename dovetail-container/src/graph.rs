//! Dependency graph validation.
//!
//! Walks the descriptor graph reachable from one identifier and reports
//! the first problem resolution would hit:
//! - unknown identifiers
//! - types that cannot be instantiated
//! - untyped, union or builtin constructor parameters
//! - cycles
//!
//! Nothing is built and no factory runs. A bound identifier is a leaf:
//! what its factory asks for is only known when it runs.

use std::collections::HashSet;

use dovetail_support::rendering::render_chain;
use tracing::{debug, instrument, warn};

use crate::container::Container;
use crate::error::{CyclicDependencyError, DovetailError};
use crate::key::DependencyKey;
use crate::registry::Resolver;

/// Depth-first validator over a container's catalog.
///
/// Maintains a "path" of identifiers being visited to detect cycles,
/// and a set of identifiers already proven resolvable so shared
/// sub-graphs are walked once.
pub(crate) struct GraphValidator<'a> {
    container: &'a Container,
    /// Currently being visited (for cycle detection)
    visiting: HashSet<DependencyKey>,
    /// Already validated (cache)
    validated: HashSet<DependencyKey>,
    /// Current DFS path (for error reporting)
    path: Vec<DependencyKey>,
}

impl<'a> GraphValidator<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            container,
            visiting: HashSet::new(),
            validated: HashSet::new(),
            path: Vec::new(),
        }
    }

    /// Validates everything reachable from `root`.
    #[instrument(skip(self), name = "graph_validation")]
    pub fn validate(&mut self, root: &DependencyKey) -> Result<(), DovetailError> {
        self.validate_key(root)?;
        debug!(validated = self.validated.len(), "Dependency graph validation passed");
        Ok(())
    }

    fn validate_key(&mut self, key: &DependencyKey) -> Result<(), DovetailError> {
        if self.validated.contains(key) {
            return Ok(());
        }

        if self.visiting.contains(key) {
            let cycle_start = self.path.iter().position(|k| k == key).unwrap_or(0);
            let mut chain: Vec<DependencyKey> = self.path[cycle_start..].to_vec();
            chain.push(key.clone());

            warn!(chain = %render_chain(&chain), "Cyclic dependency detected");
            return Err(DovetailError::CyclicDependency(CyclicDependencyError { chain }));
        }

        if self.container.contains_key(key) {
            self.validated.insert(key.clone());
            return Ok(());
        }

        let descriptor = self
            .container
            .catalog()
            .get(key)
            .ok_or_else(|| self.container.not_found(key, self.path.last()))?;
        descriptor.instantiable()?;

        self.visiting.insert(key.clone());
        self.path.push(key.clone());

        for parameter in descriptor.parameters().unwrap_or_default() {
            let dependency = parameter.dependency(key)?;
            self.validate_key(&dependency)?;
        }

        self.path.pop();
        self.visiting.remove(key);
        self.validated.insert(key.clone());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeCatalog;
    use crate::descriptor::{Parameter, ParameterType, TypeDescriptor, TypeKind};
    use crate::registry::ResolverApi;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn needs(name: &'static str, dependencies: &[&'static str]) -> TypeDescriptor {
        TypeDescriptor::concrete(name, |_| Ok(())).with_constructor(
            dependencies
                .iter()
                .map(|dep| Parameter::new(dep.to_lowercase(), ParameterType::named(*dep)))
                .collect(),
        )
    }

    fn container(descriptors: Vec<TypeDescriptor>) -> Container {
        let catalog = TypeCatalog::new();
        for descriptor in descriptors {
            catalog.insert(descriptor);
        }
        Container::with_catalog(catalog)
    }

    #[test]
    fn valid_simple_graph() {
        let container = container(vec![
            needs("Database", &[]),
            needs("UserRepo", &["Database"]),
            needs("UserService", &["UserRepo"]),
        ]);
        assert!(container.validate("UserService").is_ok());
    }

    #[test]
    fn validation_builds_nothing() {
        let built = Arc::new(AtomicU32::new(0));
        let container = container(vec![TypeDescriptor::concrete("Database", {
            let built = built.clone();
            move |_| {
                built.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })]);
        container
            .register("Pool", |r| r.get_as::<()>("Database"))
            .unwrap();

        container.validate("Database").unwrap();
        container.validate("Pool").unwrap();
        assert_eq!(built.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn detect_circular_dependency() {
        // A → B → C → A
        let container = container(vec![
            needs("A", &["B"]),
            needs("B", &["C"]),
            needs("C", &["A"]),
        ]);

        match container.validate("A").unwrap_err() {
            DovetailError::CyclicDependency(err) => {
                let chain: Vec<&str> = err.chain.iter().map(DependencyKey::as_str).collect();
                assert_eq!(chain, vec!["A", "B", "C", "A"]);
            }
            other => panic!("Expected CyclicDependency, got: {other:?}"),
        }
    }

    #[test]
    fn detect_self_dependency() {
        let container = container(vec![needs("A", &["A"])]);
        assert!(matches!(
            container.validate("A"),
            Err(DovetailError::CyclicDependency(_))
        ));
    }

    #[test]
    fn binding_breaks_the_walk() {
        let container = container(vec![needs("A", &["B"]), needs("B", &["A"])]);
        container.register("B", |_| Ok(())).unwrap();
        assert!(container.validate("A").is_ok());
    }

    #[test]
    fn detect_missing_dependency() {
        let container = container(vec![needs("A", &["B"])]);

        match container.validate("A").unwrap_err() {
            DovetailError::NotFound(err) => {
                assert_eq!(err.requested.as_str(), "B");
                assert_eq!(err.required_by.as_ref().map(DependencyKey::as_str), Some("A"));
            }
            other => panic!("Expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn detect_uninstantiable_dependency() {
        let container = container(vec![
            needs("Mailer", &["Transport"]),
            TypeDescriptor::interface("Transport"),
        ]);

        match container.validate("Mailer").unwrap_err() {
            DovetailError::NotInstantiable { key, kind } => {
                assert_eq!(key.as_str(), "Transport");
                assert_eq!(kind, TypeKind::Interface);
            }
            other => panic!("Expected NotInstantiable, got: {other:?}"),
        }
    }

    #[test]
    fn detect_builtin_parameter() {
        let container = container(vec![
            TypeDescriptor::concrete("Service", |_| Ok(()))
                .with_constructor(vec![Parameter::new("port", ParameterType::named("u16"))]),
        ]);

        assert!(matches!(
            container.validate("Service"),
            Err(DovetailError::UnresolvableParameterType { .. })
        ));
    }

    #[test]
    fn diamond_dependency_ok() {
        //     A
        //    / \
        //   B   C
        //    \ /
        //     D
        let container = container(vec![
            needs("D", &[]),
            needs("B", &["D"]),
            needs("C", &["D"]),
            needs("A", &["B", "C"]),
        ]);
        assert!(container.validate("A").is_ok());
    }
}
