use std::sync::Arc;

use dovetail::prelude::*;

#[derive(Debug, Injectable)]
struct Wheel;

#[derive(Debug, Injectable)]
struct Engine {
    wheel: Wheel,
}

#[derive(Injectable)]
struct Service {
    connection_string: String,
    retries: u8,
}

trait Clock: Send + Sync {}

#[derive(Injectable)]
#[injectable(id = "app.scheduler")]
struct Scheduler {
    #[inject(id = "Clock")]
    clock: Arc<dyn Clock>,
    engine: Engine,
}

#[derive(Injectable)]
struct Pair(Wheel, Engine);

#[derive(Injectable)]
#[injectable(crate = "dovetail")]
struct Blank {}

#[derive(Injectable)]
struct Counter {
    hits: [u32; 4],
}

#[test]
fn identifier_defaults_to_struct_name() {
    assert_eq!(Engine::IDENTIFIER, "Engine");
    assert_eq!(DependencyKey::of::<Engine>().as_str(), "Engine");
    assert_eq!(Engine::descriptor().key().as_str(), "Engine");
}

#[test]
fn identifier_can_be_overridden() {
    assert_eq!(Scheduler::IDENTIFIER, "app.scheduler");
    assert_eq!(Scheduler::descriptor().key().as_str(), "app.scheduler");
}

#[test]
fn unit_struct_has_no_constructor() {
    let descriptor = Wheel::descriptor();
    assert_eq!(descriptor.kind(), TypeKind::Concrete);
    assert!(descriptor.parameters().is_none());
}

#[test]
fn empty_braces_declare_an_empty_constructor() {
    assert_eq!(Blank::descriptor().parameters(), Some(&[][..]));
}

#[test]
fn fields_become_parameters_in_order() {
    assert_eq!(
        Service::descriptor().parameters().unwrap(),
        &[
            Parameter::new("connection_string", ParameterType::Builtin("String".into())),
            Parameter::new("retries", ParameterType::Builtin("u8".into())),
        ]
    );
    assert_eq!(
        Engine::descriptor().parameters().unwrap(),
        &[Parameter::new("wheel", ParameterType::Named("Wheel".into()))]
    );
}

#[test]
fn inject_attribute_names_the_dependency() {
    let descriptor = Scheduler::descriptor();
    let parameters = descriptor.parameters().unwrap();
    assert_eq!(parameters[0].name(), "clock");
    assert_eq!(parameters[0].ty(), &ParameterType::Named("Clock".into()));
    assert_eq!(parameters[1].ty(), &ParameterType::Named("Engine".into()));
}

#[test]
fn tuple_fields_are_named_by_position() {
    let descriptor = Pair::descriptor();
    let names: Vec<&str> = descriptor
        .parameters()
        .unwrap()
        .iter()
        .map(Parameter::name)
        .collect();
    assert_eq!(names, vec!["0", "1"]);
}

#[test]
fn non_path_types_are_builtin() {
    let descriptor = Counter::descriptor();
    assert!(matches!(
        descriptor.parameters().unwrap()[0].ty(),
        ParameterType::Builtin(_)
    ));
}

#[test]
fn derived_types_are_discovered() {
    let catalog = TypeCatalog::discover();
    for id in ["Wheel", "Engine", "Service", "app.scheduler", "Pair", "Blank"] {
        assert!(catalog.contains(&DependencyKey::new(id)), "{id} was not discovered");
    }
}
