use bindery::{key_of, ContainerBuilder, DiError, Resolver};
use std::sync::Arc;

trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;
}

struct Physics;
struct Audio;
struct Input;

impl Plugin for Physics {
    fn name(&self) -> &'static str {
        "physics"
    }
}

impl Plugin for Audio {
    fn name(&self) -> &'static str {
        "audio"
    }
}

impl Plugin for Input {
    fn name(&self) -> &'static str {
        "input"
    }
}

fn names(plugins: &[Arc<dyn Plugin>]) -> Vec<&'static str> {
    plugins.iter().map(|p| p.name()).collect()
}

#[test]
fn two_unconditional_bindings_are_ambiguous_for_single_requests() {
    let mut builder = ContainerBuilder::new();
    builder.bind::<dyn Plugin>().to_instance(Arc::new(Physics)).unwrap();
    builder.bind::<dyn Plugin>().to_instance(Arc::new(Audio)).unwrap();
    let container = builder.build();

    match container.resolve::<dyn Plugin>() {
        Err(DiError::AmbiguousBinding { key, count }) => {
            assert_eq!(key, key_of::<dyn Plugin>());
            assert_eq!(count, 2);
        }
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }

    // Optional requests do not hide ambiguity.
    assert!(matches!(
        container.try_resolve::<dyn Plugin>(),
        Err(DiError::AmbiguousBinding { .. })
    ));
}

#[test]
fn resolve_all_returns_every_binding_in_declaration_order() {
    let mut builder = ContainerBuilder::new();
    builder.bind::<dyn Plugin>().to_instance(Arc::new(Physics)).unwrap();
    builder.bind::<dyn Plugin>().to_instance(Arc::new(Audio)).unwrap();
    builder.bind::<dyn Plugin>().to_method(|_| Ok(Arc::new(Input) as Arc<dyn Plugin>)).unwrap();
    builder.bind::<dyn Plugin>().with_id("extra").to_instance(Arc::new(Audio)).unwrap();
    let container = builder.build();

    let all = container.resolve_all::<dyn Plugin>().unwrap();
    assert_eq!(names(&all), vec!["physics", "audio", "input"]);

    let extra = container.resolve_all_named::<dyn Plugin>("extra").unwrap();
    assert_eq!(names(&extra), vec!["audio"]);
}

#[test]
fn resolve_all_of_unbound_contract_is_empty() {
    let container = ContainerBuilder::new().build();
    assert!(container.resolve_all::<dyn Plugin>().unwrap().is_empty());
}

#[test]
fn resolve_all_inside_a_constructor() {
    struct Registry {
        plugins: Vec<Arc<dyn Plugin>>,
    }

    let mut builder = ContainerBuilder::new();
    builder.bind::<dyn Plugin>().to_instance(Arc::new(Physics)).unwrap();
    builder.bind::<dyn Plugin>().to_instance(Arc::new(Audio)).unwrap();
    builder
        .bind::<Registry>()
        .to_single_method(|ctx| {
            Ok(Arc::new(Registry {
                plugins: ctx.resolve_all()?,
            }))
        })
        .unwrap();
    let container = builder.build();

    let registry = container.resolve::<Registry>().unwrap();
    assert_eq!(names(&registry.plugins), vec!["physics", "audio"]);
}
