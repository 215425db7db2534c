use bindery::{
    BindingCondition, ContainerBuilder, DiError, FactoryResult, Injectable, Resolver, ResolverContext,
    TypeInfo,
};
use std::sync::Arc;

macro_rules! speed_holder {
    ($name:ident) => {
        struct $name {
            speed: Arc<u32>,
        }

        impl Injectable for $name {
            fn construct(ctx: &ResolverContext<'_>) -> FactoryResult<Self> {
                Ok($name {
                    speed: ctx.resolve()?,
                })
            }
        }
    };
}

speed_holder!(Player);
speed_holder!(Enemy);
speed_holder!(Boss);

struct Squad {
    leader: Arc<Enemy>,
}

impl Injectable for Squad {
    fn construct(ctx: &ResolverContext<'_>) -> FactoryResult<Self> {
        Ok(Squad {
            leader: ctx.resolve()?,
        })
    }
}

fn bind_units(builder: &mut ContainerBuilder) {
    builder.bind::<Player>().to_transient::<Player>().unwrap();
    builder.bind::<Enemy>().to_transient::<Enemy>().unwrap();
    builder.bind::<Boss>().to_transient::<Boss>().unwrap();
    builder.bind::<Squad>().to_transient::<Squad>().unwrap();
}

#[test]
fn conditional_binding_wins_for_its_requester() {
    let mut builder = ContainerBuilder::new();
    builder.bind::<u32>().to_instance(Arc::new(1)).unwrap();
    builder
        .bind::<u32>()
        .when_injected_into::<Player>()
        .to_instance(Arc::new(5))
        .unwrap();
    bind_units(&mut builder);
    let container = builder.build();

    assert_eq!(*container.resolve::<Player>().unwrap().speed, 5);
    assert_eq!(*container.resolve::<Enemy>().unwrap().speed, 1);
    assert_eq!(*container.resolve::<u32>().unwrap(), 1);
}

#[test]
fn declaration_order_does_not_matter_for_conditions() {
    let mut builder = ContainerBuilder::new();
    builder
        .bind::<u32>()
        .when_injected_into::<Player>()
        .to_instance(Arc::new(5))
        .unwrap();
    builder.bind::<u32>().to_instance(Arc::new(1)).unwrap();
    bind_units(&mut builder);
    let container = builder.build();

    assert_eq!(*container.resolve::<Player>().unwrap().speed, 5);
    assert_eq!(*container.resolve::<Enemy>().unwrap().speed, 1);
}

#[test]
fn first_matching_conditional_binding_is_chosen() {
    let mut builder = ContainerBuilder::new();
    builder
        .bind::<u32>()
        .when_injected_into::<Boss>()
        .to_instance(Arc::new(10))
        .unwrap();
    builder
        .bind::<u32>()
        .when_injected_into_any(&[TypeInfo::of::<Boss>(), TypeInfo::of::<Enemy>()])
        .to_instance(Arc::new(20))
        .unwrap();
    bind_units(&mut builder);
    let container = builder.build();

    assert_eq!(*container.resolve::<Boss>().unwrap().speed, 10);
    assert_eq!(*container.resolve::<Enemy>().unwrap().speed, 20);
}

#[test]
fn unmatched_conditional_binding_is_not_found() {
    let mut builder = ContainerBuilder::new();
    builder
        .bind::<u32>()
        .when_injected_into::<Player>()
        .to_instance(Arc::new(5))
        .unwrap();
    bind_units(&mut builder);
    let container = builder.build();

    match container.resolve::<Enemy>() {
        Err(DiError::NoBindingFound { requested_by, .. }) => {
            assert!(requested_by.unwrap().is::<Enemy>())
        }
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
    assert!(container.try_resolve::<u32>().unwrap().is_none());
}

#[test]
fn within_graph_of_looks_up_the_whole_chain() {
    let mut builder = ContainerBuilder::new();
    builder.bind::<u32>().to_instance(Arc::new(1)).unwrap();
    builder
        .bind::<u32>()
        .when(BindingCondition::within_graph_of::<Squad>())
        .to_instance(Arc::new(3))
        .unwrap();
    bind_units(&mut builder);
    let container = builder.build();

    assert_eq!(*container.resolve::<Squad>().unwrap().leader.speed, 3);
    assert_eq!(*container.resolve::<Enemy>().unwrap().speed, 1);
}

#[test]
fn every_condition_of_a_binding_must_accept() {
    let mut builder = ContainerBuilder::new();
    builder.bind::<u32>().to_instance(Arc::new(1)).unwrap();
    builder
        .bind::<u32>()
        .when(BindingCondition::within_graph_of::<Squad>())
        .when_injected_into::<Player>()
        .to_instance(Arc::new(9))
        .unwrap();
    bind_units(&mut builder);
    let container = builder.build();

    // Enemy inside a squad passes the first condition only.
    assert_eq!(*container.resolve::<Squad>().unwrap().leader.speed, 1);
    // Player outside a squad passes the second condition only.
    assert_eq!(*container.resolve::<Player>().unwrap().speed, 1);
}

#[test]
fn custom_predicates_see_the_request() {
    let mut builder = ContainerBuilder::new();
    builder.bind::<u32>().to_instance(Arc::new(1)).unwrap();
    builder
        .bind::<u32>()
        .when_fn(|ctx| ctx.depth() > 0)
        .to_instance(Arc::new(2))
        .unwrap();
    bind_units(&mut builder);
    let container = builder.build();

    assert_eq!(*container.resolve::<u32>().unwrap(), 1);
    assert_eq!(*container.resolve::<Boss>().unwrap().speed, 2);
}

#[test]
fn conditions_are_described() {
    let cond = BindingCondition::injected_into::<Player>();
    assert!(cond.description().contains("Player"));
    assert!(format!("{cond:?}").starts_with("BindingCondition"));
}
