/// Unit tests for DiError and DiResult types

use bindery::{key_of, key_of_named, ContainerBuilder, DiError, DiResult, Resolver, TypeInfo};
use std::error::Error;
use std::sync::Arc;

struct Engine;
struct Wheel;

#[test]
fn test_error_display_no_binding() {
    let error = DiError::NoBindingFound {
        key: key_of::<u32>(),
        requested_by: None,
    };
    assert_eq!(error.to_string(), "No binding found for u32");
}

#[test]
fn test_error_display_no_binding_with_requester() {
    let error = DiError::NoBindingFound {
        key: key_of_named::<u32>("port"),
        requested_by: Some(TypeInfo::of::<String>()),
    };
    assert_eq!(
        error.to_string(),
        "No binding found for u32[\"port\"] (requested by alloc::string::String)"
    );
}

#[test]
fn test_error_display_ambiguous() {
    let error = DiError::AmbiguousBinding {
        key: key_of::<u8>(),
        count: 3,
    };
    assert_eq!(error.to_string(), "Ambiguous binding for u8: 3 unconditional bindings match");
}

#[test]
fn test_error_display_circular() {
    let error = DiError::CircularDependency {
        chain: vec![key_of::<u8>(), key_of::<u16>(), key_of::<u8>()],
    };
    assert_eq!(error.to_string(), "Circular dependency: u8 -> u16 -> u8");
    assert_eq!(error.chain().map(<[_]>::len), Some(3));
}

#[test]
fn test_error_display_type_mismatch() {
    let error = DiError::TypeMismatch("std::string::String");
    assert_eq!(error.to_string(), "Type mismatch for: std::string::String");
}

#[test]
fn test_error_display_depth_exceeded() {
    let error = DiError::DepthExceeded(5);
    assert_eq!(error.to_string(), "Max depth 5 exceeded");
}

#[test]
fn test_error_display_duplicates() {
    let single = DiError::DuplicateSingletonInstance { key: key_of::<u8>() };
    let binding = DiError::DuplicateBinding { key: key_of::<u8>() };
    assert_eq!(single.to_string(), "Duplicate singleton instance for u8");
    assert_eq!(
        binding.to_string(),
        "Binding for u8 is already registered with the same provider"
    );
}

#[test]
fn test_chain_is_only_set_for_cycles() {
    assert!(DiError::DepthExceeded(1).chain().is_none());
    assert!(DiError::TypeMismatch("x").chain().is_none());
}

#[test]
fn test_construction_failure_keeps_source() {
    let mut builder = ContainerBuilder::new();
    builder
        .bind::<Engine>()
        .to_method(|_| Err("spark plug missing".into()))
        .unwrap();
    let container = builder.build();

    let error = container.resolve::<Engine>().err().unwrap();
    assert!(matches!(error, DiError::ProviderConstructionFailed { .. }));
    assert!(error.to_string().contains("spark plug missing"));
    assert_eq!(error.source().unwrap().to_string(), "spark plug missing");
}

#[test]
fn test_nested_errors_pass_through_unchanged() {
    let mut builder = ContainerBuilder::new();
    builder
        .bind::<Engine>()
        .to_method(|ctx| {
            let _wheel: Arc<Wheel> = ctx.resolve()?;
            Ok(Arc::new(Engine))
        })
        .unwrap();
    let container = builder.build();

    match container.resolve::<Engine>() {
        Err(DiError::NoBindingFound { key, requested_by }) => {
            assert_eq!(key, key_of::<Wheel>());
            assert_eq!(requested_by, Some(TypeInfo::of::<Engine>()));
        }
        other => panic!("expected NoBindingFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_di_result_alias() {
    fn parse(ok: bool) -> DiResult<u8> {
        if ok {
            Ok(1)
        } else {
            Err(DiError::DepthExceeded(0))
        }
    }
    assert_eq!(parse(true).unwrap(), 1);
    assert!(parse(false).is_err());
}
