/// Unit tests for ContractKey and TypeInfo

use bindery::{key_of, key_of_named, ContractKey, TypeInfo};
use std::collections::HashSet;
use std::fmt::Debug;

trait Logger: Send + Sync {}

#[test]
fn test_key_display_plain() {
    assert_eq!(key_of::<u32>().to_string(), "u32");
    assert_eq!(key_of::<String>().to_string(), "alloc::string::String");
}

#[test]
fn test_key_display_named() {
    assert_eq!(key_of_named::<u32>("port").to_string(), "u32[\"port\"]");
}

#[test]
fn test_key_display_trait_object() {
    let key = key_of::<dyn Debug>();
    assert!(key.to_string().starts_with("dyn "));
    assert!(key.type_name().contains("Debug"));
}

#[test]
fn test_key_equality_requires_both_parts() {
    assert_eq!(key_of::<u32>(), ContractKey::of::<u32>());
    assert_eq!(key_of_named::<u32>("a"), ContractKey::named::<u32>("a"));

    assert_ne!(key_of::<u32>(), key_of::<u64>());
    assert_ne!(key_of::<u32>(), key_of_named::<u32>("a"));
    assert_ne!(key_of_named::<u32>("a"), key_of_named::<u32>("b"));
    assert_ne!(key_of_named::<u32>("a"), key_of_named::<u64>("a"));
}

#[test]
fn test_empty_identifier_is_still_an_identifier() {
    let empty = key_of_named::<u32>("");
    assert_ne!(empty, key_of::<u32>());
    assert_eq!(empty.identifier(), Some(""));
    assert_eq!(key_of::<u32>().identifier(), None);
}

#[test]
fn test_keys_hash_consistently() {
    let keys: HashSet<ContractKey> = [
        key_of::<u32>(),
        key_of::<u32>(),
        key_of_named::<u32>("a"),
        key_of::<dyn Logger>(),
        key_of::<dyn Logger>(),
    ]
    .into_iter()
    .collect();
    assert_eq!(keys.len(), 3);
}

#[test]
fn test_contract_type_info() {
    let key = key_of_named::<dyn Logger>("audit");
    assert_eq!(key.contract(), TypeInfo::of::<dyn Logger>());
    assert!(key.contract().is::<dyn Logger>());
    assert!(!key.contract().is::<u32>());
}

#[test]
fn test_type_info_name_and_id() {
    let info = TypeInfo::of::<u8>();
    assert_eq!(info.name(), "u8");
    assert_eq!(info.id(), std::any::TypeId::of::<u8>());
    assert_eq!(info.to_string(), "u8");
}
