//! Коллекции и словари: порядок, перезапись, смешанные source

mod common;

use anyhow::Result;
use proptest::prelude::*;
use rstest::rstest;
use serial_test::serial;
use std::{collections::HashMap, sync::Arc};

use common::{fixed, Greeter, ReferenceGreeter, ValueGreeter};
use injector::{
    annotated_with, as_instance, as_provider, as_reference, as_singleton, as_value, bind,
    in_collection, in_map, reset, resolve, with_annotation, InjectError, Registry,
};

fn greetings(greeters: &[Arc<dyn Greeter>]) -> Vec<String> {
    greeters.iter().map(|greeter| greeter.greet()).collect()
}

#[test]
#[serial]
fn test_collection_with_mixed_sources() -> Result<()> {
    reset();

    bind(in_collection(as_value::<Arc<dyn Greeter>, ValueGreeter>()), &[])?;
    bind(in_collection(as_reference::<dyn Greeter, ReferenceGreeter>()), &[])?;
    bind(
        in_collection(as_provider::<Arc<dyn Greeter>, _, InjectError, _>(|| {
            Ok(fixed("provided"))
        })),
        &[],
    )?;
    bind(in_collection(as_instance::<Arc<dyn Greeter>, _>(fixed("instance"))), &[])?;

    let greeters: Vec<Arc<dyn Greeter>> = resolve(&[])?;
    assert_eq!(
        greetings(&greeters),
        vec![
            "value provided inside ValueGreeter",
            "value provided inside ReferenceGreeter",
            "provided",
            "instance",
        ]
    );
    Ok(())
}

#[test]
#[serial]
fn test_collection_is_separate_from_plain_binding() -> Result<()> {
    reset();

    bind(as_instance::<Arc<dyn Greeter>, _>(fixed("plain")), &[])?;
    bind(in_collection(as_instance::<Arc<dyn Greeter>, _>(fixed("listed"))), &[])?;

    assert_eq!(resolve::<Arc<dyn Greeter>>(&[])?.greet(), "plain");
    let listed: Vec<Arc<dyn Greeter>> = resolve(&[])?;
    assert_eq!(greetings(&listed), vec!["listed"]);
    Ok(())
}

#[test]
#[serial]
fn test_map_with_mixed_sources() -> Result<()> {
    reset();

    bind(in_map("first", as_value::<Arc<dyn Greeter>, ValueGreeter>()), &[])?;
    bind(in_map("second", as_reference::<dyn Greeter, ReferenceGreeter>()), &[])?;
    bind(
        in_map(
            "third",
            as_provider::<Arc<dyn Greeter>, _, InjectError, _>(|| Ok(fixed("provided"))),
        ),
        &[],
    )?;
    bind(in_map("fourth", as_instance::<Arc<dyn Greeter>, _>(fixed("instance"))), &[])?;

    let greeters: HashMap<&'static str, Arc<dyn Greeter>> = resolve(&[])?;
    let mut keys: Vec<_> = greeters.keys().copied().collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["first", "fourth", "second", "third"]);
    assert_eq!(greeters["first"].greet(), "value provided inside ValueGreeter");
    assert_eq!(greeters["second"].greet(), "value provided inside ReferenceGreeter");
    assert_eq!(greeters["third"].greet(), "provided");
    assert_eq!(greeters["fourth"].greet(), "instance");
    Ok(())
}

#[test]
#[serial]
fn test_map_overwrites_only_same_key() -> Result<()> {
    reset();

    bind(in_map("first", as_instance::<String, _>("one")), &[])?;
    bind(in_map("second", as_instance::<String, _>("two")), &[])?;
    bind(in_map("first", as_instance::<String, _>("uno")), &[])?;

    let values: HashMap<&'static str, String> = resolve(&[])?;
    assert_eq!(values.len(), 2);
    assert_eq!(values["first"], "uno");
    assert_eq!(values["second"], "two");
    Ok(())
}

#[test]
#[serial]
fn test_annotated_collections_do_not_mix() -> Result<()> {
    reset();

    bind(in_collection(as_instance::<u32, _>(1_u32)), &[with_annotation("odd")])?;
    bind(in_collection(as_instance::<u32, _>(2_u32)), &[with_annotation("even")])?;
    bind(in_collection(as_instance::<u32, _>(3_u32)), &[with_annotation("odd")])?;

    assert_eq!(resolve::<Vec<u32>>(&[annotated_with("odd")])?, vec![1, 3]);
    assert_eq!(resolve::<Vec<u32>>(&[annotated_with("even")])?, vec![2]);
    assert!(resolve::<Vec<u32>>(&[]).unwrap_err().is_not_found());
    Ok(())
}

#[test]
fn test_singleton_collection_restarts_chain() -> Result<()> {
    let registry = Registry::new();

    registry.bind(in_collection(as_instance::<u32, _>(1_u32)), &[as_singleton()])?;
    assert_eq!(registry.resolve::<Vec<u32>>(&[])?, vec![1]);

    // Singleton обёртка не является узлом цепочки, поэтому цепочка начинается заново
    registry.bind(in_collection(as_instance::<u32, _>(2_u32)), &[])?;
    assert_eq!(registry.resolve::<Vec<u32>>(&[])?, vec![2]);
    Ok(())
}

#[test]
fn test_collection_provider_failure_fails_whole_resolution() -> Result<()> {
    let registry = Registry::new();

    registry.bind(in_collection(as_instance::<u32, _>(1_u32)), &[])?;
    registry.bind(
        in_collection(as_provider::<u32, u32, _, _>(|| Err("offline"))),
        &[],
    )?;

    let err = registry.resolve::<Vec<u32>>(&[]).unwrap_err();
    assert!(matches!(err, InjectError::Provider { .. }));
    Ok(())
}

#[rstest]
#[case::empty(0)]
#[case::single(1)]
#[case::several(4)]
#[case::long_chain(500)]
fn test_collection_length_matches_registrations(#[case] count: usize) -> Result<()> {
    let registry = Registry::new();
    for index in 0..count {
        registry.bind(in_collection(as_instance::<usize, _>(index)), &[])?;
    }

    if count == 0 {
        assert!(registry.resolve::<Vec<usize>>(&[]).unwrap_err().is_not_found());
    } else {
        let values: Vec<usize> = registry.resolve(&[])?;
        assert_eq!(values, (0..count).collect::<Vec<_>>());
    }
    Ok(())
}

#[test]
fn test_registry_with_long_chain_drops_cleanly() -> Result<()> {
    let registry = Registry::new();
    for index in 0..100_000_usize {
        registry.bind(in_collection(as_instance::<usize, _>(index)), &[])?;
        registry.bind(in_map(index, as_instance::<usize, _>(index)), &[])?;
    }

    let values: Vec<usize> = registry.resolve(&[])?;
    assert_eq!(values.len(), 100_000);
    assert_eq!(values.last(), Some(&99_999));

    registry.clear();
    assert!(registry.is_empty());

    for index in 0..100_000_usize {
        registry.bind(in_collection(as_instance::<usize, _>(index)), &[])?;
    }
    drop(registry);
    Ok(())
}

proptest! {
    #[test]
    fn prop_collection_preserves_registration_order(values in proptest::collection::vec(any::<i64>(), 1..40)) {
        let registry = Registry::new();
        for value in &values {
            registry.bind(in_collection(as_instance::<i64, _>(*value)), &[]).unwrap();
        }

        let resolved: Vec<i64> = registry.resolve(&[]).unwrap();
        prop_assert_eq!(resolved, values);
    }

    #[test]
    fn prop_map_keeps_last_value_per_key(entries in proptest::collection::vec((0u8..8, any::<u32>()), 1..40)) {
        let registry = Registry::new();
        let mut expected = HashMap::new();
        for (key, value) in &entries {
            registry.bind(in_map(*key, as_instance::<u32, _>(*value)), &[]).unwrap();
            expected.insert(*key, *value);
        }

        let resolved: HashMap<u8, u32> = registry.resolve(&[]).unwrap();
        prop_assert_eq!(resolved, expected);
    }
}
