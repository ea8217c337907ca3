use super::common::*;
use crate::eligibility::{RegistryError, RuleSet, SchemeCode, SchemeDefinition, SchemeRegistry};

fn variant(code: &str) -> SchemeDefinition {
    SchemeDefinition {
        code: SchemeCode::new(code),
        name: code.to_uppercase(),
        rules: RuleSet::default(),
        exclusions: Vec::new(),
    }
}

#[test]
fn empty_registry_starts_at_version_zero() {
    let registry = SchemeRegistry::new();
    let snapshot = registry.snapshot().expect("readable");

    assert_eq!(snapshot.version(), 0);
    assert!(snapshot.is_empty());
}

#[test]
fn unknown_scheme_is_reported() {
    let registry = SchemeRegistry::with_schemes([pm_kisan_scheme()]);

    match registry.get(&SchemeCode::new("ujjwala")) {
        Err(RegistryError::UnknownScheme(code)) => assert_eq!(code.as_str(), "ujjwala"),
        other => panic!("expected unknown scheme, got {other:?}"),
    }
    assert_eq!(
        registry.get(&pm_kisan_code()).expect("registered").name,
        "PM-KISAN"
    );
}

#[test]
fn reload_swaps_the_whole_snapshot() {
    let registry = SchemeRegistry::with_schemes([pm_kisan_scheme(), variant("pmay")]);
    let before = registry.snapshot().expect("readable");

    let version = registry.reload([variant("ujjwala")]).expect("reload");

    assert_eq!(version, 2);
    assert_eq!(before.version(), 1);
    assert_eq!(before.len(), 2);
    assert!(before.get(&pm_kisan_code()).is_some());

    let after = registry.snapshot().expect("readable");
    let codes: Vec<&str> = after.codes().map(SchemeCode::as_str).collect();
    assert_eq!(codes, vec!["ujjwala"]);
    assert!(matches!(
        registry.get(&pm_kisan_code()),
        Err(RegistryError::UnknownScheme(_))
    ));
}

#[test]
fn upsert_and_remove_keep_other_schemes() {
    let registry = SchemeRegistry::with_schemes([pm_kisan_scheme()]);

    assert_eq!(registry.upsert(variant("pmay")).expect("upsert"), 2);
    let mut renamed = pm_kisan_scheme();
    renamed.name = "PM-KISAN (revised)".to_string();
    assert_eq!(registry.upsert(renamed).expect("upsert"), 3);

    let snapshot = registry.snapshot().expect("readable");
    assert_eq!(snapshot.len(), 2);
    assert_eq!(
        snapshot.get(&pm_kisan_code()).expect("present").name,
        "PM-KISAN (revised)"
    );

    assert_eq!(registry.remove(&SchemeCode::new("pmay")).expect("remove"), 4);
    assert_eq!(registry.snapshot().expect("readable").len(), 1);
}
