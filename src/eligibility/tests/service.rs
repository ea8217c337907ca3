use std::sync::Arc;

use super::common::*;
use crate::eligibility::{
    EligibilityError, EligibilityService, EligibilityServiceError, EngineConfig, RawValue,
    RegistryError, SchemeCode, SchemeRegistry, Severity,
};

fn service() -> EligibilityService {
    let registry = Arc::new(SchemeRegistry::with_schemes([pm_kisan_scheme()]));
    EligibilityService::new(registry, EngineConfig::default())
}

#[test]
fn evaluate_reports_eligible_applicant() {
    let report = service()
        .evaluate(&pm_kisan_code(), &farmer())
        .expect("evaluation succeeds");

    assert!(report.is_eligible());
    assert_eq!(report.compound.score, 100.0);
    assert!(!report.exclusions.excluded);
}

#[test]
fn evaluate_rejects_unknown_scheme() {
    match service().evaluate(&SchemeCode::new("ujjwala"), &farmer()) {
        Err(EligibilityServiceError::Registry(RegistryError::UnknownScheme(code))) => {
            assert_eq!(code.as_str(), "ujjwala")
        }
        other => panic!("expected unknown scheme, got {other:?}"),
    }
}

#[test]
fn evaluate_surfaces_incomplete_exclusion_data() {
    let record = farmer().with("is_pensioner", true);

    match service().evaluate(&pm_kisan_code(), &record) {
        Err(EligibilityServiceError::Eligibility(EligibilityError::IncompleteExclusionData {
            pending,
        })) => {
            assert_eq!(pending.len(), 1);
            assert_eq!(pending[0].predicate, "is_pensioner");
        }
        other => panic!("expected incomplete exclusion data, got {other:?}"),
    }
}

#[test]
fn evaluate_sees_reloaded_schemes() {
    let service = service();
    let mut stricter = pm_kisan_scheme();
    stricter.rules.rules[0].value = RawValue::Integer(100_000);
    service.registry().reload([stricter]).expect("reload");

    let report = service
        .evaluate(&pm_kisan_code(), &farmer())
        .expect("evaluation succeeds");

    assert!(!report.is_eligible());
    assert_eq!(report.explanation.unsatisfied.len(), 1);
    assert_eq!(report.explanation.unsatisfied[0].rule_id, "income-limit");
}

#[test]
fn rule_statistics_cover_every_applicant() {
    let applicants = vec![
        farmer(),
        farmer().with("citizenship", "Nepali"),
        farmer().with("age", 16),
    ];

    let stats = service()
        .rule_statistics(&pm_kisan_code(), &applicants)
        .expect("statistics");

    assert_eq!(stats.total, 15);
    assert_eq!(stats.passed, 13);
    assert_eq!(stats.severity_breakdown.get(&Severity::High), Some(&2));
    assert_eq!(stats.most_common_failures.len(), 2);
    assert_eq!(stats.most_common_failures[0].field, "citizenship");
}
