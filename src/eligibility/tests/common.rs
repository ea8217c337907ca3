use crate::eligibility::{
    ApplicantRecord, DataType, EligibilityEngine, EngineConfig, EvaluationResult,
    ExclusionPredicate, Operator, RawValue, Rule, RuleSet, SchemeCode, SchemeDefinition, Severity,
};

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn pm_kisan_code() -> SchemeCode {
    SchemeCode::new("pm-kisan")
}

pub(super) fn pm_kisan_rules() -> RuleSet {
    RuleSet::all(vec![
        Rule::new(
            "income-limit",
            "annual_income",
            Operator::Lte,
            200_000,
            DataType::Float,
        )
        .described("Household income within the scheme limit"),
        Rule::new(
            "land-owner",
            "land_ownership",
            Operator::Eq,
            true,
            DataType::Boolean,
        )
        .described("Owns cultivable land"),
        Rule::new("adult", "age", Operator::Gte, 18, DataType::Integer)
            .described("Applicant is an adult"),
        Rule::new(
            "citizen",
            "citizenship",
            Operator::Eq,
            "Indian",
            DataType::String,
        )
        .described("Indian citizen"),
        Rule::new(
            "holding",
            "land_size_acres",
            Operator::Gt,
            0,
            DataType::Float,
        )
        .described("Holds a non-zero land area"),
    ])
}

pub(super) fn pm_kisan_scheme() -> SchemeDefinition {
    SchemeDefinition {
        code: pm_kisan_code(),
        name: "PM-KISAN".to_string(),
        rules: pm_kisan_rules(),
        exclusions: ExclusionPredicate::standard_set(),
    }
}

/// Applicant who passes every rule and answers `false` to every exclusion.
pub(super) fn farmer() -> ApplicantRecord {
    ApplicantRecord::new()
        .with("citizenship", "Indian")
        .with("age", 45)
        .with("land_ownership", "yes")
        .with("annual_income", "₹1,50,000")
        .with("land_size_acres", 2.5)
        .with("is_constitutional_post_holder", false)
        .with("is_political_office_holder", false)
        .with("is_government_employee", false)
        .with("is_income_tax_payer", false)
        .with("is_professional", false)
        .with("is_nri", false)
        .with("is_pensioner", false)
}

pub(super) fn engine() -> EligibilityEngine {
    EligibilityEngine::new(EngineConfig::default())
}

pub(super) fn failed_result(field: &str, severity: Severity, reason: &str) -> EvaluationResult {
    EvaluationResult {
        rule_id: format!("{field}-rule"),
        field: field.to_string(),
        passed: false,
        score: 0.0,
        code: None,
        reason: Some(reason.to_string()),
        severity,
        observed: RawValue::Null,
        expected: RawValue::Null,
    }
}

pub(super) fn passed_result(field: &str) -> EvaluationResult {
    EvaluationResult {
        rule_id: format!("{field}-rule"),
        field: field.to_string(),
        passed: true,
        score: 100.0,
        code: None,
        reason: None,
        severity: Severity::Low,
        observed: RawValue::Null,
        expected: RawValue::Null,
    }
}
