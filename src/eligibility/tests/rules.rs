use super::common::*;
use crate::eligibility::rules::humanize;
use crate::eligibility::{
    ApplicantRecord, DataType, EligibilityError, EvaluationPolicy, Operator, RawValue,
    ReasonCode, Rule, RuleEvaluator, Severity,
};

fn evaluator() -> RuleEvaluator {
    RuleEvaluator::new(EvaluationPolicy::default())
}

#[test]
fn missing_field_fails_with_zero_score() {
    let rule = Rule::new("adult", "age", Operator::Gte, 18, DataType::Integer);

    for record in [
        ApplicantRecord::new(),
        ApplicantRecord::new().with("age", RawValue::Null),
    ] {
        let result = evaluator().evaluate(&rule, &record);
        assert!(!result.passed);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.code, Some(ReasonCode::MissingField));
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.reason.as_deref(), Some("missing field: age"));
        assert_eq!(result.observed, RawValue::Null);
    }
}

#[test]
fn satisfied_threshold_scores_full_marks() {
    let rule = Rule::new("adult", "age", Operator::Gte, 18, DataType::Integer);
    let result = evaluator().evaluate(&rule, &ApplicantRecord::new().with("age", "18"));

    assert!(result.passed);
    assert_eq!(result.score, 100.0);
    assert_eq!(result.severity, Severity::Low);
    assert_eq!(result.code, None);
    assert_eq!(result.reason, None);
    assert_eq!(result.observed, RawValue::Integer(18));
}

#[test]
fn positive_land_holding_passes() {
    let rule = Rule::new(
        "holding",
        "land_size_acres",
        Operator::Gt,
        0,
        DataType::Float,
    );
    let record = ApplicantRecord::new().with("land_size_acres", 2.5);
    let result = evaluator().evaluate(&rule, &record);

    assert!(result.passed);
    assert_eq!(result.score, 100.0);
}

#[test]
fn near_miss_on_minimum_earns_partial_credit() {
    let rule = Rule::new("adult", "age", Operator::Gte, 18, DataType::Integer);
    let result = evaluator().evaluate(&rule, &ApplicantRecord::new().with("age", 9));

    assert!(!result.passed);
    assert_close(result.score, 50.0);
    assert_eq!(result.severity, Severity::High);
    assert_eq!(result.code, Some(ReasonCode::ConditionNotMet));
    assert_eq!(
        result.reason.as_deref(),
        Some("Age should be at least 18, but got 9")
    );
}

#[test]
fn partial_credit_is_capped() {
    let rule = Rule::new("adult", "age", Operator::Gte, 18, DataType::Integer);
    let result = evaluator().evaluate(&rule, &ApplicantRecord::new().with("age", 17));

    assert!(!result.passed);
    assert_close(result.score, 90.0);
}

#[test]
fn near_miss_on_maximum_earns_partial_credit() {
    let rule = Rule::new(
        "income-limit",
        "annual_income",
        Operator::Lte,
        200_000,
        DataType::Float,
    );
    let record = ApplicantRecord::new().with("annual_income", "2,50,000");
    let result = evaluator().evaluate(&rule, &record);

    assert!(!result.passed);
    assert_close(result.score, 80.0);
    assert_eq!(result.severity, Severity::Medium);
    assert_eq!(
        result.reason.as_deref(),
        Some("Annual Income should be at most 200000, but got 250000")
    );
}

#[test]
fn non_numeric_failures_score_zero() {
    let rule = Rule::new(
        "citizen",
        "citizenship",
        Operator::Eq,
        "Indian",
        DataType::String,
    );
    let record = ApplicantRecord::new().with("citizenship", "Nepali");
    let result = evaluator().evaluate(&rule, &record);

    assert!(!result.passed);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.severity, Severity::High);
    assert_eq!(
        result.reason.as_deref(),
        Some("Citizenship should be Indian, but got Nepali")
    );
}

#[test]
fn unlisted_fields_fail_with_low_severity() {
    let rule = Rule::new(
        "band",
        "age_band",
        Operator::Between,
        vec![18, 40],
        DataType::Integer,
    );
    let record = ApplicantRecord::new().with("age_band", 70);
    let result = evaluator().evaluate(&rule, &record);

    assert!(!result.passed);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.severity, Severity::Low);
    assert_eq!(
        result.reason.as_deref(),
        Some("Age Band should be between 18 and 40, but got 70")
    );
}

#[test]
fn coercion_failure_becomes_medium_failure() {
    let rule = Rule::new("adult", "age", Operator::Gte, 18, DataType::Integer);
    let record = ApplicantRecord::new().with("age", "forty");
    let result = evaluator().evaluate(&rule, &record);

    assert!(!result.passed);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.code, Some(ReasonCode::CoercionFailed));
    assert_eq!(result.severity, Severity::Medium);
    assert_eq!(result.observed, RawValue::from("forty"));
    assert!(result
        .reason
        .as_deref()
        .is_some_and(|reason| reason.starts_with("type conversion error")));
}

#[test]
fn unsupported_comparison_becomes_high_failure() {
    let rule = Rule::new("crops", "crops", Operator::Gt, vec!["rice"], DataType::List);
    let record = ApplicantRecord::new().with("crops", "rice,jute");
    let result = evaluator().evaluate(&rule, &record);

    assert!(!result.passed);
    assert_eq!(result.code, Some(ReasonCode::EvaluationError));
    assert_eq!(result.severity, Severity::High);
    assert_eq!(result.observed, RawValue::from("rice,jute"));
}

#[test]
fn evaluation_is_idempotent() {
    let record = farmer();
    let evaluator = evaluator();
    for rule in &pm_kisan_rules().rules {
        assert_eq!(
            evaluator.evaluate(rule, &record),
            evaluator.evaluate(rule, &record)
        );
    }
}

#[test]
fn rules_deserialize_from_scheme_documents() {
    let rule: Rule = serde_json::from_str(
        r#"{"rule_id":"adult","field":"age","operator":"GTE","value":18,"data_type":"integer"}"#,
    )
    .expect("rule parses");

    assert_eq!(rule.id, "adult");
    assert_eq!(rule.operator, Operator::Gte);
    assert_eq!(rule.value, RawValue::Integer(18));
    assert!(rule.description.is_empty());
}

#[test]
fn humanize_title_cases_snake_case() {
    assert_eq!(humanize("annual_income"), "Annual Income");
    assert_eq!(humanize("land_size_acres"), "Land Size Acres");
    assert_eq!(humanize("age"), "Age");
}

#[test]
fn operator_and_data_type_parse_document_spellings() {
    assert_eq!(">=".parse::<Operator>(), Ok(Operator::Gte));
    assert_eq!("NOT_IN".parse::<Operator>(), Ok(Operator::NotIn));
    assert_eq!(" Between ".parse::<Operator>(), Ok(Operator::Between));
    assert_eq!("FLOAT".parse::<DataType>(), Ok(DataType::Float));

    match "~=".parse::<Operator>() {
        Err(EligibilityError::UnsupportedOperator { operator, data_type }) => {
            assert_eq!(operator, "~=");
            assert_eq!(data_type, None);
        }
        other => panic!("expected unsupported operator, got {other:?}"),
    }
    match "decimal".parse::<DataType>() {
        Err(error) => assert_eq!(error.to_string(), "unsupported data type: decimal"),
        other => panic!("expected unsupported data type, got {other:?}"),
    }
}
