use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::coercion::{coerce, coerce_expected, Expected, Value};
use super::config::EvaluationPolicy;
use super::domain::{ApplicantRecord, Operator, RawValue, Rule, Severity};
use super::error::EligibilityError;
use super::operators;

pub(crate) const FULL_SCORE: f64 = 100.0;

/// Structured cause attached to a failed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    ConditionNotMet,
    MissingField,
    CoercionFailed,
    EvaluationError,
}

/// Outcome of one rule against one applicant record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub rule_id: String,
    pub field: String,
    pub passed: bool,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ReasonCode>,
    pub reason: Option<String>,
    pub severity: Severity,
    /// Applicant value, coerced when coercion succeeded.
    pub observed: RawValue,
    /// Rule value, coerced when coercion succeeded.
    pub expected: RawValue,
}

impl EvaluationResult {
    fn failure(
        rule: &Rule,
        code: ReasonCode,
        severity: Severity,
        reason: String,
        observed: RawValue,
    ) -> Self {
        Self {
            rule_id: rule.id.clone(),
            field: rule.field.clone(),
            passed: false,
            score: 0.0,
            code: Some(code),
            reason: Some(reason),
            severity,
            observed,
            expected: rule.value.clone(),
        }
    }
}

/// Evaluates single rules; never fails, every error becomes a failed result.
#[derive(Debug, Clone, Default)]
pub struct RuleEvaluator {
    policy: EvaluationPolicy,
}

impl RuleEvaluator {
    pub fn new(policy: EvaluationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &EvaluationPolicy {
        &self.policy
    }

    pub fn evaluate(&self, rule: &Rule, record: &ApplicantRecord) -> EvaluationResult {
        match self.try_evaluate(rule, record) {
            Ok(result) => result,
            Err(error) => {
                warn!(rule_id = %rule.id, field = %rule.field, %error, "rule evaluation error");
                EvaluationResult::failure(
                    rule,
                    ReasonCode::EvaluationError,
                    Severity::High,
                    format!("evaluation error: {error}"),
                    record.get(&rule.field).cloned().unwrap_or(RawValue::Null),
                )
            }
        }
    }

    fn try_evaluate(
        &self,
        rule: &Rule,
        record: &ApplicantRecord,
    ) -> Result<EvaluationResult, EligibilityError> {
        let Some(raw) = record.answered(&rule.field) else {
            let missing = EligibilityError::MissingField {
                field: rule.field.clone(),
            };
            return Ok(EvaluationResult::failure(
                rule,
                ReasonCode::MissingField,
                Severity::High,
                missing.to_string(),
                RawValue::Null,
            ));
        };

        let coerced = coerce(raw, rule.data_type, &rule.field)
            .and_then(|applicant| coerce_expected(rule).map(|expected| (applicant, expected)));
        let (applicant, expected) = match coerced {
            Ok(pair) => pair,
            Err(error) => {
                debug!(rule_id = %rule.id, %error, "rule value coercion failed");
                return Ok(EvaluationResult::failure(
                    rule,
                    ReasonCode::CoercionFailed,
                    Severity::Medium,
                    error.to_string(),
                    raw.clone(),
                ));
            }
        };

        let passed = operators::apply(rule.operator, &applicant, &expected)?;

        let (score, code, reason, severity) = if passed {
            (FULL_SCORE, None, None, Severity::Low)
        } else {
            (
                self.partial_credit(rule, &applicant, &expected),
                Some(ReasonCode::ConditionNotMet),
                Some(failure_reason(rule, &applicant, &expected)),
                self.severity_for(&rule.field),
            )
        };

        Ok(EvaluationResult {
            rule_id: rule.id.clone(),
            field: rule.field.clone(),
            passed,
            score,
            code,
            reason,
            severity,
            observed: applicant.into(),
            expected: expected.into(),
        })
    }

    /// Near-miss credit for numeric thresholds; everything else scores zero.
    fn partial_credit(&self, rule: &Rule, applicant: &Value, expected: &Expected) -> f64 {
        if !rule.data_type.is_numeric() {
            return 0.0;
        }
        let (Some(observed), Expected::Scalar(threshold)) = (applicant.as_f64(), expected) else {
            return 0.0;
        };
        let Some(threshold) = threshold.as_f64() else {
            return 0.0;
        };

        let ratio = match rule.operator {
            Operator::Gte if threshold != 0.0 => observed / threshold,
            Operator::Lte if observed != 0.0 => threshold / observed,
            _ => return 0.0,
        };

        if !ratio.is_finite() {
            return 0.0;
        }
        (ratio * FULL_SCORE)
            .min(self.policy.partial_credit_cap)
            .max(0.0)
    }

    fn severity_for(&self, field: &str) -> Severity {
        if self.policy.critical_fields.iter().any(|f| f == field) {
            Severity::High
        } else if self.policy.important_fields.iter().any(|f| f == field) {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

fn failure_reason(rule: &Rule, applicant: &Value, expected: &Expected) -> String {
    let field = humanize(&rule.field);
    match (rule.operator, expected) {
        (Operator::Eq, _) => format!("{field} should be {expected}, but got {applicant}"),
        (Operator::Neq, _) => format!("{field} should not be {expected}"),
        (Operator::Gt, _) => {
            format!("{field} should be greater than {expected}, but got {applicant}")
        }
        (Operator::Lt, _) => format!("{field} should be less than {expected}, but got {applicant}"),
        (Operator::Gte, _) => format!("{field} should be at least {expected}, but got {applicant}"),
        (Operator::Lte, _) => format!("{field} should be at most {expected}, but got {applicant}"),
        (Operator::Between, Expected::Range { low, high }) => {
            format!("{field} should be between {low} and {high}, but got {applicant}")
        }
        (Operator::In, _) => format!("{field} should be one of {expected}, but got {applicant}"),
        (Operator::NotIn, _) => format!("{field} should not be one of {expected}"),
        (Operator::Between, _) => {
            format!("{field} does not meet requirement: {}", rule.description)
        }
    }
}

/// `annual_income` -> `Annual Income`.
pub(crate) fn humanize(field: &str) -> String {
    field
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
