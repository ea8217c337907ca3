use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::compound::CompoundResult;
use super::domain::{ApplicantRecord, Logic, RawValue, RuleSet, Severity};
use super::exclusion::ExclusionVerdict;
use super::rules::{EvaluationResult, ReasonCode};

/// One rule as it appears in an explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionDetail {
    pub rule_id: String,
    pub field: String,
    pub description: String,
    pub score: f64,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ReasonCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub observed: RawValue,
    pub expected: RawValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveExclusion {
    pub predicate: String,
    pub triggers: BTreeMap<String, RawValue>,
}

/// Full account of an eligibility decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub eligible: bool,
    pub inclusion_passed: bool,
    pub exclusion_applies: bool,
    pub score: f64,
    pub logic: Logic,
    pub satisfied: Vec<CriterionDetail>,
    pub unsatisfied: Vec<CriterionDetail>,
    pub active_exclusions: Vec<ActiveExclusion>,
    pub unanswered_exclusions: Vec<String>,
    pub evaluated_rules: usize,
    pub total_rules: usize,
    /// Rule ids from the set with no evaluation result.
    pub unevaluated_rules: Vec<String>,
    /// Rule fields the applicant has not supplied yet, in rule order.
    pub missing_fields: Vec<String>,
}

impl Explanation {
    pub fn is_complete(&self) -> bool {
        self.unevaluated_rules.is_empty() && self.evaluated_rules >= self.total_rules
    }
}

pub fn explain(
    rule_set: &RuleSet,
    compound: &CompoundResult,
    exclusions: &ExclusionVerdict,
    record: &ApplicantRecord,
) -> Explanation {
    let descriptions: BTreeMap<&str, &str> = rule_set
        .rules
        .iter()
        .map(|rule| (rule.id.as_str(), rule.description.as_str()))
        .collect();

    let (satisfied, unsatisfied): (Vec<_>, Vec<_>) = compound
        .results
        .iter()
        .map(|result| detail(result, &descriptions))
        .partition(|(passed, _)| *passed);

    let unevaluated_rules = rule_set
        .rules
        .iter()
        .filter(|rule| {
            !compound
                .results
                .iter()
                .any(|result| result.rule_id == rule.id)
        })
        .map(|rule| rule.id.clone())
        .collect();

    let active_exclusions = exclusions
        .active()
        .map(|(predicate, triggers)| ActiveExclusion {
            predicate: predicate.to_string(),
            triggers: triggers.clone(),
        })
        .collect();

    Explanation {
        eligible: compound.passed && !exclusions.excluded,
        inclusion_passed: compound.passed,
        exclusion_applies: exclusions.excluded,
        score: compound.score,
        logic: compound.logic,
        satisfied: satisfied.into_iter().map(|(_, detail)| detail).collect(),
        unsatisfied: unsatisfied.into_iter().map(|(_, detail)| detail).collect(),
        active_exclusions,
        unanswered_exclusions: exclusions.unanswered.clone(),
        evaluated_rules: compound.results.len(),
        total_rules: rule_set.len(),
        unevaluated_rules,
        missing_fields: rule_set.missing_fields(record),
    }
}

fn detail(
    result: &EvaluationResult,
    descriptions: &BTreeMap<&str, &str>,
) -> (bool, CriterionDetail) {
    let description = descriptions
        .get(result.rule_id.as_str())
        .map(|text| text.to_string())
        .unwrap_or_default();
    (
        result.passed,
        CriterionDetail {
            rule_id: result.rule_id.clone(),
            field: result.field.clone(),
            description,
            score: result.score,
            severity: result.severity,
            code: result.code,
            reason: result.reason.clone(),
            observed: result.observed.clone(),
            expected: result.expected.clone(),
        },
    )
}
