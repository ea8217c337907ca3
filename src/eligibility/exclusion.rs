//! Exclusion predicates resolved as a small per-predicate state machine.
//!
//! ```text
//! Unanswered -> AnsweredFalse
//!            -> AnsweredTrue -> Resolved
//!                            -> NeedsSubfield -> Resolved
//! ```
//!
//! A predicate left in `NeedsSubfield` blocks the overall verdict.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::coercion::{coerce, Value};
use super::config::ExclusionPolicy;
use super::domain::{ApplicantRecord, DataType, RawValue};
use super::error::{EligibilityError, PendingExclusion};

pub const GOVERNMENT_POST: &str = "government_post";
pub const MONTHLY_PENSION: &str = "monthly_pension";

/// Extra evidence a predicate needs once its flag answers `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionGate {
    /// `true` excludes outright.
    Direct,
    /// Excluded unless the post is on the exempt list.
    PostExemption { post_field: String },
    /// Excluded when the pension reaches the threshold and the post is not exempt.
    PensionThreshold {
        post_field: String,
        pension_field: String,
    },
}

/// Named boolean gate that can disqualify an applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionPredicate {
    pub field: String,
    pub gate: ExclusionGate,
}

impl ExclusionPredicate {
    pub fn direct(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            gate: ExclusionGate::Direct,
        }
    }

    pub fn post_exemption(field: impl Into<String>, post_field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            gate: ExclusionGate::PostExemption {
                post_field: post_field.into(),
            },
        }
    }

    pub fn pension_threshold(
        field: impl Into<String>,
        post_field: impl Into<String>,
        pension_field: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            gate: ExclusionGate::PensionThreshold {
                post_field: post_field.into(),
                pension_field: pension_field.into(),
            },
        }
    }

    /// The exclusion set applied to PM-KISAN style schemes.
    pub fn standard_set() -> Vec<Self> {
        vec![
            Self::direct("is_constitutional_post_holder"),
            Self::direct("is_political_office_holder"),
            Self::post_exemption("is_government_employee", GOVERNMENT_POST),
            Self::direct("is_income_tax_payer"),
            Self::direct("is_professional"),
            Self::direct("is_nri"),
            Self::pension_threshold("is_pensioner", GOVERNMENT_POST, MONTHLY_PENSION),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExclusionState {
    Unanswered,
    AnsweredFalse,
    AnsweredTrue,
    NeedsSubfield {
        missing: Vec<String>,
    },
    Resolved {
        excluded: bool,
        triggers: BTreeMap<String, RawValue>,
    },
}

impl ExclusionState {
    pub fn is_excluded(&self) -> bool {
        matches!(self, ExclusionState::Resolved { excluded: true, .. })
    }

    /// A definitive answer exists for this predicate.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            ExclusionState::AnsweredFalse | ExclusionState::Resolved { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionOutcome {
    pub predicate: String,
    pub state: ExclusionState,
}

/// Combined exclusion verdict: excluded when ANY predicate excludes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionVerdict {
    pub excluded: bool,
    pub outcomes: Vec<ExclusionOutcome>,
    /// Predicates whose flag has not been collected; these never exclude.
    pub unanswered: Vec<String>,
}

impl ExclusionVerdict {
    pub fn active(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, RawValue>)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match &outcome.state {
                ExclusionState::Resolved {
                    excluded: true,
                    triggers,
                } => Some((outcome.predicate.as_str(), triggers)),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExclusionEvaluator {
    policy: ExclusionPolicy,
}

impl ExclusionEvaluator {
    pub fn new(policy: ExclusionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ExclusionPolicy {
        &self.policy
    }

    /// Resolve every predicate; any predicate stuck waiting on sub-fields is an error.
    pub fn evaluate(
        &self,
        predicates: &[ExclusionPredicate],
        record: &ApplicantRecord,
    ) -> Result<ExclusionVerdict, EligibilityError> {
        let mut outcomes = Vec::with_capacity(predicates.len());
        let mut pending = Vec::new();
        let mut unanswered = Vec::new();

        for predicate in predicates {
            let state = self.resolve(predicate, record);
            match &state {
                ExclusionState::NeedsSubfield { missing } => pending.push(PendingExclusion {
                    predicate: predicate.field.clone(),
                    missing: missing.clone(),
                }),
                ExclusionState::Unanswered => unanswered.push(predicate.field.clone()),
                _ => {}
            }
            outcomes.push(ExclusionOutcome {
                predicate: predicate.field.clone(),
                state,
            });
        }

        if !pending.is_empty() {
            return Err(EligibilityError::IncompleteExclusionData { pending });
        }

        Ok(ExclusionVerdict {
            excluded: outcomes.iter().any(|outcome| outcome.state.is_excluded()),
            outcomes,
            unanswered,
        })
    }

    /// Drive a predicate from `Unanswered` until the record cannot move it further.
    pub fn resolve(
        &self,
        predicate: &ExclusionPredicate,
        record: &ApplicantRecord,
    ) -> ExclusionState {
        let mut state = ExclusionState::Unanswered;
        loop {
            state = self.step(predicate, &state, record);
            // Only an affirmative flag has a further transition for a fixed record.
            if state != ExclusionState::AnsweredTrue {
                return state;
            }
        }
    }

    /// Single transition of the exclusion state machine.
    ///
    /// A flag or sub-field that cannot be coerced is treated as not collected, so it is
    /// asked for again instead of aborting the other predicates.
    pub fn step(
        &self,
        predicate: &ExclusionPredicate,
        state: &ExclusionState,
        record: &ApplicantRecord,
    ) -> ExclusionState {
        match state {
            ExclusionState::Unanswered => {
                match answered_as(record, &predicate.field, DataType::Boolean) {
                    Some(Value::Boolean(true)) => ExclusionState::AnsweredTrue,
                    Some(_) => ExclusionState::AnsweredFalse,
                    None => ExclusionState::Unanswered,
                }
            }
            ExclusionState::AnsweredTrue | ExclusionState::NeedsSubfield { .. } => {
                self.apply_gate(predicate, record)
            }
            settled => settled.clone(),
        }
    }

    fn apply_gate(
        &self,
        predicate: &ExclusionPredicate,
        record: &ApplicantRecord,
    ) -> ExclusionState {
        let mut triggers = BTreeMap::new();
        triggers.insert(predicate.field.clone(), RawValue::Boolean(true));

        match &predicate.gate {
            ExclusionGate::Direct => ExclusionState::Resolved {
                excluded: true,
                triggers,
            },
            ExclusionGate::PostExemption { post_field } => {
                let Some(post) = answered_post(record, post_field) else {
                    return ExclusionState::NeedsSubfield {
                        missing: vec![post_field.clone()],
                    };
                };
                let excluded = !self.policy.is_exempt_post(&post);
                triggers.insert(post_field.clone(), RawValue::Text(post));
                ExclusionState::Resolved { excluded, triggers }
            }
            ExclusionGate::PensionThreshold {
                post_field,
                pension_field,
            } => {
                let post = answered_post(record, post_field);
                let pension = match answered_as(record, pension_field, DataType::Float) {
                    Some(Value::Float(amount)) => Some(amount),
                    _ => None,
                };

                let Some(pension) = pension else {
                    let mut missing = vec![pension_field.clone()];
                    if post.is_none() {
                        missing.insert(0, post_field.clone());
                    }
                    return ExclusionState::NeedsSubfield { missing };
                };
                triggers.insert(pension_field.clone(), RawValue::Float(pension));

                // Below the threshold the post cannot change the outcome.
                if pension < self.policy.pension_threshold {
                    if let Some(post) = post {
                        triggers.insert(post_field.clone(), RawValue::Text(post));
                    }
                    return ExclusionState::Resolved {
                        excluded: false,
                        triggers,
                    };
                }

                let Some(post) = post else {
                    return ExclusionState::NeedsSubfield {
                        missing: vec![post_field.clone()],
                    };
                };
                let excluded = !self.policy.is_exempt_post(&post);
                triggers.insert(post_field.clone(), RawValue::Text(post));
                ExclusionState::Resolved { excluded, triggers }
            }
        }
    }
}

/// Collected value for `field` coerced to `data_type`; unusable answers count as missing.
fn answered_as(record: &ApplicantRecord, field: &str, data_type: DataType) -> Option<Value> {
    let raw = record.answered(field)?;
    match coerce(raw, data_type, field) {
        Ok(value) => Some(value),
        Err(error) => {
            debug!(field, %error, "exclusion answer rejected");
            None
        }
    }
}

/// Trimmed post text; blank answers count as not collected.
fn answered_post(record: &ApplicantRecord, field: &str) -> Option<String> {
    match answered_as(record, field, DataType::String)? {
        Value::String(post) if !post.is_empty() => Some(post),
        _ => None,
    }
}
