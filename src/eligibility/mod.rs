//! Scheme eligibility core: typed rule evaluation, conditional exclusions, and the
//! explanation that ties both into one verdict.

pub mod coercion;
pub mod compound;
mod config;
pub mod domain;
mod error;
pub mod exclusion;
pub mod explainer;
pub mod operators;
pub mod optimizer;
pub mod registry;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use coercion::{Expected, Value};
pub use compound::{CompoundEvaluator, CompoundResult};
pub use config::{EngineConfig, EvaluationPolicy, ExclusionPolicy};
pub use domain::{
    ApplicantRecord, DataType, Logic, Operator, RawValue, Rule, RuleSet, SchemeCode, Severity,
};
pub use error::{EligibilityError, PendingExclusion};
pub use exclusion::{
    ExclusionEvaluator, ExclusionGate, ExclusionOutcome, ExclusionPredicate, ExclusionState,
    ExclusionVerdict,
};
pub use explainer::{ActiveExclusion, CriterionDetail, Explanation};
pub use optimizer::{FailurePattern, RuleStatistics};
pub use registry::{RegistryError, RegistrySnapshot, SchemeDefinition, SchemeRegistry};
pub use rules::{EvaluationResult, ReasonCode, RuleEvaluator};
pub use service::{EligibilityService, EligibilityServiceError};

use serde::{Deserialize, Serialize};

/// Stateless evaluator combining inclusion rules and exclusion predicates.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEngine {
    compound: CompoundEvaluator,
    exclusions: ExclusionEvaluator,
}

impl EligibilityEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            compound: CompoundEvaluator::new(config.evaluation),
            exclusions: ExclusionEvaluator::new(config.exclusion),
        }
    }

    pub fn compound(&self) -> &CompoundEvaluator {
        &self.compound
    }

    /// Evaluate one applicant. Rules run in priority order; exclusions resolve
    /// independently and must be complete for a verdict to be produced.
    pub fn evaluate(
        &self,
        rule_set: &RuleSet,
        predicates: &[ExclusionPredicate],
        record: &ApplicantRecord,
    ) -> Result<EligibilityReport, EligibilityError> {
        let ordered = optimizer::optimize_order(&rule_set.rules);
        let compound = self.compound.evaluate(&ordered, rule_set.logic, record);
        let exclusions = self.exclusions.evaluate(predicates, record)?;
        let explanation = explainer::explain(rule_set, &compound, &exclusions, record);

        Ok(EligibilityReport {
            compound,
            exclusions,
            explanation,
        })
    }
}

/// Everything produced for one applicant evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub compound: CompoundResult,
    pub exclusions: ExclusionVerdict,
    pub explanation: Explanation,
}

impl EligibilityReport {
    pub fn is_eligible(&self) -> bool {
        self.explanation.eligible
    }
}
