use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::EvaluationPolicy;
use super::domain::{ApplicantRecord, Logic, Rule, RuleSet};
use super::rules::{EvaluationResult, RuleEvaluator, FULL_SCORE};

/// Aggregate outcome of a rule set with the full per-rule breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundResult {
    pub passed: bool,
    pub score: f64,
    pub logic: Logic,
    pub total: usize,
    pub passed_count: usize,
    pub failed_count: usize,
    pub results: Vec<EvaluationResult>,
}

/// Runs every rule of a set and folds the outcomes under ALL/ANY logic.
#[derive(Debug, Clone, Default)]
pub struct CompoundEvaluator {
    rules: RuleEvaluator,
}

impl CompoundEvaluator {
    pub fn new(policy: EvaluationPolicy) -> Self {
        Self {
            rules: RuleEvaluator::new(policy),
        }
    }

    pub fn evaluate_set(&self, rule_set: &RuleSet, record: &ApplicantRecord) -> CompoundResult {
        self.evaluate(&rule_set.rules, rule_set.logic, record)
    }

    /// Evaluate `rules` in the given order. No rule is skipped after a failure.
    pub fn evaluate(
        &self,
        rules: &[Rule],
        logic: Logic,
        record: &ApplicantRecord,
    ) -> CompoundResult {
        if rules.is_empty() {
            return CompoundResult {
                passed: true,
                score: FULL_SCORE,
                logic,
                total: 0,
                passed_count: 0,
                failed_count: 0,
                results: Vec::new(),
            };
        }

        let results: Vec<EvaluationResult> = rules
            .iter()
            .map(|rule| self.rules.evaluate(rule, record))
            .collect();

        let total = results.len();
        let passed_count = results.iter().filter(|result| result.passed).count();
        let mean = results.iter().map(|result| result.score).sum::<f64>() / total as f64;

        let passed = match logic {
            Logic::All => passed_count == total,
            Logic::Any => passed_count > 0,
        };
        let score = if logic == Logic::All && !passed {
            mean * self.rules.policy().all_failure_multiplier
        } else {
            mean
        };

        debug!(
            logic = logic.label(),
            total,
            passed_count,
            passed,
            "compound evaluation finished"
        );

        CompoundResult {
            passed,
            score: round2(score),
            logic,
            total,
            passed_count,
            failed_count: total - passed_count,
            results,
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
