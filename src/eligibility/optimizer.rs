use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::compound::round2;
use super::domain::{DataType, Operator, Rule, Severity};
use super::rules::EvaluationResult;

const PRIORITY_FIELDS: [&str; 2] = ["citizenship", "age"];
const MAX_FAILURE_PATTERNS: usize = 5;

/// Ordering weight of a rule; higher runs first.
pub fn priority(rule: &Rule) -> u32 {
    let mut priority = 0;
    if PRIORITY_FIELDS.contains(&rule.field.as_str()) {
        priority += 100;
    }
    if matches!(rule.operator, Operator::Eq | Operator::Neq) {
        priority += 50;
    }
    if rule.data_type == DataType::Boolean {
        priority += 25;
    }
    priority
}

/// Rules sorted by descending priority; equal priorities keep their original order.
pub fn optimize_order(rules: &[Rule]) -> Vec<Rule> {
    let mut ordered = rules.to_vec();
    ordered.sort_by_key(|rule| Reverse(priority(rule)));
    ordered
}

/// Reporting aggregate over a batch of rule results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleStatistics {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
    pub average_score: f64,
    pub severity_breakdown: BTreeMap<Severity, usize>,
    pub most_common_failures: Vec<FailurePattern>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailurePattern {
    pub field: String,
    pub count: usize,
    pub reasons: Vec<String>,
}

pub fn statistics<'a, I>(results: I) -> RuleStatistics
where
    I: IntoIterator<Item = &'a EvaluationResult>,
{
    let mut total = 0;
    let mut passed = 0;
    let mut score_sum = 0.0;
    let mut severity_breakdown = BTreeMap::new();
    let mut patterns: Vec<FailurePattern> = Vec::new();

    for result in results {
        total += 1;
        score_sum += result.score;
        if result.passed {
            passed += 1;
            continue;
        }

        *severity_breakdown.entry(result.severity).or_insert(0) += 1;

        let Some(reason) = &result.reason else {
            continue;
        };
        match patterns
            .iter_mut()
            .find(|pattern| pattern.field == result.field)
        {
            Some(pattern) => {
                pattern.count += 1;
                if !pattern.reasons.contains(reason) {
                    pattern.reasons.push(reason.clone());
                }
            }
            None => patterns.push(FailurePattern {
                field: result.field.clone(),
                count: 1,
                reasons: vec![reason.clone()],
            }),
        }
    }

    if total == 0 {
        return RuleStatistics {
            total: 0,
            passed: 0,
            failed: 0,
            pass_rate: 0.0,
            average_score: 0.0,
            severity_breakdown,
            most_common_failures: Vec::new(),
        };
    }

    // Stable: ties keep first-seen order.
    patterns.sort_by_key(|pattern| Reverse(pattern.count));
    patterns.truncate(MAX_FAILURE_PATTERNS);

    RuleStatistics {
        total,
        passed,
        failed: total - passed,
        pass_rate: passed as f64 / total as f64 * 100.0,
        average_score: round2(score_sum / total as f64),
        severity_breakdown,
        most_common_failures: patterns,
    }
}
