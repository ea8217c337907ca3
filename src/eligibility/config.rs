use serde::{Deserialize, Serialize};

/// Scoring and severity dials for rule evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationPolicy {
    /// Fields whose failure is tagged `high`.
    pub critical_fields: Vec<String>,
    /// Fields whose failure is tagged `medium`.
    pub important_fields: Vec<String>,
    /// Upper bound on the partial credit a failed GTE/LTE rule can earn.
    pub partial_credit_cap: f64,
    /// Multiplier applied to the mean score when an ALL rule set fails.
    pub all_failure_multiplier: f64,
}

impl Default for EvaluationPolicy {
    fn default() -> Self {
        Self {
            critical_fields: vec![
                "age".to_string(),
                "citizenship".to_string(),
                "land_ownership".to_string(),
            ],
            important_fields: vec![
                "annual_income".to_string(),
                "bank_account_linked".to_string(),
            ],
            partial_credit_cap: 90.0,
            all_failure_multiplier: 0.5,
        }
    }
}

/// Thresholds and exemptions for conditional exclusions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionPolicy {
    pub exempt_posts: Vec<String>,
    pub pension_threshold: f64,
}

impl ExclusionPolicy {
    /// Exempt-post match ignores surrounding whitespace and letter case.
    pub fn is_exempt_post(&self, post: &str) -> bool {
        let post = post.trim();
        self.exempt_posts
            .iter()
            .any(|exempt| exempt.trim().eq_ignore_ascii_case(post))
    }
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self {
            exempt_posts: vec![
                "Group D".to_string(),
                "MTS".to_string(),
                "Multi Tasking Staff".to_string(),
            ],
            pension_threshold: 10_000.0,
        }
    }
}

/// Engine-wide configuration bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub evaluation: EvaluationPolicy,
    pub exclusion: ExclusionPolicy,
}
