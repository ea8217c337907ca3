use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{ApplicantRecord, SchemeCode};
use super::error::EligibilityError;
use super::optimizer::{self, RuleStatistics};
use super::registry::{RegistryError, SchemeRegistry};
use super::{EligibilityEngine, EligibilityReport, EngineConfig};

/// Service composing the scheme registry with the evaluation engine.
#[derive(Debug, Clone)]
pub struct EligibilityService {
    registry: Arc<SchemeRegistry>,
    engine: Arc<EligibilityEngine>,
}

impl EligibilityService {
    pub fn new(registry: Arc<SchemeRegistry>, config: EngineConfig) -> Self {
        Self {
            registry,
            engine: Arc::new(EligibilityEngine::new(config)),
        }
    }

    pub fn registry(&self) -> &Arc<SchemeRegistry> {
        &self.registry
    }

    /// Evaluate an applicant against the scheme registered under `code`.
    pub fn evaluate(
        &self,
        code: &SchemeCode,
        record: &ApplicantRecord,
    ) -> Result<EligibilityReport, EligibilityServiceError> {
        let scheme = self.registry.get(code)?;

        let report = match self
            .engine
            .evaluate(&scheme.rules, &scheme.exclusions, record)
        {
            Ok(report) => report,
            Err(error) => {
                warn!(scheme_code = %code, %error, "eligibility check blocked");
                return Err(error.into());
            }
        };

        info!(
            scheme_code = %code,
            eligible = report.explanation.eligible,
            score = report.compound.score,
            passed_rules = report.compound.passed_count,
            failed_rules = report.compound.failed_count,
            active_exclusions = report.explanation.active_exclusions.len(),
            "eligibility check completed"
        );

        Ok(report)
    }

    /// Inclusion-rule statistics across a batch of applicants, for reporting.
    pub fn rule_statistics(
        &self,
        code: &SchemeCode,
        records: &[ApplicantRecord],
    ) -> Result<RuleStatistics, EligibilityServiceError> {
        let scheme = self.registry.get(code)?;
        let compound = self.engine.compound();

        let results: Vec<_> = records
            .iter()
            .flat_map(|record| compound.evaluate_set(&scheme.rules, record).results)
            .collect();

        Ok(optimizer::statistics(&results))
    }
}

/// Error raised by the eligibility service.
#[derive(Debug, thiserror::Error)]
pub enum EligibilityServiceError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Eligibility(#[from] EligibilityError),
}
