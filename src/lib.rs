pub mod config;
pub mod eligibility;
pub mod error;
pub mod telemetry;

use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::eligibility::{EligibilityService, SchemeRegistry};
use crate::error::AppError;

/// Load configuration, install tracing, and wire an [`EligibilityService`] over `registry`.
///
/// Intended for a host binary; library consumers can build the service directly.
pub fn bootstrap(registry: Arc<SchemeRegistry>) -> Result<EligibilityService, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let schemes = registry.snapshot()?;
    info!(
        environment = ?config.environment,
        schemes = schemes.len(),
        registry_version = schemes.version(),
        pension_threshold = config.engine.exclusion.pension_threshold,
        "eligibility service ready"
    );

    Ok(EligibilityService::new(registry, config.engine))
}
