use std::env;
use std::fmt;

use crate::eligibility::EngineConfig;

/// Distinguishes runtime behavior for different stages of the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for an embedding application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = match env::var("APP_LOG_FORMAT") {
            Ok(value) => LogFormat::parse(&value)?,
            Err(_) => LogFormat::Compact,
        };

        let mut engine = EngineConfig::default();
        if let Some(cap) = number_var("ELIGIBILITY_PARTIAL_CREDIT_CAP")? {
            if !(0.0..=100.0).contains(&cap) {
                return Err(ConfigError::OutOfRange {
                    var: "ELIGIBILITY_PARTIAL_CREDIT_CAP",
                    value: cap,
                });
            }
            engine.evaluation.partial_credit_cap = cap;
        }
        if let Some(threshold) = number_var("ELIGIBILITY_PENSION_THRESHOLD")? {
            if threshold < 0.0 {
                return Err(ConfigError::OutOfRange {
                    var: "ELIGIBILITY_PENSION_THRESHOLD",
                    value: threshold,
                });
            }
            engine.exclusion.pension_threshold = threshold;
        }
        if let Ok(posts) = env::var("ELIGIBILITY_EXEMPT_POSTS") {
            let posts: Vec<String> = posts
                .split(',')
                .map(str::trim)
                .filter(|post| !post.is_empty())
                .map(str::to_string)
                .collect();
            if !posts.is_empty() {
                engine.exclusion.exempt_posts = posts;
            }
        }

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level, format },
            engine,
        })
    }
}

fn number_var(var: &'static str) -> Result<Option<f64>, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Some)
            .ok_or(ConfigError::InvalidNumber { var, raw }),
        Err(_) => Ok(None),
    }
}

/// Output layout for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(ConfigError::InvalidLogFormat(value.to_string())),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { var: &'static str, raw: String },
    OutOfRange { var: &'static str, value: f64 },
    InvalidLogFormat(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { var, raw } => {
                write!(f, "{var} must be a finite number, got '{raw}'")
            }
            ConfigError::OutOfRange { var, value } => {
                write!(f, "{var} is out of range: {value}")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(
                    f,
                    "APP_LOG_FORMAT must be 'compact' or 'pretty', got '{value}'"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
