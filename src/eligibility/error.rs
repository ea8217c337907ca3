use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{DataType, RawValue};

/// Failures the eligibility core can report.
///
/// Per-rule failures are folded into failed evaluation results by the rule evaluator;
/// only `IncompleteExclusionData` is expected to reach callers of a full evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EligibilityError {
    #[error("missing field: {field}")]
    MissingField { field: String },
    #[error("type conversion error: cannot convert {raw_value} to {data_type} for field '{field}'")]
    TypeCoercion {
        field: String,
        raw_value: RawValue,
        data_type: DataType,
    },
    #[error("unsupported operator: {operator}{}", for_type(.data_type))]
    UnsupportedOperator {
        operator: String,
        data_type: Option<String>,
    },
    #[error("unsupported data type: {data_type}")]
    UnsupportedDataType { data_type: String },
    #[error("incomplete exclusion data: {}", PendingList(.pending))]
    IncompleteExclusionData { pending: Vec<PendingExclusion> },
}

/// Exclusion predicate that answered `true` but still lacks sub-fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingExclusion {
    pub predicate: String,
    pub missing: Vec<String>,
}

fn for_type(data_type: &Option<String>) -> String {
    match data_type {
        Some(data_type) => format!(" for {data_type}"),
        None => String::new(),
    }
}

struct PendingList<'a>(&'a [PendingExclusion]);

impl fmt::Display for PendingList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, pending) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(
                f,
                "{} requires {}",
                pending.predicate,
                pending.missing.join(", ")
            )?;
        }
        Ok(())
    }
}
