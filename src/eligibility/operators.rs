//! Comparison semantics over already coerced values.
//!
//! Nothing in here converts types; both sides must come out of `coercion` first.

use std::cmp::Ordering;

use super::coercion::{Expected, Value};
use super::domain::Operator;
use super::error::EligibilityError;

/// Apply `operator` to the applicant value and the rule's expected value.
pub fn apply(
    operator: Operator,
    applicant: &Value,
    expected: &Expected,
) -> Result<bool, EligibilityError> {
    match (operator, expected) {
        (Operator::Eq, Expected::Scalar(value)) => Ok(applicant == value),
        (Operator::Neq, Expected::Scalar(value)) => Ok(applicant != value),
        (Operator::Gt, Expected::Scalar(value)) => {
            ordered(operator, applicant, value).map(Ordering::is_gt)
        }
        (Operator::Lt, Expected::Scalar(value)) => {
            ordered(operator, applicant, value).map(Ordering::is_lt)
        }
        (Operator::Gte, Expected::Scalar(value)) => {
            ordered(operator, applicant, value).map(Ordering::is_ge)
        }
        (Operator::Lte, Expected::Scalar(value)) => {
            ordered(operator, applicant, value).map(Ordering::is_le)
        }
        (Operator::Between, Expected::Range { low, high }) => {
            let above_low = ordered(operator, applicant, low)?.is_ge();
            let below_high = ordered(operator, applicant, high)?.is_le();
            Ok(above_low && below_high)
        }
        (Operator::In, Expected::Set(members)) => Ok(is_member(applicant, members)),
        (Operator::In, Expected::Scalar(value)) => Ok(applicant == value),
        (Operator::NotIn, Expected::Set(members)) => Ok(!is_member(applicant, members)),
        (Operator::NotIn, Expected::Scalar(value)) => Ok(applicant != value),
        (operator, _) => Err(unsupported(operator, applicant)),
    }
}

fn ordered(
    operator: Operator,
    applicant: &Value,
    expected: &Value,
) -> Result<Ordering, EligibilityError> {
    applicant
        .ordering(expected)
        .ok_or_else(|| unsupported(operator, applicant))
}

/// A list applicant value is a member when it shares at least one element with the set.
fn is_member(applicant: &Value, members: &[Value]) -> bool {
    match applicant {
        Value::List(items) => items.iter().any(|item| members.contains(item)),
        scalar => members.contains(scalar),
    }
}

fn unsupported(operator: Operator, applicant: &Value) -> EligibilityError {
    EligibilityError::UnsupportedOperator {
        operator: operator.symbol().to_string(),
        data_type: Some(applicant.kind().to_string()),
    }
}
