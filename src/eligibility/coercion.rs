use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

use super::domain::{DataType, Operator, RawValue, Rule};
use super::error::EligibilityError;

/// Strings accepted as `true`; any other string coerces to `false`.
const TRUE_WORDS: [&str; 5] = ["true", "1", "yes", "y", "on"];

/// Accepted date layouts, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];

/// Markers stripped from numeric strings before parsing.
const CURRENCY_MARKERS: [&str; 3] = [",", "₹", "Rs."];

/// Canonical value after coercion to a declared data type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    List(Vec<Value>),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Date(_) => "date",
            Value::List(_) => "list",
        }
    }

    /// Ordering between two values of compatible kinds; `None` when they cannot be ordered.
    pub fn ordering(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(left), Value::Integer(right)) => Some(left.cmp(right)),
            (Value::Date(left), Value::Date(right)) => Some(left.cmp(right)),
            (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
            (Value::Boolean(left), Value::Boolean(right)) => Some(left.cmp(right)),
            (left, right) => match (left.as_f64(), right.as_f64()) {
                (Some(left), Some(right)) => left.partial_cmp(&right),
                _ => None,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", RawValue::from(self.clone()))
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => RawValue::Text(text),
            Value::Integer(value) => RawValue::Integer(value),
            Value::Float(value) => RawValue::Float(value),
            Value::Boolean(value) => RawValue::Boolean(value),
            Value::Date(value) => RawValue::Date(value),
            Value::List(items) => RawValue::List(items.into_iter().map(RawValue::from).collect()),
        }
    }
}

/// Rule-side value shaped for its operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    Scalar(Value),
    Range { low: Value, high: Value },
    Set(Vec<Value>),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", RawValue::from(self.clone()))
    }
}

impl From<Expected> for RawValue {
    fn from(expected: Expected) -> Self {
        match expected {
            Expected::Scalar(value) => value.into(),
            Expected::Range { low, high } => RawValue::List(vec![low.into(), high.into()]),
            Expected::Set(items) => RawValue::List(items.into_iter().map(RawValue::from).collect()),
        }
    }
}

/// Convert `raw` into the canonical representation of `data_type`.
pub fn coerce(raw: &RawValue, data_type: DataType, field: &str) -> Result<Value, EligibilityError> {
    let failure = || EligibilityError::TypeCoercion {
        field: field.to_string(),
        raw_value: raw.clone(),
        data_type,
    };

    match data_type {
        DataType::String => match raw {
            RawValue::Null => Ok(Value::String(String::new())),
            RawValue::Text(text) => Ok(Value::String(text.trim().to_string())),
            RawValue::List(_) => Err(failure()),
            // `{:?}` keeps the fractional part, so 2.0 renders as "2.0".
            RawValue::Float(value) => Ok(Value::String(format!("{value:?}"))),
            other => Ok(Value::String(other.to_string())),
        },
        DataType::Integer => match raw {
            RawValue::Integer(value) => Ok(Value::Integer(*value)),
            RawValue::Boolean(flag) => Ok(Value::Integer(i64::from(*flag))),
            RawValue::Float(value) if value.is_finite() && value.abs() < i64::MAX as f64 => {
                Ok(Value::Integer(value.trunc() as i64))
            }
            RawValue::Text(text) => text
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| failure()),
            _ => Err(failure()),
        },
        DataType::Float => match raw {
            RawValue::Integer(value) => Ok(Value::Float(*value as f64)),
            RawValue::Float(value) if value.is_finite() => Ok(Value::Float(*value)),
            RawValue::Boolean(flag) => Ok(Value::Float(if *flag { 1.0 } else { 0.0 })),
            RawValue::Text(text) => parse_amount(text).map(Value::Float).ok_or_else(failure),
            _ => Err(failure()),
        },
        DataType::Boolean => match raw {
            RawValue::Boolean(flag) => Ok(Value::Boolean(*flag)),
            RawValue::Text(text) => {
                let lowered = text.trim().to_lowercase();
                Ok(Value::Boolean(TRUE_WORDS.contains(&lowered.as_str())))
            }
            RawValue::Integer(value) => Ok(Value::Boolean(*value != 0)),
            RawValue::Float(value) => Ok(Value::Boolean(*value != 0.0)),
            _ => Err(failure()),
        },
        DataType::Date => match raw {
            RawValue::Date(date) => Ok(Value::Date(*date)),
            RawValue::Text(text) => parse_date(text).map(Value::Date).ok_or_else(failure),
            _ => Err(failure()),
        },
        DataType::List => match raw {
            RawValue::List(items) => Ok(Value::List(items.iter().filter_map(natural).collect())),
            RawValue::Text(text) => Ok(Value::List(
                text.split(',')
                    .map(|item| Value::String(item.trim().to_string()))
                    .collect(),
            )),
            RawValue::Null => Err(failure()),
            scalar => Ok(Value::List(natural(scalar).into_iter().collect())),
        },
    }
}

/// Coerce the rule's own value into the shape its operator consumes.
pub fn coerce_expected(rule: &Rule) -> Result<Expected, EligibilityError> {
    match rule.operator {
        Operator::Between => match rule.value.as_list() {
            Some([low, high]) => Ok(Expected::Range {
                low: coerce(low, rule.data_type, &rule.field)?,
                high: coerce(high, rule.data_type, &rule.field)?,
            }),
            _ => Err(EligibilityError::TypeCoercion {
                field: rule.field.clone(),
                raw_value: rule.value.clone(),
                data_type: rule.data_type,
            }),
        },
        Operator::In | Operator::NotIn => {
            if rule.data_type == DataType::List {
                return match coerce(&rule.value, DataType::List, &rule.field)? {
                    Value::List(items) => Ok(Expected::Set(items)),
                    other => Ok(Expected::Scalar(other)),
                };
            }
            match rule.value.as_list() {
                Some(items) => items
                    .iter()
                    .map(|item| coerce(item, rule.data_type, &rule.field))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Expected::Set),
                None => coerce(&rule.value, rule.data_type, &rule.field).map(Expected::Scalar),
            }
        }
        _ => coerce(&rule.value, rule.data_type, &rule.field).map(Expected::Scalar),
    }
}

fn parse_amount(text: &str) -> Option<f64> {
    let cleaned = CURRENCY_MARKERS
        .iter()
        .fold(text.trim().to_string(), |acc, marker| acc.replace(*marker, ""));
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// List members keep their own kind; nulls are dropped.
fn natural(raw: &RawValue) -> Option<Value> {
    match raw {
        RawValue::Null => None,
        RawValue::Boolean(flag) => Some(Value::Boolean(*flag)),
        RawValue::Integer(value) => Some(Value::Integer(*value)),
        RawValue::Float(value) => Some(Value::Float(*value)),
        RawValue::Text(text) => Some(Value::String(text.clone())),
        RawValue::Date(date) => Some(Value::Date(*date)),
        RawValue::List(items) => Some(Value::List(items.iter().filter_map(natural).collect())),
    }
}
