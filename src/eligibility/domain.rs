use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::EligibilityError;

/// Identifier wrapper for a scheme, e.g. `pm-kisan`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemeCode(pub String);

impl SchemeCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Loosely typed value as it arrives from extraction or scheme documents.
///
/// This is the only shape accepted at the boundary; `coercion` turns it into a
/// canonical [`Value`](super::coercion::Value) for a declared data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    List(Vec<RawValue>),
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => f.write_str("null"),
            RawValue::Boolean(value) => write!(f, "{value}"),
            RawValue::Integer(value) => write!(f, "{value}"),
            RawValue::Float(value) => write!(f, "{value}"),
            RawValue::Text(value) => f.write_str(value),
            RawValue::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            RawValue::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(flag) => RawValue::Boolean(flag),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(integer) => RawValue::Integer(integer),
                None => RawValue::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(text) => RawValue::Text(text),
            serde_json::Value::Array(items) => {
                RawValue::List(items.into_iter().map(RawValue::from).collect())
            }
            other @ serde_json::Value::Object(_) => RawValue::Text(other.to_string()),
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Boolean(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Integer(i64::from(value))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(value: NaiveDate) -> Self {
        RawValue::Date(value)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(values: Vec<T>) -> Self {
        RawValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Flat field → raw value map describing one applicant.
///
/// Absent keys and explicit nulls both mean the field has not been collected yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantRecord {
    fields: BTreeMap<String, RawValue>,
}

impl ApplicantRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(field)
    }

    /// Value for `field` when it has been collected (present and not null).
    pub fn answered(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(field).filter(|value| !value.is_null())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RawValue)> {
        self.fields.iter()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for ApplicantRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for ApplicantRecord {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

/// Canonical data types a rule can declare for its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    List,
}

impl DataType {
    pub const fn label(self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::List => "list",
        }
    }

    pub const fn is_numeric(self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DataType {
    type Err = EligibilityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(DataType::String),
            "integer" | "int" => Ok(DataType::Integer),
            "float" | "number" => Ok(DataType::Float),
            "boolean" | "bool" => Ok(DataType::Boolean),
            "date" => Ok(DataType::Date),
            "list" => Ok(DataType::List),
            _ => Err(EligibilityError::UnsupportedDataType {
                data_type: value.to_string(),
            }),
        }
    }
}

/// Closed set of comparison operators understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==", alias = "EQ")]
    Eq,
    #[serde(rename = "!=", alias = "NEQ")]
    Neq,
    #[serde(rename = ">", alias = "GT")]
    Gt,
    #[serde(rename = "<", alias = "LT")]
    Lt,
    #[serde(rename = ">=", alias = "GTE")]
    Gte,
    #[serde(rename = "<=", alias = "LTE")]
    Lte,
    #[serde(rename = "between", alias = "BETWEEN")]
    Between,
    #[serde(rename = "in", alias = "IN")]
    In,
    #[serde(rename = "not_in", alias = "NOT_IN")]
    NotIn,
}

impl Operator {
    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Neq => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Between => "between",
            Operator::In => "in",
            Operator::NotIn => "not_in",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = EligibilityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "==" | "eq" => Ok(Operator::Eq),
            "!=" | "neq" => Ok(Operator::Neq),
            ">" | "gt" => Ok(Operator::Gt),
            "<" | "lt" => Ok(Operator::Lt),
            ">=" | "gte" => Ok(Operator::Gte),
            "<=" | "lte" => Ok(Operator::Lte),
            "between" => Ok(Operator::Between),
            "in" => Ok(Operator::In),
            "not_in" | "not in" => Ok(Operator::NotIn),
            _ => Err(EligibilityError::UnsupportedOperator {
                operator: value.to_string(),
                data_type: None,
            }),
        }
    }
}

/// How a rule set combines its rule outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Logic {
    #[default]
    All,
    Any,
}

impl Logic {
    pub const fn label(self) -> &'static str {
        match self {
            Logic::All => "ALL",
            Logic::Any => "ANY",
        }
    }
}

/// One typed comparison criterion against a single applicant field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(alias = "rule_id")]
    pub id: String,
    pub field: String,
    pub operator: Operator,
    pub value: RawValue,
    pub data_type: DataType,
    #[serde(default)]
    pub description: String,
}

impl Rule {
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<RawValue>,
        data_type: DataType,
    ) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            operator,
            value: value.into(),
            data_type,
            description: String::new(),
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Ordered group of rules combined under ALL or ANY logic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub logic: Logic,
}

impl RuleSet {
    pub fn new(logic: Logic, rules: Vec<Rule>) -> Self {
        Self { rules, logic }
    }

    pub fn all(rules: Vec<Rule>) -> Self {
        Self::new(Logic::All, rules)
    }

    pub fn any(rules: Vec<Rule>) -> Self {
        Self::new(Logic::Any, rules)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule fields the record has not collected yet, in rule order without repeats.
    pub fn missing_fields(&self, record: &ApplicantRecord) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for rule in &self.rules {
            if record.answered(&rule.field).is_none() && !missing.contains(&rule.field) {
                missing.push(rule.field.clone());
            }
        }
        missing
    }
}

/// Coarse importance tag assigned to a failing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}
