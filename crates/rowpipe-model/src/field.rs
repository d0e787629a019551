use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Timestamp rendering format shared by CSV output and the SQL sink.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Semantic type of an entity field.
///
/// These are deliberately coarser than storage types: they describe what a
/// column of source text should be coerced to, not how a sink stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Text,
    Integer,
    Decimal,
    Timestamp,
    Boolean,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Text => "text",
            SemanticType::Integer => "integer",
            SemanticType::Decimal => "decimal",
            SemanticType::Timestamp => "timestamp",
            SemanticType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of an entity's field catalog: a name plus its semantic type.
///
/// Descriptor order is significant throughout the pipeline; both the loader
/// and the duplicate audit writer align columns by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub semantic_type: SemanticType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
        }
    }
}

/// A single field value. `Null` stands in for any missing/empty source cell,
/// regardless of the field's semantic type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Timestamp(NaiveDateTime),
    Boolean(bool),
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Render the value as delimited-output text. `Null` renders empty.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(value) => value.clone(),
            FieldValue::Integer(value) => value.to_string(),
            FieldValue::Decimal(value) => value.to_string(),
            FieldValue::Timestamp(value) => value.format(TIMESTAMP_FORMAT).to_string(),
            FieldValue::Boolean(value) => value.to_string(),
            FieldValue::Null => String::new(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    fn type_mismatch(self, field: &str, expected: SemanticType) -> ModelError {
        ModelError::TypeMismatch {
            field: field.to_string(),
            expected,
            actual: match self {
                FieldValue::Null => "null".to_string(),
                other => format!("{:?}", other),
            },
        }
    }

    pub fn into_text(self, field: &str) -> Result<String, ModelError> {
        match self {
            FieldValue::Text(value) => Ok(value),
            other => Err(other.type_mismatch(field, SemanticType::Text)),
        }
    }

    pub fn into_opt_text(self, field: &str) -> Result<Option<String>, ModelError> {
        match self {
            FieldValue::Null => Ok(None),
            other => other.into_text(field).map(Some),
        }
    }

    pub fn into_integer(self, field: &str) -> Result<i64, ModelError> {
        match self {
            FieldValue::Integer(value) => Ok(value),
            other => Err(other.type_mismatch(field, SemanticType::Integer)),
        }
    }

    pub fn into_opt_integer(self, field: &str) -> Result<Option<i64>, ModelError> {
        match self {
            FieldValue::Null => Ok(None),
            other => other.into_integer(field).map(Some),
        }
    }

    pub fn into_decimal(self, field: &str) -> Result<f64, ModelError> {
        match self {
            FieldValue::Decimal(value) => Ok(value),
            other => Err(other.type_mismatch(field, SemanticType::Decimal)),
        }
    }

    pub fn into_timestamp(self, field: &str) -> Result<NaiveDateTime, ModelError> {
        match self {
            FieldValue::Timestamp(value) => Ok(value),
            other => Err(other.type_mismatch(field, SemanticType::Timestamp)),
        }
    }

    pub fn into_boolean(self, field: &str) -> Result<bool, ModelError> {
        match self {
            FieldValue::Boolean(value) => Ok(value),
            other => Err(other.type_mismatch(field, SemanticType::Boolean)),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn render_covers_all_variants() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(FieldValue::Text("abc".to_string()).render(), "abc");
        assert_eq!(FieldValue::Integer(-7).render(), "-7");
        assert_eq!(FieldValue::Decimal(2.5).render(), "2.5");
        assert_eq!(FieldValue::Timestamp(ts).render(), "2024-03-01 14:30:00");
        assert_eq!(FieldValue::Boolean(true).render(), "true");
        assert_eq!(FieldValue::Null.render(), "");
    }

    #[test]
    fn null_converts_to_none_for_optional_targets() {
        assert_eq!(FieldValue::Null.into_opt_integer("n").unwrap(), None);
        assert_eq!(FieldValue::Null.into_opt_text("s").unwrap(), None);
    }

    #[test]
    fn wrong_variant_is_a_type_mismatch() {
        let error = FieldValue::Text("x".to_string())
            .into_integer("count")
            .unwrap_err();
        assert!(error.to_string().contains("count"));
        assert!(error.to_string().contains("integer"));
    }

    #[test]
    fn descriptor_serializes() {
        let descriptor = FieldDescriptor::new("passenger_count", SemanticType::Integer);
        let json = serde_json::to_string(&descriptor).expect("serialize descriptor");
        let round: FieldDescriptor = serde_json::from_str(&json).expect("deserialize descriptor");
        assert_eq!(round, descriptor);
    }
}
