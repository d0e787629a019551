//! Coercion of raw source text into typed field values.

use chrono::NaiveDateTime;

use rowpipe_model::{FieldDescriptor, FieldValue, SemanticType};

use crate::error::CoerceError;

/// Timestamp layouts accepted from source files, tried in order.
const TIMESTAMP_LAYOUTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Coerce one source cell to the descriptor's semantic type.
///
/// An empty cell is `Null` for every type. Text keeps the raw cell
/// untouched (the trim pass owns whitespace cleanup); the other types parse
/// on the trimmed text.
pub fn coerce_value(raw: &str, descriptor: &FieldDescriptor) -> Result<FieldValue, CoerceError> {
    if raw.is_empty() {
        return Ok(FieldValue::Null);
    }
    let unparsable = || CoerceError::Unparsable {
        value: raw.to_string(),
        semantic_type: descriptor.semantic_type,
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() && descriptor.semantic_type != SemanticType::Text {
        return Ok(FieldValue::Null);
    }
    match descriptor.semantic_type {
        SemanticType::Text => Ok(FieldValue::Text(raw.to_string())),
        SemanticType::Integer => trimmed
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| unparsable()),
        SemanticType::Decimal => trimmed
            .parse::<f64>()
            .map(FieldValue::Decimal)
            .map_err(|_| unparsable()),
        SemanticType::Timestamp => parse_timestamp(trimmed)
            .map(FieldValue::Timestamp)
            .ok_or_else(unparsable),
        SemanticType::Boolean => parse_boolean(trimmed)
            .map(FieldValue::Boolean)
            .ok_or_else(unparsable),
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(value, layout).ok())
}

fn parse_boolean(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "y" | "yes" => Some(true),
        "0" | "false" | "f" | "n" | "no" => Some(false),
        _ => None,
    }
}
