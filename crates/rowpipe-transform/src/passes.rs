//! The individual cleaning passes.
//!
//! Each pass operates on a whole record set through the field catalog, so
//! none of them knows anything about a concrete entity type. Passes are
//! order-sensitive at the call site: the canonical pipeline runs dedup,
//! then remap, then trim.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use rowpipe_model::{Entity, FieldValue, ModelError, RecordSet, SemanticType, fields_of};

/// Split a record set into survivors and duplicates.
///
/// A single linear scan keeps the first record for each derived key and
/// classifies every later record with the same key as a duplicate.
/// Survivors keep their original relative order; duplicates come back in
/// encounter order for the audit trail.
pub fn dedup<T, F>(records: RecordSet<T>, key_fn: F) -> (RecordSet<T>, Vec<T>)
where
    T: Entity,
    F: Fn(&T) -> String,
{
    let mut seen = BTreeSet::new();
    let mut survivors = RecordSet::new();
    let mut duplicates = Vec::new();
    for record in records {
        if seen.insert(key_fn(&record)) {
            survivors.push(record);
        } else {
            duplicates.push(record);
        }
    }
    debug!(
        survivors = survivors.len(),
        duplicates = duplicates.len(),
        "dedup pass complete"
    );
    (survivors, duplicates)
}

/// Rewrite one named text field across the whole set.
///
/// A value present as a mapping key is overwritten with its mapped
/// replacement; anything else passes through untouched, including nulls.
/// Naming a field outside the catalog, or a non-text field, is a schema
/// error rather than a silent no-op.
pub fn remap<T: Entity>(
    records: &mut RecordSet<T>,
    field_name: &str,
    mapping: &BTreeMap<String, String>,
) -> Result<(), ModelError> {
    let descriptor = fields_of::<T>()
        .iter()
        .find(|descriptor| descriptor.name == field_name)
        .ok_or_else(|| ModelError::UnknownField(field_name.to_string()))?;
    if descriptor.semantic_type != SemanticType::Text {
        return Err(ModelError::TypeMismatch {
            field: field_name.to_string(),
            expected: SemanticType::Text,
            actual: descriptor.semantic_type.to_string(),
        });
    }
    let mut rewritten = 0usize;
    for record in records.iter_mut() {
        let Some(FieldValue::Text(current)) = record.get(field_name) else {
            continue;
        };
        if let Some(replacement) = mapping.get(&current) {
            record.set(field_name, FieldValue::Text(replacement.clone()))?;
            rewritten += 1;
        }
    }
    debug!(field = field_name, rewritten, "remap pass complete");
    Ok(())
}

/// Strip leading/trailing whitespace from every non-empty text field.
///
/// Null and already-clean values are left alone, which makes the pass
/// idempotent.
pub fn trim_text_fields<T: Entity>(records: &mut RecordSet<T>) -> Result<(), ModelError> {
    let text_fields: Vec<&str> = fields_of::<T>()
        .iter()
        .filter(|descriptor| descriptor.semantic_type == SemanticType::Text)
        .map(|descriptor| descriptor.name.as_str())
        .collect();
    for record in records.iter_mut() {
        for field in &text_fields {
            let Some(FieldValue::Text(value)) = record.get(field) else {
                continue;
            };
            let trimmed = value.trim();
            if trimmed.len() != value.len() {
                record.set(field, FieldValue::Text(trimmed.to_string()))?;
            }
        }
    }
    Ok(())
}
