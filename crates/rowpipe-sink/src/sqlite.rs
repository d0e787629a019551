//! Bulk load into a SQLite table.

use std::path::Path;

use rusqlite::Connection;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use tracing::{error, info};

use rowpipe_model::{Entity, FieldValue, RecordSet, fields_of};

/// Bulk-insert a record set into an existing table.
///
/// Columns follow field catalog order and nulls map to SQL NULL. The whole
/// set goes through one multi-row parameterized INSERT executed exactly
/// once: there is no retry and no partial-row recovery, so a failed call
/// leaves it to the caller to remediate and re-run. The record set itself
/// is only borrowed and stays intact either way.
///
/// The destination table must already exist with columns matching the
/// catalog names.
pub fn load<T: Entity>(
    records: &RecordSet<T>,
    database: &Path,
    table: &str,
) -> Result<usize, crate::SinkError> {
    let fields = fields_of::<T>();
    if records.is_empty() {
        info!(table, "record set is empty; nothing to load");
        return Ok(0);
    }
    let connection = Connection::open(database).map_err(|source| crate::SinkError::Open {
        path: database.to_path_buf(),
        source,
    })?;

    let columns = fields
        .iter()
        .map(|descriptor| format!("\"{}\"", descriptor.name))
        .collect::<Vec<_>>()
        .join(", ");
    let row_placeholders = format!("({})", vec!["?"; fields.len()].join(", "));
    let placeholders = vec![row_placeholders; records.len()].join(", ");
    let sql = format!("INSERT INTO \"{table}\" ({columns}) VALUES {placeholders}");

    let mut parameters: Vec<Value> = Vec::with_capacity(records.len() * fields.len());
    for record in records {
        for descriptor in fields {
            let value = record.get(&descriptor.name).unwrap_or(FieldValue::Null);
            parameters.push(sql_value(value));
        }
    }

    let inserted = connection
        .execute(&sql, params_from_iter(parameters))
        .map_err(|source| {
            error!(table, %source, "bulk insert failed");
            crate::SinkError::BulkInsert {
                table: table.to_string(),
                source,
            }
        })?;
    info!(table, rows = inserted, "bulk insert complete");
    Ok(inserted)
}

/// Map a field value onto SQLite's storage classes.
fn sql_value(value: FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => Value::Text(text),
        FieldValue::Integer(number) => Value::Integer(number),
        FieldValue::Decimal(number) => Value::Real(number),
        FieldValue::Timestamp(timestamp) => Value::Text(
            timestamp
                .format(rowpipe_model::field::TIMESTAMP_FORMAT)
                .to_string(),
        ),
        FieldValue::Boolean(flag) => Value::Integer(i64::from(flag)),
        FieldValue::Null => Value::Null,
    }
}
