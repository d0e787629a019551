//! CSV extraction into a typed record set.

use std::path::Path;

use tracing::warn;

use rowpipe_model::{Entity, RecordSet, fields_of};

use crate::coerce::coerce_value;
use crate::error::IngestError;

/// Parse a header-bearing delimited file into a `RecordSet<T>`.
///
/// Header names bind to entity fields case-insensitively. A row that fails
/// coercion is logged with its line number and skipped; the surviving
/// records keep source row order. An entirely empty source yields an empty
/// set rather than an error, so a pipeline over it degrades to a no-op.
pub fn extract_csv<T: Entity>(path: &Path) -> Result<RecordSet<T>, IngestError> {
    let read_error = |source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(read_error)?;
    let headers = reader.headers().map_err(read_error)?.clone();
    if headers.iter().all(|header| header.trim().is_empty()) {
        warn!(path = %path.display(), "source has no header row; extracted nothing");
        return Ok(RecordSet::new());
    }

    let fields = fields_of::<T>();
    let mut bindings = Vec::with_capacity(fields.len());
    for descriptor in fields {
        let column = headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(&descriptor.name))
            .ok_or_else(|| IngestError::MissingColumn {
                path: path.to_path_buf(),
                column: descriptor.name.clone(),
            })?;
        bindings.push(column);
    }

    let mut records = RecordSet::new();
    for (index, result) in reader.records().enumerate() {
        // Header occupies line 1 of the source.
        let line = index + 2;
        let record = match result {
            Ok(record) => record,
            Err(error) => {
                warn!(line, %error, "skipping unreadable row");
                continue;
            }
        };
        let mut values = Vec::with_capacity(fields.len());
        let mut row_failed = false;
        for (descriptor, &column) in fields.iter().zip(&bindings) {
            let raw = record.get(column).unwrap_or("");
            match coerce_value(raw, descriptor) {
                Ok(value) => values.push(value),
                Err(error) => {
                    warn!(line, field = %descriptor.name, %error, "skipping row");
                    row_failed = true;
                    break;
                }
            }
        }
        if row_failed {
            continue;
        }
        match T::from_values(values) {
            Ok(entity) => records.push(entity),
            Err(error) => warn!(line, %error, "skipping row"),
        }
    }
    Ok(records)
}
