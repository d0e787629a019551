//! Append-mode audit trail for deduplicated records.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use rowpipe_model::{CsvRow, Entity, fields_of};

use crate::SinkError;

/// Append duplicates to a delimited audit file.
///
/// Every call writes a header line of field names (catalog order) followed
/// by one CSV line per duplicate. The file is opened in append mode, so
/// repeated runs accumulate a growing trail with a repeated header per run.
/// That is intentional: the trail records each run's removals, not a
/// deduplicated union.
pub fn write_duplicates<T: Entity + CsvRow>(path: &Path, duplicates: &[T]) -> Result<(), SinkError> {
    let audit_error = |source| SinkError::Audit {
        path: path.to_path_buf(),
        source,
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(audit_error)?;
    let mut writer = BufWriter::new(file);
    let header = fields_of::<T>()
        .iter()
        .map(|descriptor| descriptor.name.as_str())
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{header}").map_err(audit_error)?;
    for duplicate in duplicates {
        writeln!(writer, "{}", duplicate.to_csv_row()).map_err(audit_error)?;
    }
    writer.flush().map_err(audit_error)?;
    debug!(path = %path.display(), duplicates = duplicates.len(), "audit trail appended");
    Ok(())
}
