use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("open database {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    #[error("bulk insert into {table}: {source}")]
    BulkInsert {
        table: String,
        source: rusqlite::Error,
    },
    #[error("append duplicates to {}: {source}", path.display())]
    Audit {
        path: PathBuf,
        source: std::io::Error,
    },
}
