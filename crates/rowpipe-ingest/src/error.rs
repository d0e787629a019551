use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("read csv {}: {source}", path.display())]
    Read { path: PathBuf, source: csv::Error },
    #[error("source {} is missing column {column}", path.display())]
    MissingColumn { path: PathBuf, column: String },
}

#[derive(Debug, Error)]
pub enum CoerceError {
    #[error("cannot parse {value:?} as {semantic_type}")]
    Unparsable {
        value: String,
        semantic_type: rowpipe_model::SemanticType,
    },
}
