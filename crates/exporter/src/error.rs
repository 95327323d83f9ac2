use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write export to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode export row: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush export: {0}")]
    Write(#[from] std::io::Error),
}
