#![forbid(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NwfError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid nwf: {0}")]
    Format(String),

    #[error("truncated archive: {0}")]
    Truncated(String),

    #[error("invalid schema: {0}")]
    Schema(String),

    #[error("schema wants \"{path}\" but it is not at {}", .resolved.display())]
    MissingSource { path: String, resolved: PathBuf },

    #[error("entry {path} is {size} bytes, over the sanity limit of {limit} bytes")]
    SizeSanity { path: String, size: i32, limit: u64 },

    #[error("path is outside base dir: {0:?}")]
    Outside(String),

    #[error("layout does not fit 32-bit offsets at {0}")]
    Overflow(String),

    #[error("entry #{index} ({path}): {source}")]
    Entry {
        index: usize,
        path: String,
        #[source]
        source: Box<NwfError>,
    },
}

impl NwfError {
    /// Innermost error, past any per-entry context.
    pub fn root(&self) -> &NwfError {
        match self {
            NwfError::Entry { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn in_entry(self, index: usize, path: &str) -> NwfError {
        NwfError::Entry {
            index,
            path: path.to_string(),
            source: Box::new(self),
        }
    }
}

pub type NwfResult<T> = Result<T, NwfError>;
