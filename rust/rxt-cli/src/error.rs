use std::path::PathBuf;

use rxt_port::ValueError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid toml in '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("{0} is outside the 61-bit integer range")]
    IntegerOutOfRange(i64),
    #[error("{failed} of {total} conformance vectors failed")]
    VectorsFailed { failed: usize, total: usize },
}

impl CliError {
    /// The reader of our stdout went away (`rxt-port vectors | head -1`).
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, CliError::Output(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}
