use std::{io, path::PathBuf, result::Result as StdResult};

use thiserror::Error;

pub type Result<T> = StdResult<T, Error>;

/// An enum for describing and handling the errors encountered while building
/// or writing a changelog.
#[derive(Debug, Error)]
pub enum Error {
    #[error("--prepend requires --output")]
    PrependWithoutOutput,

    #[error("no tags or commits found")]
    NoHistory,

    #[error("failed to read config file {0}: {1}")]
    ConfigRead(PathBuf, #[source] io::Error),

    #[error("failed to parse config file {0}: {1}")]
    ConfigParse(PathBuf, #[source] toml::de::Error),

    #[error("fatal I/O error with output file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to format today's date")]
    TimeFormat(#[from] time::error::Format),
}
