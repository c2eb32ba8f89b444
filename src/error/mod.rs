pub mod internal;

use std::fmt;
use std::path::PathBuf;

// Errors that end a program run. Everything that can be classified as a
// warning or an issue never reaches this type.
#[derive(Debug)]
pub enum OpskitError {
    ConfigNotFound { path: PathBuf },
    InvalidConfig { path: PathBuf, source: serde_json::Error },
    NotRoot,
    Internal(internal::Error),
}

impl fmt::Display for OpskitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OpskitError::ConfigNotFound { path } => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            OpskitError::InvalidConfig { path, source } => {
                write!(
                    f,
                    "Invalid JSON in configuration file {}: {}",
                    path.display(),
                    source
                )
            }
            OpskitError::NotRoot => write!(f, "This program must be run as root"),
            OpskitError::Internal(err) => err.fmt(f),
        }
    }
}

impl From<internal::Error> for OpskitError {
    fn from(err: internal::Error) -> Self {
        OpskitError::Internal(err)
    }
}

impl From<std::io::Error> for OpskitError {
    fn from(err: std::io::Error) -> Self {
        OpskitError::Internal(err.into())
    }
}

impl std::error::Error for OpskitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OpskitError::InvalidConfig { source, .. } => Some(source),
            OpskitError::Internal(err) => Some(err),
            _ => None,
        }
    }
}
