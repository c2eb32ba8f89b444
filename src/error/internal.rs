use std::error;
use std::fmt;
use std::io;
use std::time::Duration;

use backtrace::Backtrace;

use crate::account::{PolicyError, UsernameError};

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    backtrace: Option<Backtrace>,
}

#[derive(Debug)]
pub enum ErrorKind {
    Io(io::Error),
    Json(serde_json::Error),
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },
    CommandTimeout {
        command: String,
        timeout: Duration,
    },
    InvalidUsername(UsernameError),
    InvalidPolicy(PolicyError),
    UserExists {
        username: String,
    },
    UserNotFound {
        username: String,
    },
    MalformedPasswd {
        line: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            ErrorKind::Io(err) => err.fmt(f),
            ErrorKind::Json(err) => err.fmt(f),
            ErrorKind::CommandFailed {
                command,
                code,
                stderr,
            } => {
                write!(f, "`{}` exited with status {}", command, code)?;
                if !stderr.trim().is_empty() {
                    write!(f, ": {}", stderr.trim())?;
                }
                Ok(())
            }
            ErrorKind::CommandTimeout { command, timeout } => {
                write!(f, "`{}` timed out after {:?}", command, timeout)
            }
            ErrorKind::InvalidUsername(err) => write!(f, "invalid username: {}", err),
            ErrorKind::InvalidPolicy(err) => write!(f, "invalid password policy: {}", err),
            ErrorKind::UserExists { username } => write!(f, "user '{}' already exists", username),
            ErrorKind::UserNotFound { username } => {
                write!(f, "user '{}' does not exist", username)
            }
            ErrorKind::MalformedPasswd { line } => write!(f, "malformed passwd entry: {}", line),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::from(ErrorKind::Io(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::from(ErrorKind::Json(err))
    }
}

impl From<UsernameError> for Error {
    fn from(err: UsernameError) -> Self {
        Error::from(ErrorKind::InvalidUsername(err))
    }
}

impl From<PolicyError> for Error {
    fn from(err: PolicyError) -> Self {
        Error::from(ErrorKind::InvalidPolicy(err))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::with_backtrace(kind)
    }
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn backtrace(&self) -> Option<&Backtrace> {
        self.backtrace.as_ref()
    }

    /// Failure came from an external command rather than from local state.
    pub fn is_command(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::CommandFailed { .. } | ErrorKind::CommandTimeout { .. }
        )
    }

    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self.kind() {
            ErrorKind::Io(err) => Some(err.kind()),
            _ => None,
        }
    }

    fn with_backtrace(kind: ErrorKind) -> Self {
        Self {
            kind,
            backtrace: Some(Backtrace::new()),
        }
    }
}

impl error::Error for Error {}
