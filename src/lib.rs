#![allow(clippy::module_inception)]

pub mod account;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod ftp;
pub mod logview;
pub mod report;
pub mod sys;
pub mod tailscale;
pub mod term;

pub use crate::error::OpskitError;
pub type Result<T, E = crate::error::OpskitError> = std::result::Result<T, E>;

pub use account::{Username, UsernameError};

pub(crate) mod common {
    pub(crate) type Result<T, E = crate::error::internal::Error> = std::result::Result<T, E>;

    pub(crate) type Error = crate::error::internal::Error;
    pub(crate) type ErrorKind = crate::error::internal::ErrorKind;

    pub use crate::error::OpskitError;

    pub(crate) type Time = chrono::DateTime<chrono::Local>;

    pub use tracing::{debug, error, info, trace, warn};
}
