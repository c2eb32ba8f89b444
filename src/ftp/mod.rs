//! vsftpd administration: account management, diagnostics and log viewing.

pub mod debug;
pub mod logs;
pub mod users;

pub use debug::FtpDebugger;
pub use logs::FtpLogViewer;
pub use users::UserManager;
