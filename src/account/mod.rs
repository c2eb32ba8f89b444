//! Local account primitives shared by the ftp user manager and debugger.

mod allowlist;
pub use allowlist::AllowList;

mod credentials;
pub use credentials::{CredentialLog, CredentialRecord};

mod passwd;
pub use passwd::{user_exists, PasswdEntry};

mod password;
pub use password::{PasswordGenerator, PolicyError};

mod username;
pub use username::{Username, UsernameError, RESERVED_USERNAMES};
