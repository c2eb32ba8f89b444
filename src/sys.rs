//! Thin wrappers over the few libc calls the tools need.

use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;

use crate::common::debug;

pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

/// Permission bits as printed by `stat -c %a`, e.g. `755`.
pub fn mode_string(meta: &Metadata) -> String {
    format!("{:o}", meta.mode() & 0o777)
}

pub fn owner_uid(meta: &Metadata) -> u32 {
    meta.uid()
}

/// Disables terminal echo on stdin until dropped. Does nothing when stdin
/// is not a terminal.
pub struct EchoGuard {
    saved: Option<libc::termios>,
}

impl EchoGuard {
    pub fn disable() -> Self {
        let fd = libc::STDIN_FILENO;
        // SAFETY: isatty only inspects the descriptor.
        if unsafe { libc::isatty(fd) } != 1 {
            return Self { saved: None };
        }

        // SAFETY: termios is plain data; tcgetattr fills it or fails.
        let mut term: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut term) } != 0 {
            debug!("tcgetattr failed, echo left on");
            return Self { saved: None };
        }
        let saved = term;
        term.c_lflag &= !libc::ECHO;
        // SAFETY: term was initialised by tcgetattr above.
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &term) } != 0 {
            debug!("tcsetattr failed, echo left on");
            return Self { saved: None };
        }

        Self { saved: Some(saved) }
    }
}

impl Drop for EchoGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            // SAFETY: restoring the attributes read in `disable`.
            unsafe {
                libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &saved);
            }
        }
    }
}
