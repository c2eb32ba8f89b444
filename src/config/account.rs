use std::path::{Path, PathBuf};

use serde::Deserialize;

// Character-class settings for generated passwords.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct PasswordPolicy {
    length: Option<usize>,
    include_uppercase: Option<bool>,
    include_lowercase: Option<bool>,
    include_digits: Option<bool>,
    include_special: Option<bool>,
    special_chars: Option<String>,
    // Drop characters that are easy to misread (l, o, I, O, 0, 1).
    exclude_ambiguous: Option<bool>,
    min_uppercase: Option<usize>,
    min_lowercase: Option<usize>,
    min_digits: Option<usize>,
    min_special: Option<usize>,
}

impl PasswordPolicy {
    const DEFAULT_LENGTH: usize = 16;
    const DEFAULT_SPECIAL_CHARS: &'static str = "!@#$%^&*-_=+";
    const DEFAULT_CLASS_MINIMUM: usize = 2;

    pub fn length(&self) -> usize {
        self.length.unwrap_or(PasswordPolicy::DEFAULT_LENGTH)
    }
    pub fn include_uppercase(&self) -> bool {
        self.include_uppercase.unwrap_or(true)
    }
    pub fn include_lowercase(&self) -> bool {
        self.include_lowercase.unwrap_or(true)
    }
    pub fn include_digits(&self) -> bool {
        self.include_digits.unwrap_or(true)
    }
    pub fn include_special(&self) -> bool {
        self.include_special.unwrap_or(true)
    }
    pub fn special_chars(&self) -> &str {
        self.special_chars
            .as_deref()
            .unwrap_or(PasswordPolicy::DEFAULT_SPECIAL_CHARS)
    }
    pub fn exclude_ambiguous(&self) -> bool {
        self.exclude_ambiguous.unwrap_or(true)
    }
    pub fn min_uppercase(&self) -> usize {
        self.min_uppercase
            .unwrap_or(PasswordPolicy::DEFAULT_CLASS_MINIMUM)
    }
    pub fn min_lowercase(&self) -> usize {
        self.min_lowercase
            .unwrap_or(PasswordPolicy::DEFAULT_CLASS_MINIMUM)
    }
    pub fn min_digits(&self) -> usize {
        self.min_digits.unwrap_or(PasswordPolicy::DEFAULT_CLASS_MINIMUM)
    }
    pub fn min_special(&self) -> usize {
        self.min_special
            .unwrap_or(PasswordPolicy::DEFAULT_CLASS_MINIMUM)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct UserDefaults {
    remove_home_on_delete: Option<bool>,
    // Writable directory created inside each chroot home.
    files_dir: Option<String>,
}

impl UserDefaults {
    const DEFAULT_FILES_DIR: &'static str = "files";

    pub fn remove_home_on_delete(&self) -> bool {
        self.remove_home_on_delete.unwrap_or(true)
    }
    pub fn files_dir(&self) -> &str {
        self.files_dir
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(UserDefaults::DEFAULT_FILES_DIR)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    enabled: Option<bool>,
    credentials_file: Option<PathBuf>,
}

impl LoggingConfig {
    const DEFAULT_CREDENTIALS_FILE: &'static str = "/root/.ftp_credentials.csv";

    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
    pub fn credentials_file(&self) -> &Path {
        self.credentials_file
            .as_deref()
            .unwrap_or_else(|| Path::new(LoggingConfig::DEFAULT_CREDENTIALS_FILE))
    }
}
