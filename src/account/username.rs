use std::fmt;
use std::ops::Deref;

pub const MIN_USERNAME_CHARS: usize = 3;
pub const MAX_USERNAME_CHARS: usize = 32;

pub const RESERVED_USERNAMES: &[&str] = &["root", "admin", "administrator", "ftp", "test"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    Empty,
    TooShort { min: usize },
    TooLong { max: usize },
    MustStartWithLetter,
    InvalidCharacter(char),
    Reserved(String),
}

impl fmt::Display for UsernameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UsernameError::Empty => write!(f, "Username cannot be empty"),
            UsernameError::TooShort { min } => {
                write!(f, "Username must be at least {} characters", min)
            }
            UsernameError::TooLong { max } => {
                write!(f, "Username must be {} characters or less", max)
            }
            UsernameError::MustStartWithLetter => write!(f, "Username must start with a letter"),
            UsernameError::InvalidCharacter(_) => write!(
                f,
                "Username can only contain letters, numbers, hyphens, and underscores"
            ),
            UsernameError::Reserved(_) => write!(f, "Username is reserved"),
        }
    }
}

impl std::error::Error for UsernameError {}

// Username that is safe to hand to useradd and to write into the allow-list.
// Only ASCII is accepted since the name ends up in /etc/passwd.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(s: impl Into<String>) -> Result<Self, UsernameError> {
        let s = s.into();
        let len = s.chars().count();

        let first = s.chars().next().ok_or(UsernameError::Empty)?;
        if len < MIN_USERNAME_CHARS {
            return Err(UsernameError::TooShort {
                min: MIN_USERNAME_CHARS,
            });
        }
        if len > MAX_USERNAME_CHARS {
            return Err(UsernameError::TooLong {
                max: MAX_USERNAME_CHARS,
            });
        }
        if !first.is_ascii_alphabetic() {
            return Err(UsernameError::MustStartWithLetter);
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(UsernameError::InvalidCharacter(c));
        }
        if RESERVED_USERNAMES.contains(&s.as_str()) {
            return Err(UsernameError::Reserved(s));
        }

        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for Username {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Username::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_names() {
        for name in ["abc", "alice", "ftp_user-01", "A23456789012345678901234567890XY"] {
            assert!(Username::new(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn length_bounds() {
        assert_eq!(Username::new(""), Err(UsernameError::Empty));
        assert_eq!(
            Username::new("ab"),
            Err(UsernameError::TooShort { min: 3 })
        );
        assert_eq!(
            Username::new("a".repeat(33)),
            Err(UsernameError::TooLong { max: 32 })
        );
    }

    #[test]
    fn must_start_with_letter() {
        assert_eq!(
            Username::new("1alice"),
            Err(UsernameError::MustStartWithLetter)
        );
        assert_eq!(
            Username::new("_alice"),
            Err(UsernameError::MustStartWithLetter)
        );
    }

    #[test]
    fn rejects_other_characters() {
        assert_eq!(
            Username::new("ali ce"),
            Err(UsernameError::InvalidCharacter(' '))
        );
        assert_eq!(
            Username::new("alice:x"),
            Err(UsernameError::InvalidCharacter(':'))
        );
        assert!(matches!(
            Username::new("aliçe"),
            Err(UsernameError::InvalidCharacter('ç'))
        ));
    }

    #[test]
    fn rejects_reserved() {
        for name in RESERVED_USERNAMES {
            assert!(matches!(
                Username::new(*name),
                Err(UsernameError::Reserved(_))
            ));
        }
        // reserved check is exact, not case-folded.
        assert!(Username::new("Admin").is_ok());
    }
}
