use std::fmt;

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::PasswordPolicy;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const AMBIGUOUS: &str = "loIO01";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    NoCharacterClass,
    EmptySpecialSet,
    MinimumsExceedLength { required: usize, length: usize },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PolicyError::NoCharacterClass => write!(f, "no character class enabled"),
            PolicyError::EmptySpecialSet => {
                write!(f, "special characters enabled but special_chars is empty")
            }
            PolicyError::MinimumsExceedLength { required, length } => write!(
                f,
                "class minimums require {} characters but length is {}",
                required, length
            ),
        }
    }
}

impl std::error::Error for PolicyError {}

#[derive(Debug, Clone)]
struct Class {
    chars: Vec<char>,
    min: usize,
}

/// Password generator for a validated [`PasswordPolicy`].
#[derive(Debug, Clone)]
pub struct PasswordGenerator {
    classes: Vec<Class>,
    pool: Vec<char>,
    length: usize,
}

impl PasswordGenerator {
    pub fn new(policy: &PasswordPolicy) -> Result<Self, PolicyError> {
        let strip = |set: &str| -> Vec<char> {
            set.chars()
                .filter(|c| !(policy.exclude_ambiguous() && AMBIGUOUS.contains(*c)))
                .collect()
        };

        let mut classes = Vec::new();
        if policy.include_lowercase() {
            classes.push(Class {
                chars: strip(LOWERCASE),
                min: policy.min_lowercase(),
            });
        }
        if policy.include_uppercase() {
            classes.push(Class {
                chars: strip(UPPERCASE),
                min: policy.min_uppercase(),
            });
        }
        if policy.include_digits() {
            classes.push(Class {
                chars: strip(DIGITS),
                min: policy.min_digits(),
            });
        }
        if policy.include_special() {
            // the special set is taken as configured.
            let chars: Vec<char> = policy.special_chars().chars().collect();
            if chars.is_empty() {
                return Err(PolicyError::EmptySpecialSet);
            }
            classes.push(Class {
                chars,
                min: policy.min_special(),
            });
        }

        if classes.is_empty() {
            return Err(PolicyError::NoCharacterClass);
        }

        let required: usize = classes.iter().map(|c| c.min).sum();
        if required > policy.length() {
            return Err(PolicyError::MinimumsExceedLength {
                required,
                length: policy.length(),
            });
        }

        let pool = classes.iter().flat_map(|c| c.chars.iter().copied()).collect();

        Ok(Self {
            classes,
            pool,
            length: policy.length(),
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Generate from the operating system's CSPRNG.
    pub fn generate(&self) -> String {
        self.generate_with(&mut OsRng)
    }

    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut chars = Vec::with_capacity(self.length);

        for class in &self.classes {
            for _ in 0..class.min {
                if let Some(c) = class.chars.choose(rng) {
                    chars.push(*c);
                }
            }
        }

        while chars.len() < self.length {
            match self.pool.choose(rng) {
                Some(c) => chars.push(*c),
                None => break,
            }
        }

        chars.shuffle(rng);
        chars.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::config::Config;

    fn policy(json: &str) -> PasswordPolicy {
        Config::from_json(&format!(r#"{{"password_policy": {json}}}"#))
            .unwrap()
            .password_policy
    }

    fn count(s: &str, set: &str) -> usize {
        s.chars().filter(|c| set.contains(*c)).count()
    }

    #[test]
    fn default_policy_meets_minimums() {
        let generator = PasswordGenerator::new(&PasswordPolicy::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let password = generator.generate_with(&mut rng);
            assert_eq!(password.chars().count(), 16);
            assert!(count(&password, LOWERCASE) >= 2);
            assert!(count(&password, UPPERCASE) >= 2);
            assert!(count(&password, DIGITS) >= 2);
            assert!(count(&password, "!@#$%^&*-_=+") >= 2);
            assert_eq!(count(&password, AMBIGUOUS), 0);
        }
    }

    #[test]
    fn custom_minimums_and_length() {
        let generator = PasswordGenerator::new(&policy(
            r##"{"length": 8, "min_digits": 5, "min_uppercase": 0, "min_lowercase": 0, "min_special": 3, "special_chars": "#"}"##,
        ))
        .unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let password = generator.generate_with(&mut rng);
            assert_eq!(password.len(), 8);
            assert!(count(&password, DIGITS) >= 5);
            assert!(count(&password, "#") >= 3);
        }
    }

    #[test]
    fn disabled_classes_never_appear() {
        let generator = PasswordGenerator::new(&policy(
            r#"{"include_uppercase": false, "include_special": false, "length": 20}"#,
        ))
        .unwrap();
        let password = generator.generate();

        assert_eq!(password.len(), 20);
        assert_eq!(count(&password, UPPERCASE), 0);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn ambiguous_characters_allowed_when_configured() {
        let generator = PasswordGenerator::new(&policy(r#"{"exclude_ambiguous": false}"#)).unwrap();
        assert!(generator.pool.contains(&'0'));
        assert!(generator.pool.contains(&'l'));
    }

    #[test]
    fn rejects_unsatisfiable_policies() {
        assert_eq!(
            PasswordGenerator::new(&policy(r#"{"length": 6}"#)).unwrap_err(),
            PolicyError::MinimumsExceedLength {
                required: 8,
                length: 6
            }
        );
        assert_eq!(
            PasswordGenerator::new(&policy(
                r#"{"include_uppercase": false, "include_lowercase": false, "include_digits": false, "include_special": false}"#
            ))
            .unwrap_err(),
            PolicyError::NoCharacterClass
        );
        assert_eq!(
            PasswordGenerator::new(&policy(r#"{"special_chars": ""}"#)).unwrap_err(),
            PolicyError::EmptySpecialSet
        );
    }
}
