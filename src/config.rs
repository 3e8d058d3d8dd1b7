use std::{fmt, str::FromStr};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::BatchError;

/// Shape an email must have before an account is created for it.
pub const DEFAULT_EMAIL_PATTERN: &str = r#"^(([^<>()\[\]\.,;:\s@"]+(\.[^<>()\[\]\.,;:\s@"]+)*)|(".+"))@(([^<>()\[\]\.,;:\s@"]+\.)+[^<>()\[\]\.,;:\s@"]{2,})$"#;

pub const USERNAME_MAX_LENGTH: usize = 30;

/// Characters kept free at the end of a truncated username for the numeric suffix.
pub const USERNAME_SUFFIX_HEADROOM: usize = 5;

pub const USERNAME_MAX_SUFFIX: u32 = 9999;

pub const PASSWORD_LENGTH: usize = 12;

/// Tunables of the enrollment and rerun batches.
///
/// Every field has a default, so a partial document is enough:
///
/// ```
/// use bulk_enroll_rs::config::BatchConfig;
///
/// let config: BatchConfig = serde_json::from_str(r#"{ "password_length": 16 }"#).unwrap();
/// assert_eq!(config.password_length, 16);
/// assert_eq!(config.username_max_length, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub email_pattern: String,
    pub username_max_length: usize,
    pub username_suffix_headroom: usize,
    pub username_max_suffix: u32,
    pub password_length: usize,
    /// Number of rows handed to the result writer at once
    pub chunk_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            email_pattern: DEFAULT_EMAIL_PATTERN.to_string(),
            username_max_length: USERNAME_MAX_LENGTH,
            username_suffix_headroom: USERNAME_SUFFIX_HEADROOM,
            username_max_suffix: USERNAME_MAX_SUFFIX,
            password_length: PASSWORD_LENGTH,
            chunk_size: 50,
        }
    }
}

impl BatchConfig {
    pub fn email_regex(&self) -> Result<Regex, BatchError> {
        Regex::new(&self.email_pattern)
            .map_err(|error| BatchError::Configuration(format!("email_pattern: {}", error)))
    }
}

/// Kind of course participation granted by an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnrollMode {
    #[default]
    Honor,
    Audit,
}

impl EnrollMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollMode::Honor => "honor",
            EnrollMode::Audit => "audit",
        }
    }
}

impl fmt::Display for EnrollMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollMode {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "honor" => Ok(EnrollMode::Honor),
            "audit" => Ok(EnrollMode::Audit),
            other => Err(BatchError::Validation(vec![format!(
                "\"{}\" is not a valid choice.",
                other
            )])),
        }
    }
}
