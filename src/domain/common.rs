use serde::{Deserialize, Serialize};

use crate::errors::{BillingError, Result};

/// Row-level consistency checks run on every record after it is loaded.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// A `;`-delimited multi-line postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.split(';').map(|line| line.trim().to_string()).collect()
    }

    pub fn one_line(&self) -> String {
        self.lines().join(", ")
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Parses a case-insensitive `TRUE`/`FALSE` flag.
pub fn parse_flag(text: &str) -> Result<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(BillingError::MalformedBool(text.to_string())),
    }
}

pub(crate) fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(BillingError::InvalidInput(format!("empty {what}")))
    } else {
        Ok(())
    }
}
