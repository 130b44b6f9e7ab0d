//! Typed identifier for employees as named by the system of record.
//!
//! Frappe document names are free-form strings (`HR-EMP-00042`), so the
//! wrapper validates shape rather than wrapping a UUID.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

/// Maximum length of a Frappe document name.
const MAX_NAME_LEN: usize = 140;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("employee id must not be empty")]
    Empty,
    #[error("employee id exceeds {MAX_NAME_LEN} characters")]
    TooLong,
    #[error("employee id contains control characters")]
    InvalidCharacters,
}

/// Employee document name in the system of record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ToSchema)]
#[schema(value_type = String, example = "HR-EMP-00042")]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }
        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(IdError::TooLong);
        }
        if trimmed.chars().any(char::is_control) {
            return Err(IdError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for EmployeeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EmployeeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
