use std::{
    borrow::Borrow,
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    str::FromStr,
};

use non_empty_string::NonEmptyString;
use serde::{Serialize, Serializer};

/// The identifier of an employee.
///
/// Identifiers are opaque, non-empty strings. Surrounding whitespace is not
/// significant and is stripped on construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EmployeeId(NonEmptyString);

impl EmployeeId {
    /// Creates a new `EmployeeId` from a string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdError` if the string is empty or only whitespace.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidIdError> {
        let s = s.into();
        let trimmed = s.trim();
        let value = if trimmed.len() == s.len() {
            s
        } else {
            trimmed.to_string()
        };

        NonEmptyString::new(value)
            .map(Self)
            .map_err(|_| InvalidIdError)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Hash for EmployeeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Borrow<str> for EmployeeId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for EmployeeId {
    type Error = InvalidIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EmployeeId {
    type Error = InvalidIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for EmployeeId {
    type Err = InvalidIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for EmployeeId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for EmployeeId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EmployeeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Error returned when an employee identifier is empty.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("employee id must not be empty")]
pub struct InvalidIdError;
