use non_empty_string::NonEmptyString;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::EmployeeId;

/// A single employee record exactly as supplied by the input.
///
/// Records are immutable once constructed. A record without a manager is an
/// organisational root; at most one may exist in a well-formed record set,
/// but that is a property of the set and is checked when the
/// [`Hierarchy`](crate::Hierarchy) is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRecord {
    id: EmployeeId,
    first_name: NonEmptyString,
    last_name: NonEmptyString,
    salary: Decimal,
    manager_id: Option<EmployeeId>,
}

/// Errors raised while validating a single record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The record has the wrong shape, or a required field is empty.
    #[error("malformed record: {reason}")]
    MalformedRecord {
        /// What is wrong with the record.
        reason: String,
    },
    /// The salary could not be parsed, or is not strictly positive.
    #[error("invalid salary '{value}': {reason}")]
    InvalidSalary {
        /// The salary field as supplied.
        value: String,
        /// Why the salary was rejected.
        reason: &'static str,
    },
}

impl RecordError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }
}

impl FlatRecord {
    /// Constructs a validated record.
    ///
    /// An empty (or whitespace-only) `manager_id` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MalformedRecord`] if the id, first name or last
    /// name is empty, and [`RecordError::InvalidSalary`] if the salary is zero
    /// or negative.
    pub fn new(
        id: &str,
        first_name: &str,
        last_name: &str,
        salary: Decimal,
        manager_id: Option<&str>,
    ) -> Result<Self, RecordError> {
        let id = EmployeeId::new(id).map_err(|_| RecordError::malformed("id is empty"))?;
        let first_name = NonEmptyString::new(first_name.trim().to_string())
            .map_err(|_| RecordError::malformed("first name is empty"))?;
        let last_name = NonEmptyString::new(last_name.trim().to_string())
            .map_err(|_| RecordError::malformed("last name is empty"))?;

        if salary <= Decimal::ZERO {
            return Err(RecordError::InvalidSalary {
                value: salary.to_string(),
                reason: "salary must be greater than zero",
            });
        }

        let manager_id = manager_id.and_then(|m| EmployeeId::new(m).ok());

        Ok(Self {
            id,
            first_name,
            last_name,
            salary,
            manager_id,
        })
    }

    /// The employee's identifier.
    #[must_use]
    pub const fn id(&self) -> &EmployeeId {
        &self.id
    }

    /// The employee's first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// The employee's last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// The employee's salary.
    #[must_use]
    pub const fn salary(&self) -> Decimal {
        self.salary
    }

    /// The identifier of the employee's manager, or `None` for the root.
    #[must_use]
    pub const fn manager_id(&self) -> Option<&EmployeeId> {
        self.manager_id.as_ref()
    }

    /// Returns `true` if this record has no manager.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.manager_id.is_none()
    }
}
