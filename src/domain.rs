//! Domain models for organisation charts.
//!
//! This module contains the core domain types: validated employee records,
//! the staff hierarchy built from them, and the analysis configuration.

/// Validated employee identifiers.
pub mod employee_id;
pub use employee_id::{EmployeeId, InvalidIdError};

/// Flat employee records, as read from the input.
pub mod record;
pub use record::{FlatRecord, RecordError};

mod staff;
pub use staff::StaffNode;

/// The staff hierarchy and its construction-time validation.
pub mod hierarchy;
pub use hierarchy::{BuildError, Hierarchy};

mod config;
pub use config::{Config, LoadMode};
