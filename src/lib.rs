//! Organisation chart analysis
//!
//! A flat employee record set (id, name, salary, manager id) is parsed into a
//! validated [`Hierarchy`], which is then analysed for over-long reporting
//! lines and for managers paid outside the expected band relative to their
//! direct reports.

pub mod domain;
pub use domain::{
    BuildError, Config, EmployeeId, FlatRecord, Hierarchy, LoadMode, RecordError, StaffNode,
};

/// Reporting-line and salary analyses over a built hierarchy.
pub mod analysis;
pub use analysis::{AnalysisError, Report, ReportingLine, ReportingLines, SalaryBand, SalaryDeviation};

/// Reading employee records from delimited text.
pub mod storage;
pub use storage::{load, LoadError};
