//! Analyses over a built [`Hierarchy`](crate::Hierarchy).
//!
//! Both analyzers borrow the hierarchy immutably. The only state they touch
//! is the write-once reporting-line cache on each node, so a hierarchy can be
//! analysed from several threads at once.

use thiserror::Error;

use crate::domain::EmployeeId;

mod report;
mod reporting_line;
mod salary;

pub use report::Report;
pub use reporting_line::{ReportingLine, ReportingLines};
pub use salary::{
    SalaryBand, SalaryDeviation, average_subordinate_salary, strict_average_subordinate_salary,
};

/// Errors raised by an analysis.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// No employee has the requested id.
    #[error("unknown employee {0}")]
    UnknownEmployee(String),
    /// A manager chain did not reach the root within the number of employees.
    #[error("reporting line of employee {0} does not reach the root")]
    CyclicHierarchy(EmployeeId),
    /// A manager-only operation was asked about an individual contributor.
    #[error("employee {0} is not a manager")]
    NotAManager(EmployeeId),
    /// Salary arithmetic for a manager's team left the representable range.
    #[error("salary arithmetic for manager {0} overflowed")]
    SalaryOverflow(EmployeeId),
}
