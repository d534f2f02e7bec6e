//! One person's place in the hierarchy.

use std::sync::OnceLock;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::domain::{EmployeeId, FlatRecord};

/// One person in a [`Hierarchy`](crate::Hierarchy).
///
/// Managers and individual contributors share this single type. Whether a
/// node is a manager is derived from its subordinate list, not stored.
///
/// The manager is held as an identifier, not a reference: resolving it is a
/// lookup in the owning hierarchy.
#[derive(Debug, Clone)]
pub struct StaffNode {
    record: FlatRecord,
    subordinates: Vec<EmployeeId>,
    /// Number of manager hops to the root, filled in on first use.
    reporting_line: OnceLock<usize>,
}

impl StaffNode {
    pub(crate) const fn new(record: FlatRecord) -> Self {
        Self {
            record,
            subordinates: Vec::new(),
            reporting_line: OnceLock::new(),
        }
    }

    pub(crate) fn push_subordinate(&mut self, id: EmployeeId) {
        self.subordinates.push(id);
    }

    /// The employee's identifier.
    #[must_use]
    pub const fn id(&self) -> &EmployeeId {
        self.record.id()
    }

    /// The employee's first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.record.first_name()
    }

    /// The employee's last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.record.last_name()
    }

    /// First and last name, separated by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name(), self.last_name())
    }

    /// The employee's salary.
    #[must_use]
    pub const fn salary(&self) -> Decimal {
        self.record.salary()
    }

    /// The identifier of this employee's manager, or `None` for the root.
    #[must_use]
    pub const fn manager_id(&self) -> Option<&EmployeeId> {
        self.record.manager_id()
    }

    /// Identifiers of the direct reports, in input order.
    #[must_use]
    pub fn subordinates(&self) -> &[EmployeeId] {
        &self.subordinates
    }

    /// Returns `true` if at least one employee reports directly to this one.
    #[must_use]
    pub fn is_manager(&self) -> bool {
        !self.subordinates.is_empty()
    }

    /// Returns `true` if this employee has no manager.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.record.is_root()
    }

    /// The reporting-line length, if it has already been computed.
    ///
    /// See [`ReportingLines`](crate::ReportingLines) for computing it.
    #[must_use]
    pub fn reporting_line_length(&self) -> Option<usize> {
        self.reporting_line.get().copied()
    }

    /// Caches the reporting-line length. The first value stored wins.
    pub(crate) fn cache_reporting_line_length(&self, depth: usize) {
        let _ = self.reporting_line.set(depth);
    }

    /// The flat record this node was built from.
    #[must_use]
    pub const fn record(&self) -> &FlatRecord {
        &self.record
    }
}

impl PartialEq for StaffNode {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record && self.subordinates == other.subordinates
    }
}

impl Eq for StaffNode {}

impl Serialize for StaffNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("StaffNode", 5)?;
        state.serialize_field("id", self.id())?;
        state.serialize_field("first_name", self.first_name())?;
        state.serialize_field("last_name", self.last_name())?;
        state.serialize_field("salary", &self.salary())?;
        state.serialize_field("manager_id", &self.manager_id())?;
        state.end()
    }
}
