use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    analysis::AnalysisError,
    domain::{Hierarchy, StaffNode},
};

/// Reporting-line analysis.
///
/// The depth of an employee is the number of manager hops from them up to
/// the root: the root has depth 0 and its direct reports depth 1.
#[derive(Debug, Clone, Copy)]
pub struct ReportingLines<'a> {
    hierarchy: &'a Hierarchy,
}

/// An employee whose reporting line is longer than the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportingLine<'a> {
    /// The employee.
    pub employee: &'a StaffNode,
    /// Manager hops between the employee and the root.
    pub depth: usize,
}

impl<'a> ReportingLines<'a> {
    /// Creates an analyzer over `hierarchy`.
    #[must_use]
    pub const fn new(hierarchy: &'a Hierarchy) -> Self {
        Self { hierarchy }
    }

    /// Returns the depth of the employee with the given id.
    ///
    /// The result is cached on every node visited along the way, so repeated
    /// calls and calls for colleagues further down the same line are cheap.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnknownEmployee`] if no employee has this id
    /// or a manager on the way up is missing, and
    /// [`AnalysisError::CyclicHierarchy`] if the manager chain does not reach
    /// the root.
    pub fn depth_of(&self, id: &str) -> Result<usize, AnalysisError> {
        let node = self
            .hierarchy
            .get(id)
            .ok_or_else(|| AnalysisError::UnknownEmployee(id.to_string()))?;
        self.depth(node)
    }

    /// Returns every employee deeper than `threshold`, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::CyclicHierarchy`] if any manager chain does
    /// not reach the root.
    #[instrument(level = "debug", skip(self))]
    pub fn employees_beyond_threshold(
        &self,
        threshold: usize,
    ) -> Result<Vec<ReportingLine<'a>>, AnalysisError> {
        let mut lines = Vec::new();
        for employee in self.hierarchy.iter() {
            let depth = self.depth(employee)?;
            if depth > threshold {
                lines.push(ReportingLine { employee, depth });
            }
        }
        debug!(found = lines.len(), "long reporting lines");
        Ok(lines)
    }

    /// Walks up from `node` until the root or a node with a cached depth, then
    /// fills in the cache for every node on the way.
    fn depth(&self, node: &'a StaffNode) -> Result<usize, AnalysisError> {
        if let Some(depth) = node.reporting_line_length() {
            return Ok(depth);
        }

        // A valid chain visits each employee at most once.
        let limit = self.hierarchy.len();
        let mut path = vec![node];
        let mut current = node;

        let base = loop {
            let Some(manager_id) = current.manager_id() else {
                // `current` is the root and sits at depth 0.
                path.pop();
                current.cache_reporting_line_length(0);
                break 0;
            };

            // Built hierarchies resolve every link; only an unchecked one can miss.
            let manager = self
                .hierarchy
                .get(manager_id)
                .ok_or_else(|| AnalysisError::UnknownEmployee(manager_id.to_string()))?;

            if let Some(depth) = manager.reporting_line_length() {
                break depth;
            }

            if path.len() >= limit {
                return Err(AnalysisError::CyclicHierarchy(node.id().clone()));
            }
            path.push(manager);
            current = manager;
        };

        // `path` runs from `node` upwards; the last entry is one below `base`.
        let mut depth = base;
        for step in path.iter().rev() {
            depth += 1;
            step.cache_reporting_line_length(depth);
        }

        Ok(node.reporting_line_length().unwrap_or(base))
    }
}
