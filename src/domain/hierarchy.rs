//! The in-memory staff hierarchy.
//!
//! The [`Hierarchy`] knows nothing about where its records came from. It is
//! built once from a complete set of [`FlatRecord`]s, validated as a single
//! rooted tree, and is read-only afterwards.

use std::collections::{HashMap, hash_map::Entry};

use nonempty::NonEmpty;
use petgraph::{
    algo::{is_cyclic_directed, tarjan_scc},
    graphmap::DiGraphMap,
};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{EmployeeId, FlatRecord, StaffNode};

/// An organisation chart.
///
/// Nodes are stored in input order, which is the order every analysis
/// reports in:
/// - Nodes: `Vec<StaffNode>`
/// - Id lookup: `HashMap<EmployeeId, usize>` (index into `nodes`)
/// - Root: index of the only node without a manager
///
/// A hierarchy produced by [`Hierarchy::build`] always has exactly one root
/// and no cycles. The empty [`Hierarchy::default`] has no root at all; it is
/// only produced by a lenient load of a missing input.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Hierarchy {
    nodes: Vec<StaffNode>,
    index: HashMap<EmployeeId, usize>,
    root: Option<usize>,
}

/// Errors that can occur when building a hierarchy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// The same employee id appears on more than one record.
    #[error("duplicate employee id {0}")]
    DuplicateId(EmployeeId),
    /// No record is without a manager.
    #[error("no employee without a manager; the organisation has no root")]
    MissingRoot,
    /// More than one record is without a manager.
    #[error("more than one employee without a manager: {}", join_ids(.roots))]
    MultipleRoots {
        /// Every employee without a manager, in input order.
        roots: Vec<EmployeeId>,
    },
    /// A manager id does not match any employee.
    #[error("employee {employee} reports to unknown manager {manager}")]
    DanglingManagerReference {
        /// The employee whose manager is missing.
        employee: EmployeeId,
        /// The manager id that could not be resolved.
        manager: EmployeeId,
    },
    /// Following manager links from some employee never reaches the root.
    #[error("reporting cycle between employees {}", join_ids(.members.iter()))]
    CyclicHierarchy {
        /// The employees forming the cycle, in input order.
        members: NonEmpty<EmployeeId>,
    },
}

fn join_ids<'a>(ids: impl IntoIterator<Item = &'a EmployeeId>) -> String {
    ids.into_iter()
        .map(EmployeeId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Hierarchy {
    /// Builds a hierarchy from a complete set of records.
    ///
    /// Validation stops at the first failure, checked in this order:
    /// duplicate ids, multiple roots, unresolvable manager ids, cycles, and
    /// finally a missing root.
    ///
    /// # Errors
    ///
    /// Returns the first [`BuildError`] encountered. No partial hierarchy is
    /// ever returned.
    #[instrument(level = "debug", skip_all)]
    pub fn build(records: impl IntoIterator<Item = FlatRecord>) -> Result<Self, BuildError> {
        let records = records.into_iter();
        let mut nodes = Vec::with_capacity(records.size_hint().0);
        let mut index = HashMap::with_capacity(nodes.capacity());

        for record in records {
            match index.entry(record.id().clone()) {
                Entry::Occupied(entry) => {
                    return Err(BuildError::DuplicateId(entry.key().clone()));
                }
                Entry::Vacant(entry) => {
                    entry.insert(nodes.len());
                    nodes.push(StaffNode::new(record));
                }
            }
        }

        let roots: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_root())
            .map(|(position, _)| position)
            .collect();

        if roots.len() > 1 {
            return Err(BuildError::MultipleRoots {
                roots: roots.iter().map(|&i| nodes[i].id().clone()).collect(),
            });
        }

        // Resolve every manager link once; these become the graph edges.
        let mut links = Vec::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if let Some(manager) = node.manager_id() {
                let manager_position = *index.get(manager).ok_or_else(|| {
                    BuildError::DanglingManagerReference {
                        employee: node.id().clone(),
                        manager: manager.clone(),
                    }
                })?;
                links.push((position, manager_position));
            }
        }

        // Every node has at most one outgoing link, so with a single root an
        // acyclic graph is exactly one where every node reaches that root.
        if let Some(members) = first_cycle(nodes.len(), &links) {
            return Err(BuildError::CyclicHierarchy {
                members: members.map(|i| nodes[i].id().clone()),
            });
        }

        let root = roots.first().copied().ok_or(BuildError::MissingRoot)?;

        for (employee, manager) in links {
            let id = nodes[employee].id().clone();
            nodes[manager].push_subordinate(id);
        }

        debug!(
            employees = nodes.len(),
            managers = nodes.iter().filter(|n| n.is_manager()).count(),
            "built hierarchy"
        );

        Ok(Self {
            nodes,
            index,
            root: Some(root),
        })
    }

    /// The employee without a manager, or `None` for an empty hierarchy.
    #[must_use]
    pub fn root(&self) -> Option<&StaffNode> {
        self.root.map(|i| &self.nodes[i])
    }

    /// Finds an employee by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&StaffNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// The direct manager of `node`, or `None` for the root.
    #[must_use]
    pub fn manager_of(&self, node: &StaffNode) -> Option<&StaffNode> {
        node.manager_id().and_then(|id| self.get(id))
    }

    /// The direct reports of `node`, in input order.
    pub fn subordinates<'a>(
        &'a self,
        node: &'a StaffNode,
    ) -> impl Iterator<Item = &'a StaffNode> + 'a {
        node.subordinates().iter().filter_map(|id| self.get(id))
    }

    /// All employees, in input order.
    pub fn iter(&self) -> impl Iterator<Item = &StaffNode> + '_ {
        self.nodes.iter()
    }

    /// All employees with at least one direct report, in input order.
    pub fn managers(&self) -> impl Iterator<Item = &StaffNode> + '_ {
        self.nodes.iter().filter(|node| node.is_manager())
    }

    /// The number of employees.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the hierarchy has no employees.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Links records without any validation, so analyses can be exercised
    /// against shapes `build` would reject.
    #[cfg(test)]
    pub(crate) fn unchecked(records: Vec<FlatRecord>) -> Self {
        let mut nodes: Vec<StaffNode> = records.into_iter().map(StaffNode::new).collect();
        let index: HashMap<EmployeeId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id().clone(), i))
            .collect();
        for i in 0..nodes.len() {
            let Some(manager) = nodes[i].manager_id().and_then(|m| index.get(m).copied()) else {
                continue;
            };
            let id = nodes[i].id().clone();
            nodes[manager].push_subordinate(id);
        }
        let root = nodes.iter().position(StaffNode::is_root);
        Self { nodes, index, root }
    }

    /// Flattens the hierarchy back into records, in input order.
    #[must_use]
    pub fn to_records(&self) -> Vec<FlatRecord> {
        self.nodes.iter().map(|node| node.record().clone()).collect()
    }
}

impl<'a> IntoIterator for &'a Hierarchy {
    type Item = &'a StaffNode;
    type IntoIter = std::slice::Iter<'a, StaffNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Returns the members of the cycle containing the earliest node, if any.
///
/// Members are sorted by input position.
fn first_cycle(node_count: usize, links: &[(usize, usize)]) -> Option<NonEmpty<usize>> {
    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::with_capacity(node_count, links.len());
    for position in 0..node_count {
        graph.add_node(position);
    }
    for &(employee, manager) in links {
        graph.add_edge(employee, manager, ());
    }

    if !is_cyclic_directed(&graph) {
        return None;
    }

    tarjan_scc(&graph)
        .into_iter()
        .filter(|component| match component.as_slice() {
            [single] => graph.contains_edge(*single, *single),
            _ => true,
        })
        .map(|mut component| {
            component.sort_unstable();
            component
        })
        .min_by_key(|component| component[0])
        .and_then(NonEmpty::from_vec)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn record(id: &str, salary: i64, manager: Option<&str>) -> FlatRecord {
        FlatRecord::new(id, "First", "Last", Decimal::from(salary), manager).unwrap()
    }

    fn ids(ids: &[&str]) -> Vec<EmployeeId> {
        ids.iter().map(|id| EmployeeId::new(*id).unwrap()).collect()
    }

    fn sample() -> Vec<FlatRecord> {
        vec![
            record("123", 60000, None),
            record("124", 45000, Some("123")),
            record("125", 47000, Some("123")),
            record("300", 50000, Some("124")),
            record("305", 34000, Some("300")),
        ]
    }

    #[test]
    fn builds_rooted_tree() {
        let hierarchy = Hierarchy::build(sample()).unwrap();

        assert_eq!(hierarchy.len(), 5);
        assert_eq!(hierarchy.root().unwrap().id().as_str(), "123");

        let ceo = hierarchy.get("123").unwrap();
        assert_eq!(ceo.subordinates(), ids(&["124", "125"]).as_slice());

        let managers: Vec<_> = hierarchy.managers().map(|n| n.id().as_str()).collect();
        assert_eq!(managers, ["123", "124", "300"]);

        let leaf = hierarchy.get("305").unwrap();
        assert!(!leaf.is_manager());
        assert_eq!(hierarchy.manager_of(leaf).unwrap().id().as_str(), "300");
    }

    #[test]
    fn records_may_arrive_in_any_order() {
        let mut records = sample();
        records.reverse();
        let hierarchy = Hierarchy::build(records).unwrap();

        assert_eq!(hierarchy.root().unwrap().id().as_str(), "123");
        let order: Vec<_> = hierarchy.iter().map(|n| n.id().as_str()).collect();
        assert_eq!(order, ["305", "300", "125", "124", "123"]);
        // Subordinates follow input order, not id order.
        assert_eq!(
            hierarchy.get("123").unwrap().subordinates(),
            ids(&["125", "124"]).as_slice()
        );
    }

    #[test]
    fn flattening_reproduces_the_records() {
        let hierarchy = Hierarchy::build(sample()).unwrap();
        assert_eq!(hierarchy.to_records(), sample());
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut records = sample();
        records.push(record("124", 1, Some("123")));

        let err = Hierarchy::build(records).unwrap_err();
        assert_eq!(err, BuildError::DuplicateId(EmployeeId::new("124").unwrap()));
    }

    #[test]
    fn multiple_roots_are_rejected() {
        let mut records = sample();
        records.push(record("900", 1, None));

        let err = Hierarchy::build(records).unwrap_err();
        assert_eq!(
            err,
            BuildError::MultipleRoots {
                roots: ids(&["123", "900"])
            }
        );
        assert_eq!(
            err.to_string(),
            "more than one employee without a manager: 123, 900"
        );
    }

    #[test]
    fn dangling_manager_reference_is_rejected() {
        let mut records = sample();
        records.push(record("400", 1, Some("999")));

        let err = Hierarchy::build(records).unwrap_err();
        assert_eq!(
            err,
            BuildError::DanglingManagerReference {
                employee: EmployeeId::new("400").unwrap(),
                manager: EmployeeId::new("999").unwrap(),
            }
        );
    }

    #[test]
    fn detached_cycle_is_rejected() {
        let mut records = sample();
        records.push(record("A", 1, Some("C")));
        records.push(record("B", 1, Some("A")));
        records.push(record("C", 1, Some("B")));

        let err = Hierarchy::build(records).unwrap_err();
        assert_eq!(
            err,
            BuildError::CyclicHierarchy {
                members: NonEmpty::from_vec(ids(&["A", "B", "C"])).unwrap()
            }
        );
    }

    #[test]
    fn cycle_without_any_root_is_reported_as_a_cycle() {
        let records = vec![
            record("A", 1, Some("B")),
            record("B", 1, Some("C")),
            record("C", 1, Some("A")),
        ];

        let err = Hierarchy::build(records).unwrap_err();
        assert!(matches!(err, BuildError::CyclicHierarchy { .. }));
        assert_eq!(err.to_string(), "reporting cycle between employees A, B, C");
    }

    #[test]
    fn self_management_is_a_cycle() {
        let mut records = sample();
        records.push(record("777", 1, Some("777")));

        let err = Hierarchy::build(records).unwrap_err();
        assert_eq!(
            err,
            BuildError::CyclicHierarchy {
                members: NonEmpty::new(EmployeeId::new("777").unwrap())
            }
        );
    }

    #[test]
    fn empty_input_has_no_root() {
        assert_eq!(Hierarchy::build(Vec::new()), Err(BuildError::MissingRoot));
    }

    #[test]
    fn default_hierarchy_is_empty() {
        let hierarchy = Hierarchy::default();
        assert!(hierarchy.is_empty());
        assert!(hierarchy.root().is_none());
        assert_eq!(hierarchy.managers().count(), 0);
    }
}
