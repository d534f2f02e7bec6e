use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    analysis::AnalysisError,
    domain::{Config, Hierarchy, StaffNode},
};

/// Decimal places of every reported amount.
const SCALE: u32 = 2;

/// Salaries are positive, so rounding away from zero at the midpoint is
/// rounding half-up.
const HALF_UP: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// The band a manager's salary is expected to fall within, as multiples of the
/// average salary of their direct reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryBand {
    underpaid_multiplier: Decimal,
    overpaid_multiplier: Decimal,
}

/// A manager paid outside the expected band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalaryDeviation<'a> {
    /// The manager.
    pub manager: &'a StaffNode,
    /// Mean salary of the manager's direct reports, rounded to two places.
    pub average_subordinate_salary: Decimal,
    /// The band edge the manager's salary was compared against.
    pub expected_salary: Decimal,
    /// Distance between the manager's salary and `expected_salary`, rounded
    /// half-up to exactly two decimal places.
    pub deviation: Decimal,
}

impl SalaryBand {
    /// Creates a band from its two multipliers.
    #[must_use]
    pub const fn new(underpaid_multiplier: Decimal, overpaid_multiplier: Decimal) -> Self {
        Self {
            underpaid_multiplier,
            overpaid_multiplier,
        }
    }

    /// The multiple of the average below which a manager is underpaid.
    #[must_use]
    pub const fn underpaid_multiplier(&self) -> Decimal {
        self.underpaid_multiplier
    }

    /// The multiple of the average above which a manager is overpaid.
    #[must_use]
    pub const fn overpaid_multiplier(&self) -> Decimal {
        self.overpaid_multiplier
    }

    /// Managers earning less than the underpaid multiple of their reports'
    /// average salary, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::SalaryOverflow`] if a team's salaries are too
    /// large to total or scale.
    #[instrument(level = "debug", skip_all)]
    pub fn underpaid_managers<'a>(
        &self,
        hierarchy: &'a Hierarchy,
    ) -> Result<Vec<SalaryDeviation<'a>>, AnalysisError> {
        let found = deviations(hierarchy, self.underpaid_multiplier, |salary, expected| {
            salary < expected
        })?;
        debug!(found = found.len(), "underpaid managers");
        Ok(found)
    }

    /// Managers earning more than the overpaid multiple of their reports'
    /// average salary, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::SalaryOverflow`] if a team's salaries are too
    /// large to total or scale.
    #[instrument(level = "debug", skip_all)]
    pub fn overpaid_managers<'a>(
        &self,
        hierarchy: &'a Hierarchy,
    ) -> Result<Vec<SalaryDeviation<'a>>, AnalysisError> {
        let found = deviations(hierarchy, self.overpaid_multiplier, |salary, expected| {
            salary > expected
        })?;
        debug!(found = found.len(), "overpaid managers");
        Ok(found)
    }
}

impl Default for SalaryBand {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SalaryBand {
    fn from(config: &Config) -> Self {
        Self::new(config.underpaid_multiplier, config.overpaid_multiplier)
    }
}

/// The mean salary of `node`'s direct reports, rounded half-up to two decimal
/// places. An employee without direct reports yields zero.
///
/// # Errors
///
/// Returns [`AnalysisError::SalaryOverflow`] if the reports' salaries are too
/// large to total.
pub fn average_subordinate_salary(
    hierarchy: &Hierarchy,
    node: &StaffNode,
) -> Result<Decimal, AnalysisError> {
    let overflow = || AnalysisError::SalaryOverflow(node.id().clone());

    let mut count = 0_u64;
    let mut total = Decimal::ZERO;
    for subordinate in hierarchy.subordinates(node) {
        count += 1;
        total = total
            .checked_add(subordinate.salary())
            .ok_or_else(overflow)?;
    }

    if count == 0 {
        return Ok(Decimal::ZERO);
    }

    let average = total.checked_div(Decimal::from(count)).ok_or_else(overflow)?;
    Ok(average.round_dp_with_strategy(SCALE, HALF_UP))
}

/// As [`average_subordinate_salary`], but only for managers.
///
/// # Errors
///
/// Returns [`AnalysisError::NotAManager`] if `node` has no direct reports,
/// and [`AnalysisError::SalaryOverflow`] as [`average_subordinate_salary`]
/// does.
pub fn strict_average_subordinate_salary(
    hierarchy: &Hierarchy,
    node: &StaffNode,
) -> Result<Decimal, AnalysisError> {
    if !node.is_manager() {
        return Err(AnalysisError::NotAManager(node.id().clone()));
    }
    average_subordinate_salary(hierarchy, node)
}

fn deviations<'a>(
    hierarchy: &'a Hierarchy,
    multiplier: Decimal,
    outside_band: impl Fn(Decimal, Decimal) -> bool,
) -> Result<Vec<SalaryDeviation<'a>>, AnalysisError> {
    let mut found = Vec::new();
    for manager in hierarchy.managers() {
        let average = average_subordinate_salary(hierarchy, manager)?;
        let expected = average
            .checked_mul(multiplier)
            .ok_or_else(|| AnalysisError::SalaryOverflow(manager.id().clone()))?;
        if outside_band(manager.salary(), expected) {
            // Both operands are positive, so the difference cannot overflow.
            found.push(SalaryDeviation {
                manager,
                average_subordinate_salary: average,
                expected_salary: expected,
                deviation: to_amount((manager.salary() - expected).abs()),
            });
        }
    }
    Ok(found)
}

fn to_amount(value: Decimal) -> Decimal {
    let mut amount = value.round_dp_with_strategy(SCALE, HALF_UP);
    amount.rescale(SCALE);
    amount
}
