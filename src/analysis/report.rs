use serde::Serialize;
use tracing::instrument;

use crate::{
    analysis::{AnalysisError, ReportingLine, ReportingLines, SalaryBand, SalaryDeviation},
    domain::{Config, Hierarchy},
};

/// Every finding about one hierarchy, ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report<'a> {
    /// Employees with more manager hops to the root than the threshold.
    pub long_reporting_lines: Vec<ReportingLine<'a>>,
    /// Managers paid above the band.
    pub overpaid: Vec<SalaryDeviation<'a>>,
    /// Managers paid below the band.
    pub underpaid: Vec<SalaryDeviation<'a>>,
}

impl<'a> Report<'a> {
    /// Runs both analyses over `hierarchy` with the thresholds in `config`.
    ///
    /// The reporting-line and salary analyses are independent and run in
    /// parallel.
    ///
    /// # Errors
    ///
    /// Returns the first error from either analysis.
    #[instrument(level = "debug", skip_all)]
    pub fn assemble(hierarchy: &'a Hierarchy, config: &Config) -> Result<Self, AnalysisError> {
        let band = SalaryBand::from(config);

        let (long_reporting_lines, (overpaid, underpaid)) = rayon::join(
            || {
                ReportingLines::new(hierarchy)
                    .employees_beyond_threshold(config.reporting_line_threshold)
            },
            || {
                rayon::join(
                    || band.overpaid_managers(hierarchy),
                    || band.underpaid_managers(hierarchy),
                )
            },
        );

        Ok(Self {
            long_reporting_lines: long_reporting_lines?,
            overpaid: overpaid?,
            underpaid: underpaid?,
        })
    }

    /// Returns `true` if nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.long_reporting_lines.is_empty() && self.overpaid.is_empty() && self.underpaid.is_empty()
    }

    /// The total number of findings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.long_reporting_lines.len() + self.overpaid.len() + self.underpaid.len()
    }
}
