//! Text and JSON rendering of a [`Report`].

use std::fmt::{Display, Write};

use orgchart::{Config, Report, ReportingLine, SalaryDeviation};
use owo_colors::{OwoColorize, colors::css};

/// Below this width the per-finding detail column is dropped.
const NARROW_COLUMNS: u16 = 80;

fn color_enabled() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < NARROW_COLUMNS)
}

/// Styling for the parts of a report.
trait Paint {
    /// Section titles (blue).
    fn heading(&self) -> String;
    /// Counts that need attention (amber).
    fn alert(&self) -> String;
    /// Counts that are fine (green).
    fn clear(&self) -> String;
    /// Supporting detail.
    fn muted(&self) -> String;
}

impl<T: Display> Paint for T {
    fn heading(&self) -> String {
        if color_enabled() {
            self.fg::<css::LightBlue>().bold().to_string()
        } else {
            self.to_string()
        }
    }

    fn alert(&self) -> String {
        if color_enabled() {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    fn clear(&self) -> String {
        if color_enabled() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn muted(&self) -> String {
        if color_enabled() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

/// Renders the report as a human-readable table.
pub fn table(report: &Report<'_>, config: &Config) -> String {
    let narrow = is_narrow();
    let mut out = String::new();

    let _ = writeln!(out, "{}", "Organisation report".heading());
    let _ = writeln!(out, "{}", "───────────────────".muted());

    section(
        &mut out,
        &format!(
            "Reporting lines longer than {}",
            config.reporting_line_threshold
        ),
        &report.long_reporting_lines,
        |out, line| reporting_line(out, line, narrow),
    );
    section(
        &mut out,
        &format!(
            "Overpaid managers (above {}x report average)",
            config.overpaid_multiplier
        ),
        &report.overpaid,
        |out, deviation| salary_deviation(out, deviation, "overpaid", narrow),
    );
    section(
        &mut out,
        &format!(
            "Underpaid managers (below {}x report average)",
            config.underpaid_multiplier
        ),
        &report.underpaid,
        |out, deviation| salary_deviation(out, deviation, "underpaid", narrow),
    );

    out
}

fn section<T>(out: &mut String, title: &str, items: &[T], row: impl Fn(&mut String, &T)) {
    let _ = writeln!(out);
    if items.is_empty() {
        let _ = writeln!(out, "{title}: {}", "0".clear());
        return;
    }

    let _ = writeln!(out, "{title}: {}", items.len().alert());
    for item in items {
        row(out, item);
    }
}

fn reporting_line(out: &mut String, line: &ReportingLine<'_>, narrow: bool) {
    let employee = line.employee;
    let _ = write!(
        out,
        "  {} ({}) has a reporting line of {}",
        employee.full_name(),
        employee.id(),
        line.depth
    );
    if !narrow {
        let detail = format!("  {} managers above", line.depth);
        let _ = write!(out, "{}", detail.muted());
    }
    let _ = writeln!(out);
}

fn salary_deviation(out: &mut String, deviation: &SalaryDeviation<'_>, label: &str, narrow: bool) {
    let manager = deviation.manager;
    let _ = write!(
        out,
        "  {} ({}) is {label} by {}",
        manager.full_name(),
        manager.id(),
        deviation.deviation
    );
    if !narrow {
        let detail = format!(
            "  salary {}, expected {}, report average {}",
            manager.salary(),
            deviation.expected_salary,
            deviation.average_subordinate_salary
        );
        let _ = write!(out, "{}", detail.muted());
    }
    let _ = writeln!(out);
}

/// Renders the report as pretty-printed JSON.
pub fn json(report: &Report<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
