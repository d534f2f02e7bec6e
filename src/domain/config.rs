use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for organisation chart analysis.
///
/// This struct holds the thresholds the analyses compare against, and how
/// strictly a missing input is treated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The longest acceptable reporting line.
    ///
    /// Employees with more manager hops than this between themselves and the
    /// root are reported.
    pub reporting_line_threshold: usize,

    /// A manager earning less than this multiple of the average salary of
    /// their direct reports is underpaid.
    pub underpaid_multiplier: Decimal,

    /// A manager earning more than this multiple of the average salary of
    /// their direct reports is overpaid.
    pub overpaid_multiplier: Decimal,

    /// How a missing or unreadable input is treated.
    pub load_mode: LoadMode,
}

/// How the loader reacts when the input cannot be read at all.
///
/// Invalid data is always an error; this only governs I/O failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Fail the load.
    #[default]
    Strict,
    /// Log a warning and continue with an empty hierarchy.
    Lenient,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reporting_line_threshold: default_reporting_line_threshold(),
            underpaid_multiplier: default_underpaid_multiplier(),
            overpaid_multiplier: default_overpaid_multiplier(),
            load_mode: LoadMode::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, if the TOML content is
    /// invalid, or if the values fail [`Config::validate`].
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        let config: Self =
            toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Checks that the salary band is meaningful.
    ///
    /// # Errors
    ///
    /// Returns an error if either multiplier is not strictly positive, or if
    /// the underpaid multiplier exceeds the overpaid multiplier.
    pub fn validate(&self) -> Result<(), String> {
        if self.underpaid_multiplier <= Decimal::ZERO {
            return Err(format!(
                "underpaid multiplier must be greater than zero, got {}",
                self.underpaid_multiplier
            ));
        }
        if self.overpaid_multiplier <= Decimal::ZERO {
            return Err(format!(
                "overpaid multiplier must be greater than zero, got {}",
                self.overpaid_multiplier
            ));
        }
        if self.underpaid_multiplier > self.overpaid_multiplier {
            return Err(format!(
                "underpaid multiplier ({}) must not exceed overpaid multiplier ({})",
                self.underpaid_multiplier, self.overpaid_multiplier
            ));
        }
        Ok(())
    }
}

const fn default_reporting_line_threshold() -> usize {
    4
}

const fn default_underpaid_multiplier() -> Decimal {
    Decimal::from_parts(12, 0, 0, false, 1)
}

const fn default_overpaid_multiplier() -> Decimal {
    Decimal::from_parts(15, 0, 0, false, 1)
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_reporting_line_threshold")]
        reporting_line_threshold: usize,

        /// Multipliers are written as strings so they round-trip exactly.
        #[serde(default = "default_underpaid_multiplier")]
        underpaid_multiplier: Decimal,

        #[serde(default = "default_overpaid_multiplier")]
        overpaid_multiplier: Decimal,

        #[serde(default)]
        load_mode: LoadMode,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                reporting_line_threshold,
                underpaid_multiplier,
                overpaid_multiplier,
                load_mode,
            } => Self {
                reporting_line_threshold,
                underpaid_multiplier,
                overpaid_multiplier,
                load_mode,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            reporting_line_threshold: config.reporting_line_threshold,
            underpaid_multiplier: config.underpaid_multiplier,
            overpaid_multiplier: config.overpaid_multiplier,
            load_mode: config.load_mode,
        }
    }
}
