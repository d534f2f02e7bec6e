use std::{path::PathBuf, process};

mod render;

use anyhow::Context;
use clap::ArgAction;
use orgchart::{Config, LoadMode, Report};
use rust_decimal::Decimal;
use tracing::{info, instrument};

/// Exit status of `--check` when the report has findings.
const FINDINGS_EXIT_CODE: i32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

/// Find long reporting lines and managers paid outside their salary band.
#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// CSV file of employee records, with a header line
    input: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of managers between an employee and the CEO
    #[arg(short, long)]
    threshold: Option<usize>,

    /// Multiple of the reports' average salary below which a manager is underpaid
    #[arg(long)]
    underpaid_multiplier: Option<Decimal>,

    /// Multiple of the reports' average salary above which a manager is overpaid
    #[arg(long)]
    overpaid_multiplier: Option<Decimal>,

    /// Treat an unreadable input file as an empty organisation
    #[arg(long)]
    lenient: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Exit with status 2 if anything is reported
    #[arg(long)]
    check: bool,

    /// Write the effective configuration to this file
    #[arg(long, value_name = "FILE")]
    save_config: Option<PathBuf>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = self.resolve_config()?;
        if let Some(path) = &self.save_config {
            config
                .save(path)
                .map_err(|e| anyhow::anyhow!(e))
                .with_context(|| format!("failed to save configuration to {}", path.display()))?;
            info!(path = %path.display(), "saved configuration");
        }

        let hierarchy = orgchart::load(&self.input, config.load_mode)
            .with_context(|| format!("failed to load {}", self.input.display()))?;
        let report = Report::assemble(&hierarchy, &config).context("analysis failed")?;

        match self.output {
            OutputFormat::Table => print!("{}", render::table(&report, &config)),
            OutputFormat::Json => println!("{}", render::json(&report)?),
        }

        if self.check && !report.is_empty() {
            process::exit(FINDINGS_EXIT_CODE);
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .map_err(|e| anyhow::anyhow!(e))
                .with_context(|| format!("failed to load configuration from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(threshold) = self.threshold {
            config.reporting_line_threshold = threshold;
        }
        if let Some(multiplier) = self.underpaid_multiplier {
            config.underpaid_multiplier = multiplier;
        }
        if let Some(multiplier) = self.overpaid_multiplier {
            config.overpaid_multiplier = multiplier;
        }
        if self.lenient {
            config.load_mode = LoadMode::Lenient;
        }

        config
            .validate()
            .map_err(|e| anyhow::anyhow!(e))
            .context("invalid configuration")?;
        Ok(config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // Logs go to stderr so that JSON on stdout stays parseable.
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}
