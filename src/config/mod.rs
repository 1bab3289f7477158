pub mod storage;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, validate_range, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const MAX_WORKERS: usize = 256;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "vehicle-etl")]
#[command(about = "Validate and normalize vehicle registration records")]
pub struct CliConfig {
    #[arg(long, default_value = "./data/vehicles.json")]
    pub input_path: String,

    #[arg(long, help = "Directory for rejects.csv and summary.json")]
    pub report_path: Option<String>,

    #[arg(long, default_value = "1")]
    pub workers: usize,

    #[arg(long, help = "Log every accepted record")]
    pub print_lines: bool,

    #[arg(long, help = "Load settings from a TOML file instead")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn report_path(&self) -> Option<&str> {
        self.report_path.as_deref()
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn print_lines(&self) -> bool {
        self.print_lines
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input_path", &self.input_path)?;
        if let Some(report_path) = &self.report_path {
            validate_path("report_path", report_path)?;
        }
        validate_range("workers", self.workers, 1, MAX_WORKERS)?;
        Ok(())
    }
}
