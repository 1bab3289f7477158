pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{storage::LocalStorage, toml_config::TomlConfig};

pub use core::{coordinator::Coordinator, etl::EtlEngine, pipeline::VehiclePipeline};
pub use domain::model::{Address, NameSource, Outcome, PipelineStats, RunReport, ValidatedRecord};
pub use utils::error::{EtlError, RecordError, Result};
