pub mod address;
pub mod coordinator;
pub mod etl;
pub mod name_resolver;
pub mod nulls;
pub mod parser;
pub mod pipeline;
pub mod schema;

pub use crate::domain::model::{
    Address, Outcome, PipelineStats, RawRecord, RunReport, ValidatedRecord,
};
pub use crate::domain::ports::{ConfigProvider, InputLine, Pipeline, Storage};
pub use crate::utils::error::Result;
