pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::{HttpRequestOperation, HttpTarget};
pub use config::LoadConfig;
pub use crate::core::{
    engine::{LoadEngine, RunPlan, RunSettings},
    events::{NoopObserver, TracingObserver},
    paced::{pacing_delay, PacedRunner},
    runner::BoundedRunner,
};
pub use domain::model::{AggregateOutcome, RequestOutcome, RunReport, WorkItem};
pub use domain::ports::{ConfigProvider, RequestOperation, RunEvent, RunObserver};
pub use utils::error::{LoadError, Result};
