pub mod engine;
pub mod events;
pub mod paced;
pub mod runner;

pub use crate::domain::model::{AggregateOutcome, RequestOutcome, RunReport, WorkItem};
pub use crate::domain::ports::{ConfigProvider, RequestOperation, RunEvent, RunObserver};
pub use crate::utils::error::Result;
