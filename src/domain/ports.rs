use crate::domain::model::{AggregateOutcome, RequestOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Issues the request for one work item and reports the response status.
/// Errors are downgraded to failed outcomes by the runners.
#[async_trait]
pub trait RequestOperation: Send + Sync + 'static {
    async fn execute(&self, index: usize) -> Result<u16>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Started {
        total: usize,
        concurrency: usize,
        mode: &'static str,
    },
    ItemCompleted {
        total: usize,
        outcome: RequestOutcome,
        success_status: u16,
    },
    Finished {
        aggregate: AggregateOutcome,
        elapsed: Duration,
    },
}

pub trait RunObserver: Send + Sync {
    fn on_event(&self, event: &RunEvent);
}

pub trait ConfigProvider: Send + Sync {
    fn target_url(&self) -> &str;
    fn total_requests(&self) -> usize;
    fn concurrency(&self) -> usize;
    fn paced_duration(&self) -> Option<Duration>;
    fn request_timeout(&self) -> Duration;
    fn success_status(&self) -> u16;
}
