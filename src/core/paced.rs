use crate::core::runner::{attempt, outcome_capacity};
use crate::core::{RequestOperation, RequestOutcome, RunEvent, RunObserver};
use std::sync::Arc;
use std::time::Duration;

/// Spreads `total` requests evenly over `duration`.
pub fn pacing_delay(duration: Duration, total: usize) -> Duration {
    if total == 0 {
        return Duration::ZERO;
    }
    let nanos = duration.as_nanos() / total as u128;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

/// Strictly sequential runner with a fixed sleep between requests.
pub struct PacedRunner<O: RequestOperation> {
    operation: Arc<O>,
    duration: Duration,
    timeout: Duration,
    success_status: u16,
    observer: Arc<dyn RunObserver>,
}

impl<O: RequestOperation> PacedRunner<O> {
    pub fn new(
        operation: Arc<O>,
        duration: Duration,
        timeout: Duration,
        success_status: u16,
        observer: Arc<dyn RunObserver>,
    ) -> Self {
        Self {
            operation,
            duration,
            timeout,
            success_status,
            observer,
        }
    }

    pub async fn run(&self, total: usize) -> Vec<RequestOutcome> {
        let delay = pacing_delay(self.duration, total);
        tracing::info!(
            "⏱️ Sending {} requests over {:?} ({:.3}s between requests)",
            total,
            self.duration,
            delay.as_secs_f64()
        );

        let mut outcomes = Vec::with_capacity(outcome_capacity(total));
        for index in 0..total {
            let outcome = attempt(&self.operation, index, self.timeout).await;
            self.observer.on_event(&RunEvent::ItemCompleted {
                total,
                outcome: outcome.clone(),
                success_status: self.success_status,
            });
            outcomes.push(outcome);

            // No sleep after the final request.
            if index + 1 < total {
                tokio::time::sleep(delay).await;
            }
        }
        outcomes
    }
}
