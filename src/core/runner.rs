use crate::core::{RequestOperation, RequestOutcome, RunEvent, RunObserver};
use crate::utils::error::{LoadError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Upper bound on result slots reserved before any request runs; larger runs
/// grow the buffer as outcomes arrive.
pub(crate) const MAX_PREALLOCATED_OUTCOMES: usize = 64 * 1024;

pub(crate) fn outcome_capacity(total: usize) -> usize {
    total.min(MAX_PREALLOCATED_OUTCOMES)
}

/// Executes one work item: applies the timeout and turns every error, or a
/// panic inside the operation, into a failed outcome.
pub(crate) async fn attempt<O: RequestOperation>(
    operation: &Arc<O>,
    index: usize,
    timeout: Duration,
) -> RequestOutcome {
    let started = Instant::now();
    let op = Arc::clone(operation);

    // Spawned so a panicking operation only takes down its own task.
    let mut handle = tokio::spawn(async move { op.execute(index).await });

    let error = match tokio::time::timeout(timeout, &mut handle).await {
        Ok(Ok(Ok(status))) => {
            return RequestOutcome::completed(index, status, started.elapsed());
        }
        Ok(Ok(Err(e))) => e,
        Ok(Err(join_err)) => LoadError::OperationPanicked {
            index,
            message: join_err.to_string(),
        },
        Err(_) => {
            // Timed-out requests must not keep counting against the bound,
            // so wait for the cancelled task to actually stop.
            handle.abort();
            let _ = handle.await;
            LoadError::TimeoutError {
                index,
                timeout_ms: timeout.as_millis(),
            }
        }
    };

    tracing::debug!("Request {} failed: {}", index, error);
    RequestOutcome::failed(index, error.to_string(), started.elapsed())
}

/// Fixed-size worker pool draining a shared index counter.
pub struct BoundedRunner<O: RequestOperation> {
    operation: Arc<O>,
    concurrency: usize,
    timeout: Duration,
    success_status: u16,
    observer: Arc<dyn RunObserver>,
}

impl<O: RequestOperation> BoundedRunner<O> {
    pub fn new(
        operation: Arc<O>,
        concurrency: usize,
        timeout: Duration,
        success_status: u16,
        observer: Arc<dyn RunObserver>,
    ) -> Result<Self> {
        if concurrency == 0 {
            return Err(LoadError::InvalidConfigValueError {
                field: "concurrency".to_string(),
                value: "0".to_string(),
                reason: "At least one worker is required".to_string(),
            });
        }

        Ok(Self {
            operation,
            concurrency,
            timeout,
            success_status,
            observer,
        })
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs `total` work items and returns their outcomes in index order.
    pub async fn run(&self, total: usize) -> Result<Vec<RequestOutcome>> {
        let next_index = Arc::new(AtomicUsize::new(0));
        let worker_count = self.concurrency.min(total);

        tracing::debug!("Spawning {} workers for {} work items", worker_count, total);

        let mut workers = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            let next_index = Arc::clone(&next_index);
            let operation = Arc::clone(&self.operation);
            let observer = Arc::clone(&self.observer);
            let timeout = self.timeout;
            let success_status = self.success_status;

            workers.push(tokio::spawn(async move {
                let mut completed = Vec::new();
                loop {
                    let index = next_index.fetch_add(1, Ordering::Relaxed);
                    if index >= total {
                        break;
                    }

                    let outcome = attempt(&operation, index, timeout).await;
                    observer.on_event(&RunEvent::ItemCompleted {
                        total,
                        outcome: outcome.clone(),
                        success_status,
                    });
                    completed.push(outcome);
                }
                completed
            }));
        }

        let mut outcomes = Vec::with_capacity(outcome_capacity(total));
        for worker in workers {
            let completed = worker.await.map_err(|e| LoadError::ProcessingError {
                message: format!("Worker task failed: {}", e),
            })?;
            outcomes.extend(completed);
        }

        outcomes.sort_unstable_by_key(|outcome| outcome.index);
        if outcomes.len() != total
            || outcomes.iter().enumerate().any(|(i, o)| o.index != i)
        {
            return Err(LoadError::ProcessingError {
                message: format!(
                    "Expected {} outcomes in order, collected {}",
                    total,
                    outcomes.len()
                ),
            });
        }

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::NoopObserver;
    use async_trait::async_trait;

    struct FixedStatus(u16);

    #[async_trait]
    impl RequestOperation for FixedStatus {
        async fn execute(&self, _index: usize) -> Result<u16> {
            Ok(self.0)
        }
    }

    struct SlowOperation;

    #[async_trait]
    impl RequestOperation for SlowOperation {
        async fn execute(&self, _index: usize) -> Result<u16> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(200)
        }
    }

    fn runner<O: RequestOperation>(op: O, concurrency: usize) -> BoundedRunner<O> {
        BoundedRunner::new(
            Arc::new(op),
            concurrency,
            Duration::from_secs(5),
            200,
            Arc::new(NoopObserver),
        )
        .unwrap()
    }

    #[test]
    fn test_outcome_capacity_is_capped() {
        assert_eq!(outcome_capacity(0), 0);
        assert_eq!(outcome_capacity(1200), 1200);
        assert_eq!(outcome_capacity(1_000_000_000), MAX_PREALLOCATED_OUTCOMES);
        assert_eq!(outcome_capacity(usize::MAX), MAX_PREALLOCATED_OUTCOMES);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let result = BoundedRunner::new(
            Arc::new(FixedStatus(200)),
            0,
            Duration::from_secs(1),
            200,
            Arc::new(NoopObserver),
        );
        assert!(matches!(
            result,
            Err(LoadError::InvalidConfigValueError { .. })
        ));
    }

    #[tokio::test]
    async fn test_outcomes_are_in_index_order() {
        let outcomes = runner(FixedStatus(200), 3).run(10).await.unwrap();

        assert_eq!(outcomes.len(), 10);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.index, i);
            assert_eq!(outcome.status, Some(200));
        }
    }

    #[tokio::test]
    async fn test_zero_total_produces_no_outcomes() {
        let outcomes = runner(FixedStatus(200), 4).run(0).await.unwrap();
        assert!(outcomes.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_downgrades_to_failure() {
        let runner = BoundedRunner::new(
            Arc::new(SlowOperation),
            2,
            Duration::from_millis(50),
            200,
            Arc::new(NoopObserver),
        )
        .unwrap();

        let outcomes = runner.run(3).await.unwrap();

        assert_eq!(outcomes.len(), 3);
        for outcome in &outcomes {
            assert_eq!(outcome.status, None);
            assert!(outcome.error.as_deref().unwrap().contains("timed out"));
        }
    }
}
