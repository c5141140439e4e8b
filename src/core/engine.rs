use crate::core::paced::PacedRunner;
use crate::core::runner::BoundedRunner;
use crate::core::{
    AggregateOutcome, ConfigProvider, RequestOperation, RunEvent, RunObserver, RunReport,
};
use crate::utils::error::Result;
use chrono::Local;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPlan {
    Concurrent { concurrency: usize },
    Paced { duration: Duration },
}

impl RunPlan {
    pub fn mode(&self) -> &'static str {
        match self {
            RunPlan::Concurrent { .. } => "concurrent",
            RunPlan::Paced { .. } => "paced",
        }
    }

    fn concurrency(&self) -> usize {
        match self {
            RunPlan::Concurrent { concurrency } => *concurrency,
            RunPlan::Paced { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub total: usize,
    pub timeout: Duration,
    pub success_status: u16,
}

pub struct LoadEngine<O: RequestOperation> {
    operation: Arc<O>,
    plan: RunPlan,
    settings: RunSettings,
    observer: Arc<dyn RunObserver>,
}

impl<O: RequestOperation> LoadEngine<O> {
    pub fn new(
        operation: Arc<O>,
        plan: RunPlan,
        settings: RunSettings,
        observer: Arc<dyn RunObserver>,
    ) -> Self {
        Self {
            operation,
            plan,
            settings,
            observer,
        }
    }

    /// A configured paced duration selects the paced plan.
    pub fn from_config<C: ConfigProvider>(
        operation: Arc<O>,
        config: &C,
        observer: Arc<dyn RunObserver>,
    ) -> Self {
        let plan = match config.paced_duration() {
            Some(duration) => RunPlan::Paced { duration },
            None => RunPlan::Concurrent {
                concurrency: config.concurrency(),
            },
        };
        let settings = RunSettings {
            total: config.total_requests(),
            timeout: config.request_timeout(),
            success_status: config.success_status(),
        };
        Self::new(operation, plan, settings, observer)
    }

    pub fn plan(&self) -> RunPlan {
        self.plan
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Local::now();
        let clock = Instant::now();
        let total = self.settings.total;

        self.observer.on_event(&RunEvent::Started {
            total,
            concurrency: self.plan.concurrency(),
            mode: self.plan.mode(),
        });

        let outcomes = match self.plan {
            RunPlan::Concurrent { concurrency } => {
                BoundedRunner::new(
                    Arc::clone(&self.operation),
                    concurrency,
                    self.settings.timeout,
                    self.settings.success_status,
                    Arc::clone(&self.observer),
                )?
                .run(total)
                .await?
            }
            RunPlan::Paced { duration } => {
                PacedRunner::new(
                    Arc::clone(&self.operation),
                    duration,
                    self.settings.timeout,
                    self.settings.success_status,
                    Arc::clone(&self.observer),
                )
                .run(total)
                .await
            }
        };

        let aggregate = AggregateOutcome::from_outcomes(&outcomes, self.settings.success_status);
        let elapsed = clock.elapsed();

        self.observer.on_event(&RunEvent::Finished { aggregate, elapsed });

        Ok(RunReport {
            started_at,
            elapsed,
            outcomes,
            aggregate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::NoopObserver;
    use async_trait::async_trait;

    struct MockConfig {
        paced: Option<Duration>,
    }

    impl ConfigProvider for MockConfig {
        fn target_url(&self) -> &str {
            "http://localhost/test"
        }

        fn total_requests(&self) -> usize {
            4
        }

        fn concurrency(&self) -> usize {
            2
        }

        fn paced_duration(&self) -> Option<Duration> {
            self.paced
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(5)
        }

        fn success_status(&self) -> u16 {
            201
        }
    }

    struct Created;

    #[async_trait]
    impl RequestOperation for Created {
        async fn execute(&self, _index: usize) -> Result<u16> {
            Ok(201)
        }
    }

    #[test]
    fn test_plan_from_config() {
        let concurrent = LoadEngine::from_config(
            Arc::new(Created),
            &MockConfig { paced: None },
            Arc::new(NoopObserver),
        );
        assert_eq!(concurrent.plan(), RunPlan::Concurrent { concurrency: 2 });

        let paced = LoadEngine::from_config(
            Arc::new(Created),
            &MockConfig {
                paced: Some(Duration::from_secs(8)),
            },
            Arc::new(NoopObserver),
        );
        assert_eq!(
            paced.plan(),
            RunPlan::Paced {
                duration: Duration::from_secs(8)
            }
        );
    }

    #[tokio::test]
    async fn test_run_counts_configured_success_status() {
        let engine = LoadEngine::from_config(
            Arc::new(Created),
            &MockConfig { paced: None },
            Arc::new(NoopObserver),
        );

        let report = engine.run().await.unwrap();

        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.aggregate.successes, 4);
    }
}
