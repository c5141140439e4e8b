use crate::core::{RunEvent, RunObserver};

/// Writes run events to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn on_event(&self, event: &RunEvent) {
        match event {
            RunEvent::Started {
                total,
                concurrency,
                mode,
            } => {
                tracing::info!(
                    "🚀 Starting {} load run: {} requests with {} workers...",
                    mode,
                    total,
                    concurrency
                );
            }
            RunEvent::ItemCompleted {
                total,
                outcome,
                success_status,
            } => match (outcome.status, &outcome.error) {
                (Some(status), _) if status == *success_status => {
                    tracing::info!(
                        "✅ Request {}/{}: Status {} ({}ms)",
                        outcome.index + 1,
                        total,
                        status,
                        outcome.latency.as_millis()
                    );
                }
                (Some(status), _) => {
                    tracing::warn!(
                        "⚠️ Request {}/{}: Status {} ({}ms)",
                        outcome.index + 1,
                        total,
                        status,
                        outcome.latency.as_millis()
                    );
                }
                (None, error) => {
                    tracing::error!(
                        "❌ Request {}/{}: Error - {}",
                        outcome.index + 1,
                        total,
                        error.as_deref().unwrap_or("unknown error")
                    );
                }
            },
            RunEvent::Finished { aggregate, elapsed } => {
                tracing::info!(
                    "📊 Successful requests: {}/{} (non-success: {}, failed: {}) in {:.2} seconds",
                    aggregate.successes,
                    aggregate.total,
                    aggregate.non_success,
                    aggregate.failures,
                    elapsed.as_secs_f64()
                );
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn on_event(&self, _event: &RunEvent) {}
}
