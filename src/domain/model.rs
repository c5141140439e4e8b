use crate::utils::error::Result;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration;

/// One unit of request work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub index: usize,
    pub email: String,
}

/// The outcome of one work item. `status` is `None` when no response was
/// received at all (timeout, transport error, panic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestOutcome {
    pub index: usize,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub latency: Duration,
}

impl RequestOutcome {
    pub fn completed(index: usize, status: u16, latency: Duration) -> Self {
        Self {
            index,
            status: Some(status),
            error: None,
            latency,
        }
    }

    pub fn failed(index: usize, error: impl Into<String>, latency: Duration) -> Self {
        Self {
            index,
            status: None,
            error: Some(error.into()),
            latency,
        }
    }

    pub fn is_success(&self, success_status: u16) -> bool {
        self.status == Some(success_status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateOutcome {
    pub total: usize,
    pub successes: usize,
    /// Responses whose status differs from the success status.
    pub non_success: usize,
    /// Attempts that never produced a status.
    pub failures: usize,
}

impl AggregateOutcome {
    pub fn from_outcomes(outcomes: &[RequestOutcome], success_status: u16) -> Self {
        let statuses: Vec<Option<u16>> = outcomes.iter().map(|o| o.status).collect();
        Self::from_statuses(&statuses, success_status)
    }

    pub fn from_statuses(statuses: &[Option<u16>], success_status: u16) -> Self {
        let successes = statuses
            .iter()
            .filter(|s| **s == Some(success_status))
            .count();
        let failures = statuses.iter().filter(|s| s.is_none()).count();

        Self {
            total: statuses.len(),
            successes,
            non_success: statuses.len() - successes - failures,
            failures,
        }
    }

    pub fn success_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.successes as f64 / self.total as f64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub elapsed: Duration,
    pub outcomes: Vec<RequestOutcome>,
    pub aggregate: AggregateOutcome,
}

impl RunReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
