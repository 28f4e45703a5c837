//! # Pipeline Events
//!
//! Progress events emitted while the pipeline runs. The server fans
//! these out to SSE subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of pipeline event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineEventKind {
    /// Generation run started
    PipelineStarted,
    /// A step's role started working
    StepStarted,
    /// A step completed successfully
    StepCompleted,
    /// A step failed
    StepFailed,
    /// Final Markdown produced
    PipelineCompleted,
    /// Generation run failed
    PipelineFailed,
}

/// An event in a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    /// Unique event ID
    pub id: String,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Kind of event
    pub kind: PipelineEventKind,
    /// Role that produced this event
    pub role: String,
    /// Associated data (JSON)
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl PipelineEvent {
    /// Create a new event
    pub fn new(kind: PipelineEventKind, role: &str) -> Self {
        Self {
            id: event_id(),
            timestamp: Utc::now(),
            kind,
            role: role.to_string(),
            data: None,
        }
    }

    /// Add data to the event
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Generate a simple unique event id
fn event_id() -> String {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos();
    format!("{:x}-{:x}", nanos, rand_u32())
}

/// Simple random number (not cryptographic)
fn rand_u32() -> u32 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};
    RandomState::new().build_hasher().finish() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = PipelineEvent::new(PipelineEventKind::StepStarted, "researcher")
            .with_data(serde_json::json!({"step": 1}));

        assert_eq!(event.role, "researcher");
        assert_eq!(event.kind, PipelineEventKind::StepStarted);
        assert!(event.data.is_some());
    }

    #[test]
    fn test_event_kind_serialization() {
        let json = serde_json::to_string(&PipelineEventKind::PipelineCompleted).unwrap();
        assert_eq!(json, "\"pipeline_completed\"");
    }
}
