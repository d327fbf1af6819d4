//! Telemetry Module for the Luhn guard
//!
//! Emits one structured audit line per stream through the `log` facade, so
//! whatever logger the host installs can collect it. Audit lines never go to
//! the data sink.

use log::{info, warn};
use serde::Serialize;

use crate::error::FilterError;
use crate::governance::PumpStats;

/// Audit event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// Stream pumped to the end
    StreamCompleted,
    /// Working buffer too small for a pending digit run
    CapacityExceeded,
    /// Source or sink failed
    IoFailure,
}

/// Audit event for logging
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// Event type
    pub event_type: AuditEventType,
    /// Counters at the time of the event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<PumpStats>,
    /// Working buffer size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_capacity: Option<usize>,
    /// Reason for failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuditEvent {
    /// Create a new audit event
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            event_type,
            stats: None,
            buffer_capacity: None,
            reason: None,
        }
    }

    /// Attach pump counters
    pub fn with_stats(mut self, stats: &PumpStats) -> Self {
        self.stats = Some(*stats);
        self
    }

    /// Set buffer capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = Some(capacity);
        self
    }

    /// Set reason
    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }

    /// Log the event
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(json) => match self.event_type {
                AuditEventType::CapacityExceeded | AuditEventType::IoFailure => {
                    warn!("[LUHN-GUARD-AUDIT] {}", json);
                }
                AuditEventType::StreamCompleted => {
                    info!("[LUHN-GUARD-AUDIT] {}", json);
                }
            },
            Err(e) => {
                warn!("Failed to serialize audit event: {}", e);
            }
        }
    }
}

/// Create a completed stream audit event
pub fn audit_completed(stats: &PumpStats, capacity: usize) -> AuditEvent {
    AuditEvent::new(AuditEventType::StreamCompleted)
        .with_stats(stats)
        .with_capacity(capacity)
}

/// Create an audit event for a fatal pump error
pub fn audit_failure(error: &FilterError, stats: &PumpStats) -> AuditEvent {
    let (event_type, capacity) = match error {
        FilterError::CapacityExceeded { capacity } => {
            (AuditEventType::CapacityExceeded, Some(*capacity))
        }
        FilterError::Io(_) => (AuditEventType::IoFailure, None),
    };

    let mut event = AuditEvent::new(event_type)
        .with_stats(stats)
        .with_reason(&error.to_string());
    event.buffer_capacity = capacity;
    event
}
