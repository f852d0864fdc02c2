//! Per-request context.
//!
//! A fresh [`RequestContext`] is stamped before a request enters the
//! middleware chain, carrying the trace identifier and start time down
//! the pipeline.

use std::time::Instant;
use uuid::Uuid;

/// Context stamped once per request and flowed through handlers.
#[derive(Debug, Clone)]
pub struct RequestContext {
    trace_id: Uuid,
    started_at: Instant,
}

impl RequestContext {
    /// Creates a context with a fresh trace identifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trace_id: Uuid::now_v7(),
            started_at: Instant::now(),
        }
    }

    /// Trace identifier for correlating log lines across the request.
    #[must_use]
    pub fn trace_id(&self) -> Uuid {
        self.trace_id
    }

    /// When request processing started.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Elapsed time since the request entered the pipeline.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
