//! Error handling for emitkit
//!
//! Registration and removal never fail; errors only come out of `emit`, when a
//! handler reports a failure. Capacity warnings are not errors and go through
//! the [`WarningSink`](crate::WarningSink) instead.
//!
//! Handlers return `anyhow::Result<()>`, so the original failure is kept as
//! the `source` of the error returned to the caller.

use thiserror::Error;

use crate::event_bus::SubscriptionId;

/// One failed handler inside an isolated dispatch.
#[derive(Debug)]
pub struct ListenerFailure {
    /// The listener that failed.
    pub subscription: SubscriptionId,
    /// The error it returned.
    pub error: anyhow::Error,
}

impl std::fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:#}", self.subscription, self.error)
    }
}

/// Emitter error type
#[derive(Error, Debug)]
pub enum EmitterError {
    /// A handler failed and the dispatch was aborted.
    #[error("Listener {subscription} for '{event}' failed after {invoked} handler(s) ran")]
    Handler {
        /// Event being dispatched.
        event: String,
        /// The failing listener.
        subscription: SubscriptionId,
        /// Handlers invoked so far, the failing one included.
        invoked: usize,
        /// The handler's error.
        #[source]
        source: anyhow::Error,
    },

    /// One or more handlers failed during an isolated dispatch.
    #[error("{} of {invoked} listener(s) for '{event}' failed", .failures.len())]
    ListenerFailures {
        /// Event being dispatched.
        event: String,
        /// Handlers invoked, failing ones included.
        invoked: usize,
        /// Every failure, in dispatch order.
        failures: Vec<ListenerFailure>,
    },

    /// An async handler fired outside a tokio runtime.
    #[error("No tokio runtime available to run async listener for '{event}'")]
    NoAsyncRuntime {
        /// Event being dispatched.
        event: String,
    },
}

impl EmitterError {
    /// Name of the event whose dispatch failed.
    pub fn event(&self) -> &str {
        match self {
            EmitterError::Handler { event, .. }
            | EmitterError::ListenerFailures { event, .. }
            | EmitterError::NoAsyncRuntime { event } => event,
        }
    }

    /// Number of handlers that ran before `emit` returned.
    pub fn invoked(&self) -> usize {
        match self {
            EmitterError::Handler { invoked, .. }
            | EmitterError::ListenerFailures { invoked, .. } => *invoked,
            EmitterError::NoAsyncRuntime { .. } => 0,
        }
    }

    /// Subscriptions whose handlers failed.
    pub fn failed_subscriptions(&self) -> Vec<SubscriptionId> {
        match self {
            EmitterError::Handler { subscription, .. } => vec![*subscription],
            EmitterError::ListenerFailures { failures, .. } => {
                failures.iter().map(|f| f.subscription).collect()
            }
            EmitterError::NoAsyncRuntime { .. } => Vec::new(),
        }
    }

    /// Check if this error came from an isolated dispatch
    pub fn is_isolated(&self) -> bool {
        matches!(self, EmitterError::ListenerFailures { .. })
    }
}

/// Result type using EmitterError
pub type Result<T> = std::result::Result<T, EmitterError>;
