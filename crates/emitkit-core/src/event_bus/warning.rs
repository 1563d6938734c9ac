//! Capacity warnings.
//!
//! Registering more listeners for one event name than the configured
//! threshold is usually a leak, but never an error. The emitter reports it
//! out of band through a [`WarningSink`] and carries on.

use super::listener::Subscription;

/// Raised when a registration pushes an event name past the listener limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityWarning {
    /// Event name that crossed the threshold.
    pub event: String,
    /// Listener count after the registration.
    pub count: usize,
    /// The configured threshold.
    pub limit: usize,
    /// The registration that crossed it.
    pub subscription: Subscription,
}

impl std::fmt::Display for CapacityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Possible listener leak: {} listeners added to '{}' (limit {}). \
             Use set_max_listeners() to raise the limit",
            self.count, self.event, self.limit
        )
    }
}

/// Receiver for capacity warnings.
///
/// Called synchronously from the registering thread, after the registry lock
/// has been released.
pub trait WarningSink: Send + Sync {
    /// Report one warning.
    fn warn(&self, warning: &CapacityWarning);
}

impl<F> WarningSink for F
where
    F: Fn(&CapacityWarning) + Send + Sync,
{
    fn warn(&self, warning: &CapacityWarning) {
        self(warning)
    }
}

/// Default sink: logs through `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWarningSink;

impl WarningSink for TracingWarningSink {
    fn warn(&self, warning: &CapacityWarning) {
        tracing::warn!(
            event = %warning.event,
            count = warning.count,
            limit = warning.limit,
            subscription = %warning.subscription.id(),
            "{}",
            warning
        );
    }
}
