//! Listener entries and subscription handles.

use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use crate::types::{Args, Handler, HandlerResult};

/// Identity token of one registration.
///
/// Two registrations of the same closure get different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.as_uuid().simple().to_string()[..8])
    }
}

/// Handle returned by every registration.
///
/// Holds only the event name and the id, never a reference into the
/// registry, so it stays valid (and harmless) after the listener is gone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    event: String,
    id: SubscriptionId,
}

impl Subscription {
    pub(crate) fn new(event: String, id: SubscriptionId) -> Self {
        Self { event, id }
    }

    /// Event name this listener was registered for.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Identity token of this listener.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl std::fmt::Display for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@'{}'", self.id, self.event)
    }
}

/// One registered listener.
pub(crate) struct ListenerEntry {
    id: SubscriptionId,
    once: bool,
    handler: Handler,
    /// Set when a `once` entry is claimed by a dispatch.
    fired: AtomicBool,
}

impl ListenerEntry {
    pub(crate) fn new(handler: Handler, once: bool) -> Self {
        Self {
            id: SubscriptionId::new(),
            once,
            handler,
            fired: AtomicBool::new(false),
        }
    }

    pub(crate) fn id(&self) -> SubscriptionId {
        self.id
    }

    pub(crate) fn is_once(&self) -> bool {
        self.once
    }

    /// Claim a `once` entry for invocation.
    ///
    /// Returns `false` if another dispatch (typically a nested one) already
    /// claimed it. Always `true` for persistent entries.
    pub(crate) fn claim(&self) -> bool {
        if !self.once {
            return true;
        }
        !self.fired.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn invoke(&self, args: &Args) -> HandlerResult {
        (self.handler)(args)
    }
}

impl std::fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("id", &self.id)
            .field("once", &self.once)
            .field("fired", &self.fired.load(Ordering::Acquire))
            .finish()
    }
}
