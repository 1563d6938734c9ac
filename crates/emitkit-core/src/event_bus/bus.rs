//! Event emitter implementation.
//!
//! Provides the EventEmitter struct: a per-instance registry of named
//! listeners with synchronous, snapshot-based multicast dispatch.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use super::listener::{ListenerEntry, Subscription, SubscriptionId};
use super::warning::{CapacityWarning, TracingWarningSink, WarningSink};
use crate::config::{DispatchMode, EmitterConfig};
use crate::constants::UNLIMITED_LISTENERS;
use crate::error::{EmitterError, ListenerFailure, Result};
use crate::types::{ArgVec, Args, Handler, HandlerResult};

/// Listeners registered for one event name, in registration order.
#[derive(Default)]
struct Bucket {
    entries: Vec<Arc<ListenerEntry>>,
    /// Set once the bucket went over the limit; cleared when it drops back.
    warned: bool,
}

/// The live listener table. Only ever touched with the emitter's lock held.
struct Registry {
    events: HashMap<String, Bucket>,
    max_listeners: usize,
}

impl Registry {
    fn new(max_listeners: usize) -> Self {
        Self {
            events: HashMap::new(),
            max_listeners,
        }
    }

    fn over_limit(&self, count: usize) -> bool {
        self.max_listeners != UNLIMITED_LISTENERS && count > self.max_listeners
    }

    /// Append an entry. Returns `(count, limit)` when this registration
    /// crossed the threshold and a warning is due.
    fn insert(&mut self, event: &str, entry: Arc<ListenerEntry>) -> Option<(usize, usize)> {
        let limit = self.max_listeners;
        let count = {
            let bucket = self.events.entry(event.to_string()).or_default();
            bucket.entries.push(entry);
            bucket.entries.len()
        };
        if !self.over_limit(count) {
            return None;
        }

        let bucket = self.events.get_mut(event)?;
        if bucket.warned {
            return None;
        }
        bucket.warned = true;
        Some((count, limit))
    }

    /// Take an entry out of the table.
    ///
    /// The entry is handed back so the caller can drop it after releasing the
    /// lock: dropping a handler may run arbitrary `Drop` code.
    fn remove(&mut self, event: &str, id: SubscriptionId) -> Option<Arc<ListenerEntry>> {
        let bucket = self.events.get_mut(event)?;
        let pos = bucket.entries.iter().position(|e| e.id() == id)?;
        let entry = bucket.entries.remove(pos);

        let remaining = bucket.entries.len();
        if remaining == 0 {
            self.events.remove(event);
        } else if !self.over_limit(remaining) {
            if let Some(bucket) = self.events.get_mut(event) {
                bucket.warned = false;
            }
        }
        Some(entry)
    }

    fn snapshot(&self, event: &str) -> Option<Vec<Arc<ListenerEntry>>> {
        self.events.get(event).map(|bucket| bucket.entries.clone())
    }

    fn count(&self, event: &str) -> usize {
        self.events.get(event).map_or(0, |bucket| bucket.entries.len())
    }

    fn set_limit(&mut self, max_listeners: usize) {
        self.max_listeners = max_listeners;
        let within: Vec<String> = self
            .events
            .iter()
            .filter(|(_, bucket)| !self.over_limit(bucket.entries.len()))
            .map(|(event, _)| event.clone())
            .collect();
        for event in within {
            if let Some(bucket) = self.events.get_mut(&event) {
                bucket.warned = false;
            }
        }
    }
}

/// Named-event listener registry with synchronous dispatch.
///
/// Each emitter owns its registry; there is no process-wide instance. The
/// registry is guarded by a single mutex that is held only to register,
/// remove, inspect, or copy a listener list, never while a handler runs, so
/// handlers may freely call back into the emitter.
pub struct EventEmitter {
    registry: Mutex<Registry>,
    dispatch_mode: DispatchMode,
    warning_sink: Arc<dyn WarningSink>,
}

impl EventEmitter {
    /// Create a new emitter with default configuration
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Create a new emitter with custom configuration
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            registry: Mutex::new(Registry::new(config.max_listeners)),
            dispatch_mode: config.dispatch_mode,
            warning_sink: Arc::new(TracingWarningSink),
        }
    }

    /// Replace the sink that receives capacity warnings.
    pub fn with_warning_sink<S>(mut self, sink: S) -> Self
    where
        S: WarningSink + 'static,
    {
        self.warning_sink = Arc::new(sink);
        self
    }

    /// Register a listener for `event`.
    ///
    /// Never fails. Any string is a valid event name, the empty string
    /// included. If this registration takes the listener count for `event`
    /// over the limit, one [`CapacityWarning`] goes to the warning sink.
    pub fn on<F>(&self, event: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&Args) -> HandlerResult + Send + Sync + 'static,
    {
        self.add_listener(event.into(), Arc::new(handler), false)
    }

    /// Register a listener that is removed the first time a dispatch reaches it.
    ///
    /// Every `once` registration is tracked on its own: several one-shot
    /// listeners on the same name all fire on the next `emit`.
    ///
    /// The listener is taken out before its handler runs, so it is gone even
    /// if the handler returns an error or panics.
    pub fn once<F>(&self, event: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&Args) -> HandlerResult + Send + Sync + 'static,
    {
        self.add_listener(event.into(), Arc::new(handler), true)
    }

    /// Register an async listener.
    ///
    /// On dispatch the arguments are cloned and the future is spawned on the
    /// current tokio runtime. `emit` does not wait for it; a failure of the
    /// future is logged. Dispatching outside a runtime fails the handler with
    /// [`EmitterError::NoAsyncRuntime`].
    pub fn on_async<F, Fut>(&self, event: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(ArgVec) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let event = event.into();
        let handler = spawning_handler(event.clone(), handler);
        self.add_listener(event, handler, false)
    }

    /// One-shot variant of [`on_async`](Self::on_async).
    pub fn once_async<F, Fut>(&self, event: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(ArgVec) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let event = event.into();
        let handler = spawning_handler(event.clone(), handler);
        self.add_listener(event, handler, true)
    }

    fn add_listener(&self, event: String, handler: Handler, once: bool) -> Subscription {
        let entry = Arc::new(ListenerEntry::new(handler, once));
        let subscription = Subscription::new(event, entry.id());

        let crossed = self.registry.lock().insert(subscription.event(), entry);
        tracing::debug!(once, "Subscription {} added", subscription);

        if let Some((count, limit)) = crossed {
            self.warning_sink.warn(&CapacityWarning {
                event: subscription.event().to_string(),
                count,
                limit,
                subscription: subscription.clone(),
            });
        }
        subscription
    }

    /// Remove the listener behind `subscription`.
    ///
    /// Returns true if the listener was found and removed. Removing a
    /// listener that already fired or was already removed is a no-op.
    /// Dispatches already in progress still call it.
    pub fn off(&self, subscription: &Subscription) -> bool {
        let removed = self
            .registry
            .lock()
            .remove(subscription.event(), subscription.id());
        // The guard is gone here; dropping the entry may re-enter the emitter
        let Some(entry) = removed else {
            return false;
        };
        drop(entry);
        tracing::debug!("Subscription {} removed", subscription);
        true
    }

    /// Dispatch `event` to its listeners.
    ///
    /// The listener list is copied first; listeners added or removed while the
    /// dispatch runs only affect later dispatches. A one-shot listener is
    /// taken out of the registry before its handler runs.
    ///
    /// Returns the number of handlers invoked, `0` when nothing is registered.
    /// Handler panics are not caught.
    pub fn emit(&self, event: &str, args: &Args) -> Result<usize> {
        let Some(snapshot) = self.registry.lock().snapshot(event) else {
            tracing::trace!(event, "No listeners");
            return Ok(0);
        };

        let mut invoked = 0;
        let mut failures = Vec::new();

        for entry in &snapshot {
            if !entry.claim() {
                continue;
            }
            if entry.is_once() {
                let removed = self.registry.lock().remove(event, entry.id());
                drop(removed);
            }

            invoked += 1;
            let Err(error) = entry.invoke(args) else {
                continue;
            };

            match self.dispatch_mode {
                DispatchMode::FailFast => {
                    tracing::debug!(event, subscription = %entry.id(), "Dispatch aborted: {:#}", error);
                    return Err(EmitterError::Handler {
                        event: event.to_string(),
                        subscription: entry.id(),
                        invoked,
                        source: error,
                    });
                }
                DispatchMode::Isolated => {
                    tracing::warn!(event, subscription = %entry.id(), "Listener failed: {:#}", error);
                    failures.push(ListenerFailure {
                        subscription: entry.id(),
                        error,
                    });
                }
            }
        }

        tracing::trace!(event, invoked, "Dispatch complete");

        if failures.is_empty() {
            Ok(invoked)
        } else {
            Err(EmitterError::ListenerFailures {
                event: event.to_string(),
                invoked,
                failures,
            })
        }
    }

    /// Number of live listeners for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.registry.lock().count(event)
    }

    /// Number of live listeners across all events
    pub fn total_listener_count(&self) -> usize {
        self.registry
            .lock()
            .events
            .values()
            .map(|bucket| bucket.entries.len())
            .sum()
    }

    /// Names with at least one live listener, sorted
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registry.lock().events.keys().cloned().collect();
        names.sort();
        names
    }

    /// Live subscriptions for `event`, in dispatch order
    pub fn subscriptions(&self, event: &str) -> Vec<Subscription> {
        self.registry
            .lock()
            .events
            .get(event)
            .map(|bucket| {
                bucket
                    .entries
                    .iter()
                    .map(|entry| Subscription::new(event.to_string(), entry.id()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `subscription` still refers to a live listener
    pub fn contains(&self, subscription: &Subscription) -> bool {
        self.registry
            .lock()
            .events
            .get(subscription.event())
            .is_some_and(|bucket| bucket.entries.iter().any(|e| e.id() == subscription.id()))
    }

    /// Current capacity warning threshold (`0` means unlimited)
    pub fn max_listeners(&self) -> usize {
        self.registry.lock().max_listeners
    }

    /// Change the capacity warning threshold (`0` means unlimited).
    ///
    /// Existing listeners are kept. Names that are now within the limit will
    /// warn again the next time they cross it.
    pub fn set_max_listeners(&self, max_listeners: usize) {
        self.registry.lock().set_limit(max_listeners);
        tracing::debug!(max_listeners, "Listener limit changed");
    }

    /// Remove every listener for `event`. Returns how many were removed.
    pub fn remove_all_listeners(&self, event: &str) -> usize {
        let bucket = self.registry.lock().events.remove(event);
        let removed = bucket.map_or(0, |bucket| bucket.entries.len());
        if removed > 0 {
            tracing::debug!(event, removed, "All listeners removed");
        }
        removed
    }

    /// Remove every listener for every event. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let drained: Vec<Bucket> = {
            let mut registry = self.registry.lock();
            registry.events.drain().map(|(_, bucket)| bucket).collect()
        };
        let removed = drained.iter().map(|bucket| bucket.entries.len()).sum();
        if removed > 0 {
            tracing::debug!(removed, "Registry cleared");
        }
        removed
    }

    /// The current configuration
    pub fn config(&self) -> EmitterConfig {
        EmitterConfig {
            max_listeners: self.max_listeners(),
            dispatch_mode: self.dispatch_mode,
        }
    }
}

/// Wrap an async handler into a synchronous one that spawns it.
fn spawning_handler<F, Fut>(event: String, handler: F) -> Handler
where
    F: Fn(ArgVec) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(move |args: &Args| -> HandlerResult {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            EmitterError::NoAsyncRuntime {
                event: event.clone(),
            }
        })?;

        let future = handler(args.to_vec());
        let event = event.clone();
        runtime.spawn(async move {
            if let Err(error) = future.await {
                tracing::warn!(event = %event, "Async listener failed: {:#}", error);
            }
        });
        Ok(())
    })
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("events", &self.event_names())
            .field("listeners", &self.total_listener_count())
            .field("config", &self.config())
            .finish()
    }
}
