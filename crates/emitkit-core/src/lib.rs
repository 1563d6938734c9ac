//! # emitkit Core
//!
//! In-process publish/subscribe core: a named-event listener registry with
//! synchronous multicast dispatch, one-shot listeners, and removal by
//! subscription handle.

pub mod config;
pub mod constants;
pub mod error;
pub mod event_bus;
pub mod types;

pub use config::{DispatchMode, EmitterConfig};

pub use error::{EmitterError, ListenerFailure, Result};

pub use event_bus::{
    CapacityWarning, EventEmitter, Subscription, SubscriptionId, TracingWarningSink, WarningSink,
};

pub use types::{ArgVec, Args, Handler, HandlerResult};

// Used by the `args!` macro
pub use serde_json;
