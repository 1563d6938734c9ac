//! # emitkit
//!
//! An in-process named-event emitter:
//! - Listeners registered per event name, called in registration order
//! - One-shot listeners, tracked per registration
//! - Removal of exactly one listener through its subscription handle
//! - Snapshot dispatch, so handlers may register, remove, or emit re-entrantly
//! - Soft per-event listener limit reported through a warning sink
//!
//! ## Architecture
//!
//! 1. **emitkit-core** - Emitter, subscriptions, configuration, errors
//! 2. **emitkit** - Re-exports, logging setup, and the demo binary

pub use emitkit_core::{
    args, config, error, event_bus, types, ArgVec, Args, CapacityWarning, DispatchMode,
    EmitterConfig, EmitterError, EventEmitter, Handler, HandlerResult, ListenerFailure, Result,
    Subscription, SubscriptionId, TracingWarningSink, WarningSink,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
