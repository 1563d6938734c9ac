//! # Event Bus Module
//!
//! Named-event listener registry with synchronous multicast dispatch.
//!
//! ## Overview
//!
//! - Listeners register against a string event name with `on` or `once`
//! - `emit` calls every listener registered for that name, in registration
//!   order, with the same argument list
//! - One-shot listeners are removed when a dispatch reaches them
//! - Every registration returns a [`Subscription`] that removes exactly that
//!   listener
//!
//! Dispatch works on a copy of the listener list taken when `emit` starts, so
//! handlers can register, remove, or emit again without disturbing the
//! dispatch they are running in.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use emitkit_core::{args, EventEmitter};
//!
//! let emitter = EventEmitter::new();
//!
//! let sub = emitter.on("x", |args| {
//!     tracing::info!(?args, "x fired");
//!     Ok(())
//! });
//! emitter.once("z", |_| Ok(()));
//!
//! assert_eq!(emitter.emit("x", &args![1, 2])?, 1);
//! assert_eq!(emitter.emit("z", &[])?, 1);
//! assert_eq!(emitter.emit("z", &[])?, 0);
//!
//! emitter.off(&sub);
//! ```

mod bus;
mod listener;
mod warning;

pub use bus::*;
pub use listener::{Subscription, SubscriptionId};
pub use warning::*;
