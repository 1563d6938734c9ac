//! Type aliases for the handler and argument shapes used by the emitter.
//!
//! Handlers receive the dispatch arguments as a slice of [`serde_json::Value`],
//! so listeners with different "arities" can share one event name: each
//! handler reads the positions it cares about and ignores the rest.
//!
//! ```rust,ignore
//! use emitkit_core::{args, EventEmitter};
//!
//! let emitter = EventEmitter::new();
//! emitter.on("a", |args| {
//!     let first = args.first().and_then(|v| v.as_i64());
//!     tracing::info!(?first, "a fired");
//!     Ok(())
//! });
//! emitter.emit("a", &args![1, 2, 3])?;
//! ```

use std::sync::Arc;

use serde_json::Value;

/// The positional argument list handed to every handler.
pub type Args = [Value];

/// An owned argument list, as built by [`args!`](crate::args).
pub type ArgVec = Vec<Value>;

/// What a handler returns. `Err` is a handler failure.
pub type HandlerResult = anyhow::Result<()>;

/// A registered synchronous handler.
///
/// Shared behind an `Arc` so a dispatch snapshot can hold it without keeping
/// the registry locked.
pub type Handler = Arc<dyn Fn(&Args) -> HandlerResult + Send + Sync>;

/// Build an [`ArgVec`] from heterogeneous expressions.
///
/// Each element goes through `serde_json::json!`, so literals, strings and
/// any `Serialize` value are accepted.
///
/// ```rust,ignore
/// let args = emitkit_core::args![1, "two", 3.0, true];
/// assert_eq!(args.len(), 4);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::serde_json::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::serde_json::json!($arg)),+]
    };
}
