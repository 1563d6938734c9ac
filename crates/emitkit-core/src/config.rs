//! Emitter configuration.
//!
//! `EmitterConfig` is plain data with serde support so it can be embedded in
//! an application's own settings file. Every field has a default; an empty
//! JSON object yields [`EmitterConfig::default`].

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_LISTENERS;

/// How `emit` reacts when a handler returns an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Stop at the first failing handler and return its error.
    #[default]
    FailFast,
    /// Run every handler in the snapshot, then report all failures together.
    Isolated,
}

/// Configuration for an [`EventEmitter`](crate::EventEmitter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Listener count per event name above which a capacity warning is raised.
    /// `0` disables the check.
    pub max_listeners: usize,
    /// Handler failure policy.
    pub dispatch_mode: DispatchMode,
}

impl EmitterConfig {
    /// Config with the given warning threshold and default dispatch mode.
    pub fn with_max_listeners(max_listeners: usize) -> Self {
        Self {
            max_listeners,
            ..Default::default()
        }
    }
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            max_listeners: DEFAULT_MAX_LISTENERS,
            dispatch_mode: DispatchMode::FailFast,
        }
    }
}
