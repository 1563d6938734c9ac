//! Default limits shared by the emitter and its configuration.

/// Listener count per event name above which a capacity warning is raised.
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// Threshold value that turns the capacity check off.
pub const UNLIMITED_LISTENERS: usize = 0;
