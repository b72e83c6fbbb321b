//! Tracker adapters.

pub mod memory;
pub mod shortcut;
