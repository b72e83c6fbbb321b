//! Code host adapters.

pub mod github;
pub mod memory;
