//! Tracker stories and their workflow transitions.
//!
//! Stories live in the project tracker; this module finds story references
//! in text, reads story and workflow records through the
//! [`ports::StoryTracker`] port, and moves stories between workflow states
//! with post-update verification. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
