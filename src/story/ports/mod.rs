//! Port contracts for the story tracker.

pub mod tracker;

pub use tracker::{StoryTracker, TrackerError, TrackerResult};

#[cfg(test)]
pub use tracker::MockStoryTracker;
