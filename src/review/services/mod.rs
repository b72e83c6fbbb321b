//! Application services for review aggregation.

mod stats;

pub use stats::{StoryStatsError, StoryStatsResult, StoryStatsService};
