//! Application services for story transitions.

mod transition;

pub use transition::{
    BatchMode, ReleaseRequest, SkipReason, SkippedStory, TransitionError, TransitionReport,
    TransitionRequest, TransitionResult, TransitionService, TransitionedStory,
};
