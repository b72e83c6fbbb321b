//! Domain model for tracker stories.
//!
//! Covers story identifiers and how they are found in text, the tracker's
//! view of stories, branches and workflows, and the workflow targets that
//! pull request activity can move a story to.

mod error;
mod ids;
mod reference;
mod release;
mod story;
mod target;

pub use error::StoryDomainError;
pub use ids::{StoryId, WorkflowId, WorkflowStateId};
pub use reference::{DEFAULT_STORY_PREFIXES, StoryReferenceExtractor};
pub use release::ReleaseNote;
pub use story::{
    LinkedPullRequest, StoryBranch, StoryRecord, StoryUpdate, Workflow, WorkflowState,
};
pub use target::{TargetState, WorkflowStateNames};
