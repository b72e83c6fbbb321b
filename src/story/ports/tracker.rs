//! Port for the project tracker that owns stories and workflows.

use crate::story::domain::{StoryId, StoryRecord, StoryUpdate, Workflow, WorkflowId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Access to stories and workflow definitions in the tracker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryTracker: Send + Sync {
    /// Fetches a story with its branches and linked pull requests.
    ///
    /// Returns `None` when the tracker has no story with this id.
    async fn fetch_story(&self, id: StoryId) -> TrackerResult<Option<StoryRecord>>;

    /// Fetches a workflow definition.
    async fn fetch_workflow(&self, id: WorkflowId) -> TrackerResult<Workflow>;

    /// Applies an update and returns the story as the tracker now sees it.
    async fn update_story(&self, id: StoryId, update: &StoryUpdate) -> TrackerResult<StoryRecord>;
}

/// Errors returned by tracker adapters.
#[derive(Debug, Clone, Error)]
pub enum TrackerError {
    /// The request could not be sent or its body could not be read.
    #[error("tracker transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The tracker answered with something other than the expected shape.
    #[error("unexpected tracker response: {0}")]
    Response(String),
}

impl TrackerError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
