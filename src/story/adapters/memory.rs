//! In-memory tracker for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::story::{
    domain::{StoryId, StoryRecord, StoryUpdate, Workflow, WorkflowId, WorkflowStateId},
    ports::{StoryTracker, TrackerError, TrackerResult},
};

/// Thread-safe in-memory tracker.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTracker {
    state: Arc<RwLock<InMemoryTrackerState>>,
}

#[derive(Debug, Default)]
struct InMemoryTrackerState {
    stories: HashMap<StoryId, StoryRecord>,
    workflows: HashMap<WorkflowId, Workflow>,
    ignored_updates: HashMap<StoryId, WorkflowStateId>,
    updates: Vec<(StoryId, StoryUpdate)>,
}

fn lock_error(err: impl std::fmt::Display) -> TrackerError {
    TrackerError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces a story.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Transport`] when lock acquisition fails.
    pub fn insert_story(&self, story: StoryRecord) -> TrackerResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.stories.insert(story.id, story);
        Ok(())
    }

    /// Stores or replaces a workflow definition.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Transport`] when lock acquisition fails.
    pub fn insert_workflow(&self, workflow: Workflow) -> TrackerResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.workflows.insert(workflow.id, workflow);
        Ok(())
    }

    /// Makes updates to `story` report `reported_state` instead of the
    /// requested state, leaving the stored story unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Transport`] when lock acquisition fails.
    pub fn ignore_updates_for(
        &self,
        story: StoryId,
        reported_state: WorkflowStateId,
    ) -> TrackerResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.ignored_updates.insert(story, reported_state);
        Ok(())
    }

    /// Returns a stored story.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Transport`] when lock acquisition fails.
    pub fn story(&self, id: StoryId) -> TrackerResult<Option<StoryRecord>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.stories.get(&id).cloned())
    }

    /// Returns every update received, in arrival order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Transport`] when lock acquisition fails.
    pub fn updates(&self) -> TrackerResult<Vec<(StoryId, StoryUpdate)>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.updates.clone())
    }
}

#[async_trait]
impl StoryTracker for InMemoryTracker {
    async fn fetch_story(&self, id: StoryId) -> TrackerResult<Option<StoryRecord>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.stories.get(&id).cloned())
    }

    async fn fetch_workflow(&self, id: WorkflowId) -> TrackerResult<Workflow> {
        let state = self.state.read().map_err(lock_error)?;
        state
            .workflows
            .get(&id)
            .cloned()
            .ok_or_else(|| TrackerError::Response(format!("workflow {id} not found")))
    }

    async fn update_story(&self, id: StoryId, update: &StoryUpdate) -> TrackerResult<StoryRecord> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.updates.push((id, update.clone()));

        let ignored = state.ignored_updates.get(&id).copied();
        let story = state
            .stories
            .get_mut(&id)
            .ok_or_else(|| TrackerError::Response(format!("story {id} not found")))?;

        if let Some(reported_state) = ignored {
            let mut reported = story.clone();
            reported.workflow_state_id = reported_state;
            return Ok(reported);
        }

        story.workflow_state_id = update.workflow_state_id;
        if let Some(description) = &update.description {
            description.clone_into(&mut story.description);
        }
        Ok(story.clone())
    }
}
