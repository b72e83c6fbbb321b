//! Tracker-side story, branch and workflow records.

use super::{StoryId, WorkflowId, WorkflowStateId};
use serde::{Deserialize, Serialize};

/// Pull request linked to a story branch, as reported by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedPullRequest {
    /// Pull request number within its repository.
    pub number: u64,
    /// Web URL of the pull request on the code host.
    pub url: String,
    /// Whether the pull request has been closed.
    pub closed: bool,
    /// Whether the pull request has been merged.
    pub merged: bool,
}

impl LinkedPullRequest {
    /// Creates an open pull request link.
    #[must_use]
    pub fn open(number: u64, url: impl Into<String>) -> Self {
        Self {
            number,
            url: url.into(),
            closed: false,
            merged: false,
        }
    }

    /// Returns `true` when the pull request is neither closed nor merged.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.closed && !self.merged
    }
}

/// Source branch associated with a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryBranch {
    /// Branch name.
    pub name: String,
    /// Whether the branch has been deleted on the code host.
    pub deleted: bool,
    /// Pull requests opened from this branch.
    pub pull_requests: Vec<LinkedPullRequest>,
}

impl StoryBranch {
    /// Creates a live branch with the given pull requests.
    #[must_use]
    pub fn new(name: impl Into<String>, pull_requests: Vec<LinkedPullRequest>) -> Self {
        Self {
            name: name.into(),
            deleted: false,
            pull_requests,
        }
    }

    /// Marks the branch as deleted.
    #[must_use]
    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }
}

/// Snapshot of a story as returned by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRecord {
    /// Story identifier.
    pub id: StoryId,
    /// Story title.
    pub name: String,
    /// Markdown description.
    pub description: String,
    /// Workflow the story belongs to.
    pub workflow_id: WorkflowId,
    /// Current workflow state.
    pub workflow_state_id: WorkflowStateId,
    /// Branches linked to the story.
    pub branches: Vec<StoryBranch>,
}

/// Single named state within a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// State identifier.
    pub id: WorkflowStateId,
    /// Human-readable state name, unique within a workflow.
    pub name: String,
}

impl WorkflowState {
    /// Creates a workflow state.
    #[must_use]
    pub fn new(id: WorkflowStateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Workflow definition listing its states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    /// Workflow identifier.
    pub id: WorkflowId,
    /// States available in the workflow.
    pub states: Vec<WorkflowState>,
}

impl Workflow {
    /// Finds the state with exactly the given name.
    #[must_use]
    pub fn state_named(&self, name: &str) -> Option<&WorkflowState> {
        self.states.iter().find(|state| state.name == name)
    }
}

/// Changes sent to the tracker when moving a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryUpdate {
    /// Workflow state the story should move to.
    pub workflow_state_id: WorkflowStateId,
    /// Replacement description, when it was amended.
    pub description: Option<String>,
}

impl StoryUpdate {
    /// Creates an update that only changes the workflow state.
    #[must_use]
    pub const fn to_state(workflow_state_id: WorkflowStateId) -> Self {
        Self {
            workflow_state_id,
            description: None,
        }
    }

    /// Sets a replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
