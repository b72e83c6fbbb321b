//! Shared world state for story transition BDD scenarios.

use std::sync::Arc;

use storygate::{
    event::services::{DispatchError, DispatchSettings, EventDispatcher},
    review::{
        adapters::memory::InMemoryCodeHost,
        domain::{ReviewPolicy, ReviewRecord},
    },
    story::{
        adapters::memory::InMemoryTracker,
        domain::{
            StoryId, StoryReferenceExtractor, Workflow, WorkflowId, WorkflowState,
            WorkflowStateId, WorkflowStateNames,
        },
    },
};
use rstest::fixture;

/// Workflow every scenario story belongs to.
pub const WORKFLOW: WorkflowId = WorkflowId::new(1);
/// Initial state of every scenario story.
pub const IN_DEVELOPMENT: WorkflowStateId = WorkflowStateId::new(10);

const STATES: [(u64, &str); 5] = [
    (10, "In Development"),
    (11, "Ready for Feature QA"),
    (12, "Ready for Code Review"),
    (13, "Ready for Staging"),
    (14, "Test Fail"),
];

/// Dispatcher type used by the BDD world.
pub type TestDispatcher = EventDispatcher<InMemoryTracker, InMemoryCodeHost>;

/// Scenario world for story transition behaviour tests.
pub struct StoryTransitionWorld {
    pub tracker: Arc<InMemoryTracker>,
    pub code_host: Arc<InMemoryCodeHost>,
    pub pending_reviews: Vec<(u64, ReviewRecord)>,
    pub last_dispatch_result: Option<Result<Vec<StoryId>, DispatchError>>,
}

impl StoryTransitionWorld {
    /// Creates a world whose tracker knows the standard workflow.
    #[must_use]
    pub fn new() -> Self {
        let tracker = InMemoryTracker::new();
        let workflow = Workflow {
            id: WORKFLOW,
            states: STATES
                .iter()
                .map(|&(id, name)| WorkflowState::new(WorkflowStateId::new(id), name))
                .collect(),
        };
        tracker
            .insert_workflow(workflow)
            .expect("fresh in-memory tracker accepts the workflow");

        Self {
            tracker: Arc::new(tracker),
            code_host: Arc::new(InMemoryCodeHost::new()),
            pending_reviews: Vec::new(),
            last_dispatch_result: None,
        }
    }

    /// Builds a dispatcher over the world's backends.
    ///
    /// # Errors
    ///
    /// Returns an error if the default story prefixes fail to compile.
    pub fn dispatcher(&self) -> Result<TestDispatcher, eyre::Report> {
        let settings = DispatchSettings {
            policy: ReviewPolicy::new(["qa-alice"], ["wip"]),
            extractor: StoryReferenceExtractor::standard()?,
            state_names: WorkflowStateNames::default(),
            scan_comments: false,
        };
        Ok(EventDispatcher::new(
            Arc::clone(&self.tracker),
            Arc::clone(&self.code_host),
            settings,
        ))
    }

    /// Resolves a workflow-state name to its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not part of the workflow.
    pub fn state_id(name: &str) -> Result<WorkflowStateId, eyre::Report> {
        STATES
            .iter()
            .find(|(_, state)| *state == name)
            .map(|&(id, _)| WorkflowStateId::new(id))
            .ok_or_else(|| eyre::eyre!("unknown workflow state {name}"))
    }
}

impl Default for StoryTransitionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> StoryTransitionWorld {
    StoryTransitionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
