//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use eyre::WrapErr;
use rstest::fixture;
use storygate::{
    event::services::{DispatchSettings, EventDispatcher},
    review::{
        adapters::memory::InMemoryCodeHost,
        domain::{PullRequestLocator, ReviewPolicy, ReviewRecord},
    },
    story::{
        adapters::memory::InMemoryTracker,
        domain::{
            LinkedPullRequest, StoryBranch, StoryId, StoryRecord, StoryReferenceExtractor,
            Workflow, WorkflowId, WorkflowState, WorkflowStateId, WorkflowStateNames,
        },
    },
};

/// Workflow every test story belongs to.
pub const WORKFLOW: WorkflowId = WorkflowId::new(1);
/// Initial state of every test story.
pub const IN_DEVELOPMENT: WorkflowStateId = WorkflowStateId::new(10);
/// State for stories waiting on QA.
pub const FEATURE_QA: WorkflowStateId = WorkflowStateId::new(11);
/// State for stories QA has rejected.
pub const TEST_FAIL: WorkflowStateId = WorkflowStateId::new(14);
/// State targeted by releases.
pub const DONE: WorkflowStateId = WorkflowStateId::new(15);

/// Login on the QA allowlist.
pub const QA_LOGIN: &str = "qa-alice";

/// Tracker and code host shared by a test.
pub struct Backends {
    pub tracker: Arc<InMemoryTracker>,
    pub code_host: Arc<InMemoryCodeHost>,
}

impl Backends {
    /// Builds a dispatcher over these backends with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the default story prefixes fail to compile.
    pub fn dispatcher(
        &self,
    ) -> Result<EventDispatcher<InMemoryTracker, InMemoryCodeHost>, eyre::Report> {
        let settings = DispatchSettings {
            policy: ReviewPolicy::new([QA_LOGIN], ["wip"]),
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

    /// Stores a story with one live branch per open pull request number.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker rejects the story.
    pub fn add_story(&self, id: u64, pull_requests: &[u64]) -> Result<(), eyre::Report> {
        let branches = pull_requests
            .iter()
            .map(|&number| {
                StoryBranch::new(
                    format!("sc-{id}-{number}"),
                    vec![LinkedPullRequest::open(number, pr_url(number))],
                )
            })
            .collect();
        self.tracker
            .insert_story(StoryRecord {
                id: StoryId::new(id),
                name: format!("Story {id}"),
                description: String::new(),
                workflow_id: WORKFLOW,
                workflow_state_id: IN_DEVELOPMENT,
                branches,
            })
            .wrap_err("store story")
    }

    /// Sets the review history of a pull request in `acme/shop`.
    ///
    /// # Errors
    ///
    /// Returns an error if the code host rejects the reviews.
    pub fn set_reviews(&self, number: u64, reviews: Vec<ReviewRecord>) -> Result<(), eyre::Report> {
        let locator = PullRequestLocator::new("acme", "shop", number)?;
        self.code_host
            .set_reviews(locator, reviews)
            .wrap_err("store reviews")
    }

    /// Returns the current workflow state of a story.
    ///
    /// # Errors
    ///
    /// Returns an error if the story is missing.
    pub fn state_of(&self, id: u64) -> Result<WorkflowStateId, eyre::Report> {
        let story = self
            .tracker
            .story(StoryId::new(id))?
            .ok_or_else(|| eyre::eyre!("story {id} missing"))?;
        Ok(story.workflow_state_id)
    }
}

/// Provides backends with the standard workflow loaded.
///
/// # Errors
///
/// Returns an error if the workflow cannot be stored.
#[fixture]
pub fn backends() -> Result<Backends, eyre::Report> {
    let tracker = Arc::new(InMemoryTracker::new());
    tracker.insert_workflow(Workflow {
        id: WORKFLOW,
        states: vec![
            WorkflowState::new(IN_DEVELOPMENT, "In Development"),
            WorkflowState::new(FEATURE_QA, "Ready for Feature QA"),
            WorkflowState::new(WorkflowStateId::new(12), "Ready for Code Review"),
            WorkflowState::new(WorkflowStateId::new(13), "Ready for Staging"),
            WorkflowState::new(TEST_FAIL, "Test Fail"),
            WorkflowState::new(DONE, "Done"),
        ],
    })?;
    Ok(Backends {
        tracker,
        code_host: Arc::new(InMemoryCodeHost::new()),
    })
}

/// Web URL of pull request `number` in `acme/shop`.
#[must_use]
pub fn pr_url(number: u64) -> String {
    format!("https://github.com/acme/shop/pull/{number}")
}

/// Builds a pull request event payload for `acme/shop#1`.
#[must_use]
pub fn pull_request_event(action: &str, title: &str) -> serde_json::Value {
    serde_json::json!({
        "action": action,
        "repository": { "full_name": "acme/shop" },
        "pull_request": {
            "number": 1,
            "title": title,
            "body": null,
            "head": { "ref": "feature/checkout" }
        }
    })
}
