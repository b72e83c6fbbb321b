//! Service that turns a pull request event into story transitions.

use crate::{
    event::domain::{EventError, PullRequestEvent},
    review::{
        domain::ReviewPolicy,
        ports::{CodeHost, CodeHostError},
        services::{StoryStatsError, StoryStatsService},
    },
    story::{
        domain::{StoryId, StoryReferenceExtractor, WorkflowStateNames},
        ports::StoryTracker,
        services::{TransitionError, TransitionRequest, TransitionService},
    },
};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Read-only settings shared by every dispatch.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// QA allowlist and WIP bypass terms.
    pub policy: ReviewPolicy,
    /// Story reference pattern.
    pub extractor: StoryReferenceExtractor,
    /// Tracker state names for each workflow target.
    pub state_names: WorkflowStateNames,
    /// Whether pull request comments are scanned for story references.
    pub scan_comments: bool,
}

/// Errors raised while dispatching an event.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The event could not be validated or routed.
    #[error(transparent)]
    Event(#[from] EventError),

    /// Story statistics could not be collected.
    #[error(transparent)]
    Stats(#[from] StoryStatsError),

    /// A story transition failed.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Pull request comments could not be fetched.
    #[error(transparent)]
    CodeHost(#[from] CodeHostError),
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Pull request event dispatcher.
pub struct EventDispatcher<T, H>
where
    T: StoryTracker,
    H: CodeHost,
{
    code_host: Arc<H>,
    stats: StoryStatsService<T, H>,
    transitions: TransitionService<T>,
    extractor: StoryReferenceExtractor,
    state_names: WorkflowStateNames,
    scan_comments: bool,
}

impl<T, H> EventDispatcher<T, H>
where
    T: StoryTracker,
    H: CodeHost,
{
    /// Creates a dispatcher over the given tracker and code host.
    #[must_use]
    pub fn new(tracker: Arc<T>, code_host: Arc<H>, settings: DispatchSettings) -> Self {
        let DispatchSettings {
            policy,
            extractor,
            state_names,
            scan_comments,
        } = settings;
        Self {
            stats: StoryStatsService::new(
                Arc::clone(&tracker),
                Arc::clone(&code_host),
                Arc::new(policy),
            ),
            transitions: TransitionService::new(tracker),
            code_host,
            extractor,
            state_names,
            scan_comments,
        }
    }

    /// Handles one event and returns the stories it moved, in the order
    /// their references appear.
    ///
    /// Stories are processed one at a time: each is aggregated, decided and
    /// possibly transitioned before the next starts.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Event`] before any tracker call when the
    /// payload is invalid or the event/action has no handler. Any later
    /// failure aborts the dispatch.
    pub async fn dispatch(&self, event_name: &str, payload: &Value) -> DispatchResult<Vec<StoryId>> {
        let event = PullRequestEvent::parse(event_name, payload)?;
        let mut text = event.reference_text();
        if self.scan_comments {
            let comments = self.code_host.fetch_comments(event.locator()).await?;
            debug!(pull_request = %event.locator(), comments = comments.len(), "scanning comments");
            for comment in comments {
                text.push(' ');
                text.push_str(&comment);
            }
        }

        let story_ids = self.extractor.extract(&text);
        info!(
            trigger = ?event.trigger(),
            pull_request = %event.locator(),
            stories = ?story_ids,
            "dispatching pull request event"
        );

        let mut updated = Vec::new();
        for story_id in story_ids {
            let stats = self.stats.collect(story_id).await?;
            let Some(target) = event.trigger().decide(&stats) else {
                debug!(story = %story_id, ?stats, "no rule fired");
                continue;
            };
            debug!(story = %story_id, target = target.as_str(), "rule fired");
            let request =
                TransitionRequest::new([story_id], self.state_names.name_for(target));
            let report = self.transitions.transition(request).await?;
            updated.extend(report.transitioned_ids());
        }
        Ok(updated)
    }
}
