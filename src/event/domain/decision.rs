//! Event routing and the per-event choice of target workflow state.

use super::EventError;
use crate::{
    review::domain::{DecisionRule, StoryStats},
    story::domain::TargetState,
};

/// Pull request activity that can move a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PullRequestTrigger {
    /// A pull request was opened or reopened.
    Opened,
    /// A review was submitted, edited or dismissed.
    Reviewed,
    /// New commits were pushed to the pull request.
    Synchronized,
}

impl PullRequestTrigger {
    /// Routes an event name and payload action to a trigger.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidEventOrAction`] for any combination
    /// without a handler.
    pub fn route(event: &str, action: &str) -> Result<Self, EventError> {
        match (event, action) {
            ("pull_request", "synchronize") => Ok(Self::Synchronized),
            ("pull_request", "opened" | "reopened") => Ok(Self::Opened),
            ("pull_request_review", _) => Ok(Self::Reviewed),
            _ => Err(EventError::InvalidEventOrAction {
                event: event.to_owned(),
                action: action.to_owned(),
            }),
        }
    }

    /// Picks the workflow target for a story, or `None` to leave it alone.
    ///
    /// Nothing fires unless the story is fully gated. Rules are tried in
    /// priority order and the first that holds wins.
    #[must_use]
    pub fn decide(self, stats: &StoryStats) -> Option<TargetState> {
        if !stats.is_fully_gated() {
            return None;
        }
        let pull_requests = stats.open_pull_requests.as_slice();
        match self {
            Self::Opened => Some(TargetState::ReadyFeatureQa),
            Self::Reviewed => [
                (DecisionRule::AllOk, TargetState::ReadyStaging),
                (DecisionRule::AllQaOk, TargetState::ReadyCodeReview),
                (DecisionRule::AnyQaFail, TargetState::TestFail),
            ]
            .into_iter()
            .find(|(rule, _)| rule.holds(pull_requests))
            .map(|(_, target)| target),
            Self::Synchronized => DecisionRule::AnyQaFreshFailNotWip
                .holds(pull_requests)
                .then_some(TargetState::ReadyFeatureQa),
        }
    }
}
