//! Per-pull-request review status and per-story aggregates.

use super::{PullRequestLocator, ReviewPolicy, ReviewRecord, Verdict, classify_review};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Review status of one open pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrStatus {
    /// Pull request number.
    pub number: u64,
    /// Repository name, without owner.
    pub repository: String,
    /// Verdict of the latest QA review, stale reviews excluded.
    pub qa_status: Verdict,
    /// Verdict of the latest QA review, regardless of staleness.
    pub qa_status_latest: Verdict,
    /// Verdict of the latest non-QA review, stale reviews excluded.
    pub engineer_status: Verdict,
    /// Whether the latest commit carries a WIP bypass term.
    pub is_latest_commit_wip: bool,
}

impl PrStatus {
    /// Creates a status with explicit verdicts.
    #[must_use]
    pub fn new(
        locator: &PullRequestLocator,
        qa_status: Verdict,
        qa_status_latest: Verdict,
        engineer_status: Verdict,
    ) -> Self {
        Self {
            number: locator.number(),
            repository: locator.repository().to_owned(),
            qa_status,
            qa_status_latest,
            engineer_status,
            is_latest_commit_wip: false,
        }
    }

    /// Sets the WIP flag.
    #[must_use]
    pub fn with_wip(mut self, is_latest_commit_wip: bool) -> Self {
        self.is_latest_commit_wip = is_latest_commit_wip;
        self
    }

    /// Derives the status of a pull request from its review history.
    ///
    /// Reviews are ordered newest first; the first review by a QA author and
    /// the first by anyone else are the ones classified. The WIP flag comes
    /// from the QA review's commit when there is one.
    #[must_use]
    pub fn assess(
        locator: &PullRequestLocator,
        mut reviews: Vec<ReviewRecord>,
        policy: &ReviewPolicy,
    ) -> Self {
        reviews.sort_by_key(|review| Reverse(review.published_at));

        let latest_qa_review = reviews
            .iter()
            .find(|review| policy.is_qa_author(review.author.as_deref()));
        let latest_non_qa_review = reviews
            .iter()
            .find(|review| !policy.is_qa_author(review.author.as_deref()));

        Self::new(
            locator,
            classify_review(latest_qa_review, false),
            classify_review(latest_qa_review, true),
            classify_review(latest_non_qa_review, false),
        )
        .with_wip(policy.is_latest_commit_wip(latest_qa_review.or(latest_non_qa_review)))
    }
}

/// Branch and pull request completeness of one story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryStats {
    /// Non-deleted branches linked to the story.
    pub total_branches: usize,
    /// Open pull requests across the non-deleted branches.
    pub branches_with_open_prs: usize,
    /// Status of each open pull request.
    pub open_pull_requests: Vec<PrStatus>,
}

impl StoryStats {
    /// Returns `true` when the branch count equals the open pull request
    /// count, the precondition for any decision rule.
    ///
    /// A branch with two open pull requests counts twice on the pull request
    /// side, so such a story is not fully gated.
    #[must_use]
    pub const fn is_fully_gated(&self) -> bool {
        self.total_branches == self.branches_with_open_prs
    }
}
