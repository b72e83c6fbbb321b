//! Review records and their normalized verdicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized outcome of the latest applicable review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The reviewer approved the current code.
    #[serde(rename = "OK")]
    Ok,
    /// The reviewer did not approve.
    #[serde(rename = "FAIL")]
    Fail,
    /// No review applies, or the review predates the latest commit.
    #[serde(rename = "NA")]
    NotApplicable,
}

impl Verdict {
    /// Returns the short display form (`OK`, `FAIL` or `NA`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Fail => "FAIL",
            Self::NotApplicable => "NA",
        }
    }
}

/// Review state as reported by the code host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Approved.
    Approved,
    /// Changes requested.
    ChangesRequested,
    /// Comment-only review.
    Commented,
    /// Review dismissed.
    Dismissed,
    /// Review not yet submitted.
    Pending,
    /// Any state this crate does not know about.
    #[serde(other)]
    Unknown,
}

/// Latest commit of a pull request at the time its reviews were fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSnapshot {
    /// Commit message.
    pub message: String,
    /// Commit timestamp, when the code host reports one.
    pub committed_date: Option<DateTime<Utc>>,
}

impl CommitSnapshot {
    /// Creates a commit snapshot.
    #[must_use]
    pub fn new(message: impl Into<String>, committed_date: Option<DateTime<Utc>>) -> Self {
        Self {
            message: message.into(),
            committed_date,
        }
    }
}

/// One submitted review on a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Reviewer login; `None` for deleted accounts.
    pub author: Option<String>,
    /// Review state.
    pub state: ReviewState,
    /// When the review was published.
    pub published_at: Option<DateTime<Utc>>,
    /// Why the review was hidden, if it was.
    pub minimized_reason: Option<String>,
    /// Latest commit on the pull request.
    pub latest_commit: Option<CommitSnapshot>,
}

impl ReviewRecord {
    /// Creates a review with no timestamps or commit.
    #[must_use]
    pub fn new(author: impl Into<String>, state: ReviewState) -> Self {
        Self {
            author: Some(author.into()),
            state,
            published_at: None,
            minimized_reason: None,
            latest_commit: None,
        }
    }

    /// Sets the publication time.
    #[must_use]
    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    /// Sets the latest commit.
    #[must_use]
    pub fn with_latest_commit(mut self, commit: CommitSnapshot) -> Self {
        self.latest_commit = Some(commit);
        self
    }

    /// Returns the latest commit message, or `""` when there is none.
    #[must_use]
    pub fn latest_commit_message(&self) -> &str {
        self.latest_commit
            .as_ref()
            .map_or("", |commit| commit.message.as_str())
    }

    /// Returns `true` when the latest commit is newer than the review.
    ///
    /// A commit without a date never makes a review stale. An undated review
    /// is stale against any dated commit.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        let Some(committed) = self
            .latest_commit
            .as_ref()
            .and_then(|commit| commit.committed_date)
        else {
            return false;
        };
        self.published_at
            .is_none_or(|published| published < committed)
    }
}

/// Classifies a review into a [`Verdict`].
///
/// With `ignore_time` unset, a review older than the pull request's latest
/// commit yields [`Verdict::NotApplicable`].
#[must_use]
pub fn classify_review(review: Option<&ReviewRecord>, ignore_time: bool) -> Verdict {
    let Some(review) = review else {
        return Verdict::NotApplicable;
    };
    if !ignore_time && review.is_stale() {
        return Verdict::NotApplicable;
    }
    if review.state == ReviewState::Approved {
        Verdict::Ok
    } else {
        Verdict::Fail
    }
}
