//! Service that aggregates review verdicts for every open pull request of a
//! story.

use crate::{
    review::{
        domain::{PrStatus, PullRequestLocator, ReviewDomainError, ReviewPolicy, StoryStats},
        ports::{CodeHost, CodeHostError},
    },
    story::{
        domain::{StoryId, StoryRecord},
        ports::{StoryTracker, TrackerError},
    },
};
use futures::future::try_join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised while aggregating story statistics.
#[derive(Debug, Error)]
pub enum StoryStatsError {
    /// The tracker has no story with this id.
    #[error("story {0} not found")]
    StoryNotFound(StoryId),

    /// The code host answered without a reviews container.
    #[error("couldn't get reviews for pull request {pull_request}")]
    ReviewFetchFailure {
        /// Pull request the reviews were requested for.
        pull_request: String,
    },

    /// A pull request reference could not be resolved.
    #[error(transparent)]
    Domain(#[from] ReviewDomainError),

    /// Tracker call failed.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// Code host call failed.
    #[error(transparent)]
    CodeHost(#[from] CodeHostError),
}

/// Result type for story statistics operations.
pub type StoryStatsResult<T> = Result<T, StoryStatsError>;

/// Story branch and review aggregation service.
#[derive(Clone)]
pub struct StoryStatsService<T, H>
where
    T: StoryTracker,
    H: CodeHost,
{
    tracker: Arc<T>,
    code_host: Arc<H>,
    policy: Arc<ReviewPolicy>,
}

impl<T, H> StoryStatsService<T, H>
where
    T: StoryTracker,
    H: CodeHost,
{
    /// Creates an aggregation service.
    #[must_use]
    pub const fn new(tracker: Arc<T>, code_host: Arc<H>, policy: Arc<ReviewPolicy>) -> Self {
        Self {
            tracker,
            code_host,
            policy,
        }
    }

    /// Computes branch counts and per pull request verdicts for a story.
    ///
    /// Review histories of all open pull requests are fetched concurrently;
    /// the first failure aborts the whole aggregation.
    ///
    /// # Errors
    ///
    /// Returns [`StoryStatsError::StoryNotFound`] for an unknown story,
    /// [`StoryStatsError::Domain`] when a pull request URL cannot be
    /// decomposed, and [`StoryStatsError::ReviewFetchFailure`] when the code
    /// host returns no reviews for a pull request.
    pub async fn collect(&self, story_id: StoryId) -> StoryStatsResult<StoryStats> {
        let story = self
            .tracker
            .fetch_story(story_id)
            .await?
            .ok_or(StoryStatsError::StoryNotFound(story_id))?;

        let (total_branches, open_pull_requests) = open_pull_requests(&story)?;
        let branches_with_open_prs = open_pull_requests.len();

        let statuses = try_join_all(
            open_pull_requests
                .iter()
                .map(|locator| self.assess_pull_request(locator)),
        )
        .await?;

        let stats = StoryStats {
            total_branches,
            branches_with_open_prs,
            open_pull_requests: statuses,
        };
        debug!(story = %story_id, ?stats, "story stats collected");
        Ok(stats)
    }

    async fn assess_pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> StoryStatsResult<PrStatus> {
        let reviews = self.code_host.fetch_reviews(locator).await?.ok_or_else(|| {
            StoryStatsError::ReviewFetchFailure {
                pull_request: locator.to_string(),
            }
        })?;
        debug!(pull_request = %locator, reviews = reviews.len(), "reviews fetched");
        Ok(PrStatus::assess(locator, reviews, &self.policy))
    }
}

/// Counts the story's live branches and locates every open pull request on
/// them.
fn open_pull_requests(
    story: &StoryRecord,
) -> Result<(usize, Vec<PullRequestLocator>), ReviewDomainError> {
    let mut total_branches = 0;
    let mut locators = Vec::new();
    for branch in story.branches.iter().filter(|branch| !branch.deleted) {
        total_branches += 1;
        for pull_request in branch.pull_requests.iter().filter(|pr| pr.is_open()) {
            locators.push(PullRequestLocator::from_url(
                &pull_request.url,
                pull_request.number,
            )?);
        }
    }
    Ok((total_branches, locators))
}
