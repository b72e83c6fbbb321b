//! Port for the code host that stores pull request reviews.

use crate::review::domain::{PullRequestLocator, ReviewRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for code host operations.
pub type CodeHostResult<T> = Result<T, CodeHostError>;

/// Maximum number of reviews or comments fetched per pull request.
pub const PULL_REQUEST_PAGE_SIZE: usize = 50;

/// Read access to pull request reviews and comments.
#[async_trait]
pub trait CodeHost: Send + Sync {
    /// Fetches up to [`PULL_REQUEST_PAGE_SIZE`] of the most recent reviews.
    ///
    /// Each review carries the pull request's latest commit at fetch time.
    /// Returns `None` when the response has no reviews container.
    async fn fetch_reviews(
        &self,
        pull_request: &PullRequestLocator,
    ) -> CodeHostResult<Option<Vec<ReviewRecord>>>;

    /// Fetches the bodies of up to [`PULL_REQUEST_PAGE_SIZE`] comments.
    async fn fetch_comments(&self, pull_request: &PullRequestLocator)
    -> CodeHostResult<Vec<String>>;
}

/// Errors returned by code host adapters.
#[derive(Debug, Clone, Error)]
pub enum CodeHostError {
    /// The request could not be sent or its body could not be read.
    #[error("code host transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The code host answered with an error or an unexpected shape.
    #[error("unexpected code host response: {0}")]
    Response(String),
}

impl CodeHostError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
