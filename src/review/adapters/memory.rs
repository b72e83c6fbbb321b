//! In-memory code host for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::review::{
    domain::{PullRequestLocator, ReviewRecord},
    ports::{CodeHost, CodeHostError, CodeHostResult},
};

/// Thread-safe in-memory code host.
///
/// Pull requests without registered reviews answer with no reviews
/// container, the same as a code host that does not know the pull request.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCodeHost {
    state: Arc<RwLock<InMemoryCodeHostState>>,
}

#[derive(Debug, Default)]
struct InMemoryCodeHostState {
    reviews: HashMap<PullRequestLocator, Vec<ReviewRecord>>,
    comments: HashMap<PullRequestLocator, Vec<String>>,
}

fn lock_error(err: impl std::fmt::Display) -> CodeHostError {
    CodeHostError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryCodeHost {
    /// Creates an empty code host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the review history of a pull request.
    ///
    /// # Errors
    ///
    /// Returns [`CodeHostError::Transport`] when lock acquisition fails.
    pub fn set_reviews(
        &self,
        pull_request: PullRequestLocator,
        reviews: Vec<ReviewRecord>,
    ) -> CodeHostResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.reviews.insert(pull_request, reviews);
        Ok(())
    }

    /// Sets the comment bodies of a pull request.
    ///
    /// # Errors
    ///
    /// Returns [`CodeHostError::Transport`] when lock acquisition fails.
    pub fn set_comments(
        &self,
        pull_request: PullRequestLocator,
        comments: Vec<String>,
    ) -> CodeHostResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.comments.insert(pull_request, comments);
        Ok(())
    }
}

#[async_trait]
impl CodeHost for InMemoryCodeHost {
    async fn fetch_reviews(
        &self,
        pull_request: &PullRequestLocator,
    ) -> CodeHostResult<Option<Vec<ReviewRecord>>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.reviews.get(pull_request).cloned())
    }

    async fn fetch_comments(
        &self,
        pull_request: &PullRequestLocator,
    ) -> CodeHostResult<Vec<String>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .comments
            .get(pull_request)
            .cloned()
            .unwrap_or_default())
    }
}
