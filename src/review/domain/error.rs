//! Error types for review domain values.

use thiserror::Error;

/// Errors returned while constructing review domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewDomainError {
    /// A pull request URL could not be split into owner, repository and
    /// number.
    #[error("cannot resolve repository from pull request reference '{0}'")]
    UnresolvedRepoReference(String),
}
