//! Pull request coordinates on the code host.

use super::ReviewDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Owner, repository and number that identify a pull request.
///
/// # Examples
///
///     use storygate::review::domain::PullRequestLocator;
///
///     let locator = PullRequestLocator::from_url("https://github.com/acme/api/pull/42", 42)
///         .expect("valid pull request URL");
///     assert_eq!(locator.owner(), "acme");
///     assert_eq!(locator.repository(), "api");
///     assert_eq!(locator.to_string(), "acme/api#42");
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PullRequestLocator {
    owner: String,
    repository: String,
    number: u64,
}

impl PullRequestLocator {
    /// Creates a locator from validated parts.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::UnresolvedRepoReference`] when the owner
    /// or repository is blank or the number is zero.
    pub fn new(
        owner: impl Into<String>,
        repository: impl Into<String>,
        number: u64,
    ) -> Result<Self, ReviewDomainError> {
        let owner_value = owner.into();
        let repository_value = repository.into();
        if owner_value.trim().is_empty() || repository_value.trim().is_empty() || number == 0 {
            return Err(ReviewDomainError::UnresolvedRepoReference(format!(
                "{owner_value}/{repository_value}#{number}"
            )));
        }
        Ok(Self {
            owner: owner_value,
            repository: repository_value,
            number,
        })
    }

    /// Decomposes a pull request web URL such as
    /// `https://github.com/owner/repo/pull/42`.
    ///
    /// The owner and repository come from the URL path; `number` is the
    /// tracker's record of the pull request number.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::UnresolvedRepoReference`] when the URL is
    /// not an `http(s)` pull request URL.
    pub fn from_url(url: &str, number: u64) -> Result<Self, ReviewDomainError> {
        let unresolved = || ReviewDomainError::UnresolvedRepoReference(url.to_owned());
        let trimmed = url.trim();
        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .ok_or_else(unresolved)?;

        let mut segments = without_scheme.split('/');
        let _host = segments.next();
        let owner = segments.next().filter(|s| !s.is_empty()).ok_or_else(unresolved)?;
        let repository = segments.next().filter(|s| !s.is_empty()).ok_or_else(unresolved)?;
        if segments.next() != Some("pull") {
            return Err(unresolved());
        }

        Self::new(owner, repository, number).map_err(|_| unresolved())
    }

    /// Returns the repository owner.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the repository name.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the pull request number.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }
}

impl fmt::Display for PullRequestLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repository, self.number)
    }
}
