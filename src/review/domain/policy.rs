//! Reviewer classification and WIP detection settings.

use super::ReviewRecord;
use std::collections::HashSet;

/// Bypass terms used when none are configured.
pub const DEFAULT_WIP_TERMS: [&str; 1] = ["wip"];

/// Read-only settings that shape how reviews are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPolicy {
    qa_usernames: HashSet<String>,
    wip_terms: Vec<String>,
}

impl ReviewPolicy {
    /// Creates a policy from a QA allowlist and WIP bypass terms.
    ///
    /// Bypass terms are lowercased; blank entries are dropped.
    #[must_use]
    pub fn new<Q, W>(qa_usernames: Q, wip_terms: W) -> Self
    where
        Q: IntoIterator,
        Q::Item: Into<String>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        Self {
            qa_usernames: qa_usernames.into_iter().map(Into::into).collect(),
            wip_terms: wip_terms
                .into_iter()
                .map(|term| term.as_ref().trim().to_lowercase())
                .filter(|term| !term.is_empty())
                .collect(),
        }
    }

    /// Returns `true` when `author` is on the QA allowlist.
    #[must_use]
    pub fn is_qa_author(&self, author: Option<&str>) -> bool {
        author.is_some_and(|login| self.qa_usernames.contains(login))
    }

    /// Returns `true` when `message` contains any bypass term,
    /// case-insensitively.
    #[must_use]
    pub fn is_wip_message(&self, message: &str) -> bool {
        if message.is_empty() {
            return false;
        }
        let lowered = message.to_lowercase();
        self.wip_terms.iter().any(|term| lowered.contains(term))
    }

    /// Returns `true` when the commit attached to `review` is marked WIP.
    #[must_use]
    pub fn is_latest_commit_wip(&self, review: Option<&ReviewRecord>) -> bool {
        review.is_some_and(|review| self.is_wip_message(review.latest_commit_message()))
    }
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self::new(Vec::<String>::new(), DEFAULT_WIP_TERMS)
    }
}
