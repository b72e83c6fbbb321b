//! Predicates over the review status of a story's open pull requests.

use super::{PrStatus, Verdict};

/// Condition evaluated over every open pull request of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionRule {
    /// QA and engineering both approved every pull request.
    AllOk,
    /// QA approved every pull request.
    AllQaOk,
    /// Engineering approved every pull request.
    AllEngineeringOk,
    /// QA rejected at least one pull request.
    AnyQaFail,
    /// The latest QA review of some pull request is a rejection and that
    /// pull request's latest commit is not WIP.
    AnyQaFreshFailNotWip,
}

impl DecisionRule {
    /// Evaluates the rule. Rules over "every" pull request hold for an empty
    /// list.
    #[must_use]
    pub fn holds(self, pull_requests: &[PrStatus]) -> bool {
        match self {
            Self::AllOk => pull_requests
                .iter()
                .all(|pr| pr.qa_status == Verdict::Ok && pr.engineer_status == Verdict::Ok),
            Self::AllQaOk => pull_requests.iter().all(|pr| pr.qa_status == Verdict::Ok),
            Self::AllEngineeringOk => pull_requests
                .iter()
                .all(|pr| pr.engineer_status == Verdict::Ok),
            Self::AnyQaFail => pull_requests.iter().any(|pr| pr.qa_status == Verdict::Fail),
            Self::AnyQaFreshFailNotWip => pull_requests
                .iter()
                .any(|pr| pr.qa_status_latest == Verdict::Fail && !pr.is_latest_commit_wip),
        }
    }
}
