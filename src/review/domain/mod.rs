//! Domain model for pull request reviews.
//!
//! Raw review history from the code host is reduced to verdicts per pull
//! request, aggregated per story, and tested against decision rules. Nothing
//! here performs I/O.

mod error;
mod locator;
mod policy;
mod rules;
mod status;
mod verdict;

pub use error::ReviewDomainError;
pub use locator::PullRequestLocator;
pub use policy::{DEFAULT_WIP_TERMS, ReviewPolicy};
pub use rules::DecisionRule;
pub use status::{PrStatus, StoryStats};
pub use verdict::{CommitSnapshot, ReviewRecord, ReviewState, Verdict, classify_review};
