//! Domain model for incoming pull request events.

mod decision;
mod envelope;
mod error;

pub use decision::PullRequestTrigger;
pub use envelope::PullRequestEvent;
pub use error::EventError;
