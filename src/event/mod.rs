//! Pull request events from the code host.
//!
//! An event payload is validated and routed to a
//! [`domain::PullRequestTrigger`]; the [`services::EventDispatcher`] then
//! extracts story references, aggregates each story's review status and
//! applies the trigger's decision rules.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
