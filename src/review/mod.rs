//! Pull request reviews and their reduction to story-level verdicts.
//!
//! Review histories are read from the code host through the
//! [`ports::CodeHost`] port, classified into [`domain::Verdict`] values per
//! pull request, and aggregated per story by
//! [`services::StoryStatsService`]. Decision rules over the aggregate live
//! in [`domain::DecisionRule`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
