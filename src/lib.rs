//! Storygate: pull request driven story workflow automation.
//!
//! This crate reacts to pull request activity on GitHub and moves the linked
//! Shortcut stories through their workflow. Story references are found in
//! pull request text, the review state of every open pull request on a
//! story's branches is reduced to per-PR verdicts, and ordered decision
//! rules pick the workflow state the story should move to.
//!
//! # Architecture
//!
//! Storygate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the tracker and the code host
//! - **Adapters**: Concrete implementations of ports (Shortcut, GitHub,
//!   in-memory)
//!
//! # Modules
//!
//! - [`story`]: Story references, tracker records and workflow transitions
//! - [`review`]: Review verdicts, story statistics and decision rules
//! - [`event`]: Event validation, routing and dispatch
//! - [`config`]: Action inputs read from the environment

pub mod config;
pub mod event;
pub mod review;
pub mod story;
