//! Unit tests for the story module.
//!
//! Covers reference extraction, release-note amendment, the transition
//! service against in-memory and mocked trackers, and the Shortcut adapter
//! against a mock HTTP server.
