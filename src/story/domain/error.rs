//! Error types for story domain construction.

use thiserror::Error;

/// Errors returned while constructing story domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoryDomainError {
    /// A story reference prefix is not a two-letter short code.
    #[error("invalid story prefix '{0}', expected two ASCII letters")]
    InvalidPrefix(String),

    /// The release-info description template failed to render.
    #[error("failed to render release description: {0}")]
    InvalidDescriptionTemplate(String),
}
