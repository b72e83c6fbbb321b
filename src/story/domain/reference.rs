//! Story reference scanning for free text such as pull request titles.

use super::{StoryDomainError, StoryId};
use regex::Regex;
use std::collections::HashSet;

/// Short codes recognised in front of story numbers when none are configured.
pub const DEFAULT_STORY_PREFIXES: [&str; 2] = ["sc", "ch"];

/// Finds story ids embedded in text.
///
/// A reference is one of the configured two-letter short codes, an optional
/// hyphen, and a run of one to seven digits, matched case-insensitively.
/// `sc-123`, `SC123` and `ch-123` all reference story `123`.
///
/// # Examples
///
///     use storygate::story::domain::{StoryId, StoryReferenceExtractor};
///
///     let extractor = StoryReferenceExtractor::standard().expect("valid prefixes");
///     let ids = extractor.extract("sc-123 mentions ch123 again");
///     assert_eq!(ids, vec![StoryId::new(123)]);
#[derive(Debug, Clone)]
pub struct StoryReferenceExtractor {
    pattern: Regex,
}

impl StoryReferenceExtractor {
    /// Compiles an extractor for the given short codes.
    ///
    /// # Errors
    ///
    /// Returns [`StoryDomainError::InvalidPrefix`] when no prefix is given or
    /// a prefix is not exactly two ASCII letters.
    pub fn new<I, S>(prefixes: I) -> Result<Self, StoryDomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut alternatives = Vec::new();
        for prefix in prefixes {
            let normalized = prefix.as_ref().trim();
            if normalized.len() != 2 || !normalized.chars().all(|ch| ch.is_ascii_alphabetic()) {
                return Err(StoryDomainError::InvalidPrefix(normalized.to_owned()));
            }
            alternatives.push(regex::escape(&normalized.to_ascii_lowercase()));
        }
        if alternatives.is_empty() {
            return Err(StoryDomainError::InvalidPrefix(String::new()));
        }

        let source = format!(r"(?i)(?:{})-?(\d{{1,7}})", alternatives.join("|"));
        let pattern =
            Regex::new(&source).map_err(|err| StoryDomainError::InvalidPrefix(err.to_string()))?;
        Ok(Self { pattern })
    }

    /// Compiles an extractor for [`DEFAULT_STORY_PREFIXES`].
    ///
    /// # Errors
    ///
    /// Returns [`StoryDomainError::InvalidPrefix`] only if the built-in
    /// prefixes fail to compile.
    pub fn standard() -> Result<Self, StoryDomainError> {
        Self::new(DEFAULT_STORY_PREFIXES)
    }

    /// Returns every distinct story id referenced in `content`, in order of
    /// first appearance.
    #[must_use]
    pub fn extract(&self, content: &str) -> Vec<StoryId> {
        let mut seen = HashSet::new();
        self.pattern
            .captures_iter(content)
            .filter_map(|captures| captures.get(1))
            .filter_map(|digits| digits.as_str().parse::<u64>().ok())
            .map(StoryId::new)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}
