//! Release-info amendment for story descriptions.

use super::StoryDomainError;
use minijinja::{Environment, context};

/// Heading that marks a description as already carrying release info.
const RELEASE_INFO_MARKER: &str = "Release Info";

const RELEASE_SECTION_TEMPLATE: &str = "\n\n### Release Info\n{{ release_url }}\n";

/// Link to the release that shipped a story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNote {
    url: String,
}

impl ReleaseNote {
    /// Creates a release note pointing at `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Returns the description with a release section appended.
    ///
    /// Returns `Ok(None)` when the description already has release info, so
    /// repeated releases never stack sections.
    ///
    /// # Errors
    ///
    /// Returns [`StoryDomainError::InvalidDescriptionTemplate`] when the
    /// release section fails to render.
    pub fn amend(&self, description: &str) -> Result<Option<String>, StoryDomainError> {
        if description.contains(RELEASE_INFO_MARKER) {
            return Ok(None);
        }
        let mut environment = Environment::new();
        environment.set_keep_trailing_newline(true);
        let section = environment
            .render_str(RELEASE_SECTION_TEMPLATE, context! { release_url => &self.url })
            .map_err(|err| StoryDomainError::InvalidDescriptionTemplate(err.to_string()))?;
        Ok(Some(format!("{description}{section}")))
    }
}
