//! Configuration loaded from GitHub Action inputs.
//!
//! Action inputs reach the process as `INPUT_*` environment variables. Both
//! loaders accept any lookup function so tests never touch the process
//! environment.

use crate::{
    event::services::DispatchSettings,
    review::{
        adapters::github::DEFAULT_GITHUB_GRAPHQL_URL,
        domain::{DEFAULT_WIP_TERMS, ReviewPolicy},
    },
    story::{
        adapters::shortcut::DEFAULT_SHORTCUT_API_URL,
        domain::{DEFAULT_STORY_PREFIXES, StoryReferenceExtractor, WorkflowStateNames},
    },
};
use std::fmt;
use thiserror::Error;

const GITHUB_TOKEN: &str = "INPUT_GITHUBTOKENORG";
const SHORTCUT_TOKEN: &str = "INPUT_CLUBHOUSETOKEN";
const QA_USERNAMES: &str = "INPUT_QAUSERNAMES";
const WIP_TERMS: &str = "INPUT_WIPTERMS";
const STORY_PREFIXES: &str = "INPUT_STORYPREFIXES";
const READY_FEATURE_QA_STATE: &str = "INPUT_READYFORFEATUREQASTATE";
const READY_CODE_REVIEW_STATE: &str = "INPUT_READYFORCODEREVIEWSTATE";
const READY_STAGING_STATE: &str = "INPUT_READYFORSTAGINGSTATE";
const TEST_FAIL_STATE: &str = "INPUT_TESTFAILSTATE";
const SCAN_COMMENTS: &str = "INPUT_SCANCOMMENTS";
const RELEASE_STATE: &str = "INPUT_RELEASESTATE";
const UPDATE_DESCRIPTION: &str = "INPUT_UPDATEDESCRIPTION";
const GITHUB_GRAPHQL_URL: &str = "GITHUB_GRAPHQL_URL";
const SHORTCUT_API_URL: &str = "INPUT_SHORTCUTAPIURL";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required token is absent or blank.
    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),

    /// A variable is set to a value that cannot be used.
    #[error("invalid value for {name}: {reason}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// API tokens for the code host and the tracker.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// GitHub token used for GraphQL queries.
    pub github_token: String,
    /// Shortcut API token.
    pub shortcut_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("github_token", &"<redacted>")
            .field("shortcut_token", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Reads credentials from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] naming the first absent
    /// token.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads credentials through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] naming the first absent
    /// token.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let require = |name: &'static str| {
            non_blank(lookup(name)).ok_or(ConfigError::MissingCredential(name))
        };
        Ok(Self {
            github_token: require(GITHUB_TOKEN)?,
            shortcut_token: require(SHORTCUT_TOKEN)?,
        })
    }
}

/// Everything the automation needs besides credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationConfig {
    /// Reviewer logins treated as QA.
    pub qa_usernames: Vec<String>,
    /// Commit message terms that mark work in progress.
    pub wip_terms: Vec<String>,
    /// Two-letter story reference prefixes.
    pub story_prefixes: Vec<String>,
    /// Tracker state names for each workflow target.
    pub state_names: WorkflowStateNames,
    /// Whether pull request comments are scanned for story references.
    pub scan_comments: bool,
    /// Target state for the release flow.
    pub release_state: Option<String>,
    /// Whether the release flow amends story descriptions.
    pub update_description: bool,
    /// GitHub GraphQL endpoint.
    pub github_graphql_url: String,
    /// Shortcut REST API base URL.
    pub shortcut_api_url: String,
}

impl AutomationConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for malformed booleans or story
    /// prefixes.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, applying defaults for
    /// absent or blank variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for malformed booleans or story
    /// prefixes.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let text = |name: &str, default: &str| {
            non_blank(lookup(name)).unwrap_or_else(|| default.to_owned())
        };
        let defaults = WorkflowStateNames::default();

        let story_prefixes = list(lookup(STORY_PREFIXES))
            .unwrap_or_else(|| DEFAULT_STORY_PREFIXES.map(str::to_owned).to_vec());
        if let Some(prefix) = story_prefixes
            .iter()
            .find(|prefix| prefix.len() != 2 || !prefix.chars().all(|c| c.is_ascii_alphabetic()))
        {
            return Err(ConfigError::InvalidValue {
                name: STORY_PREFIXES,
                reason: format!("{prefix:?} is not a two-letter code"),
            });
        }

        Ok(Self {
            qa_usernames: list(lookup(QA_USERNAMES)).unwrap_or_default(),
            wip_terms: list(lookup(WIP_TERMS))
                .unwrap_or_else(|| DEFAULT_WIP_TERMS.map(str::to_owned).to_vec()),
            story_prefixes,
            state_names: WorkflowStateNames {
                ready_feature_qa: text(READY_FEATURE_QA_STATE, &defaults.ready_feature_qa),
                ready_code_review: text(READY_CODE_REVIEW_STATE, &defaults.ready_code_review),
                ready_staging: text(READY_STAGING_STATE, &defaults.ready_staging),
                test_fail: text(TEST_FAIL_STATE, &defaults.test_fail),
            },
            scan_comments: flag(SCAN_COMMENTS, lookup(SCAN_COMMENTS))?,
            release_state: non_blank(lookup(RELEASE_STATE)),
            update_description: flag(UPDATE_DESCRIPTION, lookup(UPDATE_DESCRIPTION))?,
            github_graphql_url: text(GITHUB_GRAPHQL_URL, DEFAULT_GITHUB_GRAPHQL_URL),
            shortcut_api_url: text(SHORTCUT_API_URL, DEFAULT_SHORTCUT_API_URL),
        })
    }

    /// Builds the review policy from the QA allowlist and WIP terms.
    #[must_use]
    pub fn review_policy(&self) -> ReviewPolicy {
        ReviewPolicy::new(self.qa_usernames.clone(), self.wip_terms.clone())
    }

    /// Compiles the story reference extractor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the prefixes are rejected.
    pub fn reference_extractor(&self) -> ConfigResult<StoryReferenceExtractor> {
        StoryReferenceExtractor::new(&self.story_prefixes).map_err(|err| {
            ConfigError::InvalidValue {
                name: STORY_PREFIXES,
                reason: err.to_string(),
            }
        })
    }

    /// Assembles the settings for the event dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the prefixes are rejected.
    pub fn dispatch_settings(&self) -> ConfigResult<DispatchSettings> {
        Ok(DispatchSettings {
            policy: self.review_policy(),
            extractor: self.reference_extractor()?,
            state_names: self.state_names.clone(),
            scan_comments: self.scan_comments,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

fn list(value: Option<String>) -> Option<Vec<String>> {
    non_blank(value).map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()
    })
}

fn flag(name: &'static str, value: Option<String>) -> ConfigResult<bool> {
    let Some(raw) = non_blank(value) else {
        return Ok(false);
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            reason: format!("expected true or false, got {raw:?}"),
        }),
    }
}
