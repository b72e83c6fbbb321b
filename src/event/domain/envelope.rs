//! Validated view of a pull request event payload.

use super::{EventError, PullRequestTrigger};
use crate::review::domain::PullRequestLocator;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct EventPayload {
    action: Option<String>,
    pull_request: Option<PullRequestPayload>,
    repository: Option<RepositoryPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    title: Option<String>,
    body: Option<String>,
    head: Option<HeadPayload>,
}

#[derive(Debug, Deserialize)]
struct HeadPayload {
    #[serde(rename = "ref")]
    reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    full_name: Option<String>,
}

/// Pull request event with its routing and story reference sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    trigger: PullRequestTrigger,
    locator: PullRequestLocator,
    title: String,
    body: String,
    head_ref: String,
}

impl PullRequestEvent {
    /// Validates a raw payload and routes it.
    ///
    /// The envelope is checked before routing: a missing payload, pull
    /// request or repository fails regardless of the event name.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidPayload`] for an incomplete payload and
    /// [`EventError::InvalidEventOrAction`] when no handler matches.
    pub fn parse(event_name: &str, payload: &Value) -> Result<Self, EventError> {
        if payload.is_null() {
            return Err(EventError::InvalidPayload("no payload".to_owned()));
        }
        let envelope = EventPayload::deserialize(payload)
            .map_err(|err| EventError::InvalidPayload(err.to_string()))?;
        let pull_request = envelope
            .pull_request
            .ok_or_else(|| EventError::InvalidPayload("no pull request in payload".to_owned()))?;
        let repository = envelope
            .repository
            .ok_or_else(|| EventError::InvalidPayload("no repository in payload".to_owned()))?;
        let locator = repository
            .full_name
            .as_deref()
            .and_then(|full_name| full_name.split_once('/'))
            .and_then(|(owner, name)| {
                PullRequestLocator::new(owner, name, pull_request.number).ok()
            })
            .ok_or_else(|| {
                EventError::InvalidPayload(
                    "couldn't get repo name or owner from payload".to_owned(),
                )
            })?;

        let trigger =
            PullRequestTrigger::route(event_name, envelope.action.as_deref().unwrap_or_default())?;

        Ok(Self {
            trigger,
            locator,
            title: pull_request.title.unwrap_or_default(),
            body: pull_request.body.unwrap_or_default(),
            head_ref: pull_request
                .head
                .and_then(|head| head.reference)
                .unwrap_or_default(),
        })
    }

    /// Returns the routed trigger.
    #[must_use]
    pub const fn trigger(&self) -> PullRequestTrigger {
        self.trigger
    }

    /// Returns the coordinates of the pull request that raised the event.
    #[must_use]
    pub const fn locator(&self) -> &PullRequestLocator {
        &self.locator
    }

    /// Returns the text scanned for story references: title, body and head
    /// branch name separated by spaces.
    #[must_use]
    pub fn reference_text(&self) -> String {
        format!("{} {} {}", self.title, self.body, self.head_ref)
    }
}
