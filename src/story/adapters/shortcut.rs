//! Shortcut REST adapter for the tracker port.

use async_trait::async_trait;
use reqwest::{StatusCode, header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::story::{
    domain::{
        LinkedPullRequest, StoryBranch, StoryId, StoryRecord, StoryUpdate, Workflow, WorkflowId,
        WorkflowState, WorkflowStateId,
    },
    ports::{StoryTracker, TrackerError, TrackerResult},
};

/// Base URL of the Shortcut v3 REST API.
pub const DEFAULT_SHORTCUT_API_URL: &str = "https://api.app.shortcut.com/api/v3";

const TOKEN_HEADER: &str = "Shortcut-Token";

/// Tracker adapter backed by the Shortcut REST API.
#[derive(Debug, Clone)]
pub struct ShortcutTracker {
    client: reqwest::Client,
    base_url: String,
}

impl ShortcutTracker {
    /// Creates a client authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] when the token is not a valid header value or
    /// the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, token: &str) -> TrackerResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("storygate"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let mut token_value =
            header::HeaderValue::from_str(token.trim()).map_err(TrackerError::transport)?;
        token_value.set_sensitive(true);
        headers.insert(TOKEN_HEADER, token_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(TrackerError::transport)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct StoryResponse {
    id: u64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    workflow_id: u64,
    workflow_state_id: u64,
    #[serde(default)]
    branches: Vec<BranchResponse>,
}

#[derive(Debug, Deserialize)]
struct BranchResponse {
    name: String,
    #[serde(default)]
    deleted: bool,
    #[serde(default)]
    pull_requests: Vec<PullRequestResponse>,
}

#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    number: u64,
    url: String,
    #[serde(default)]
    closed: bool,
    #[serde(default)]
    merged: bool,
}

#[derive(Debug, Deserialize)]
struct WorkflowResponse {
    id: u64,
    states: Vec<WorkflowStateResponse>,
}

#[derive(Debug, Deserialize)]
struct WorkflowStateResponse {
    id: u64,
    name: String,
}

#[derive(Debug, Serialize)]
struct UpdateStoryBody<'a> {
    workflow_state_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

impl From<StoryResponse> for StoryRecord {
    fn from(story: StoryResponse) -> Self {
        Self {
            id: StoryId::new(story.id),
            name: story.name,
            description: story.description.unwrap_or_default(),
            workflow_id: WorkflowId::new(story.workflow_id),
            workflow_state_id: WorkflowStateId::new(story.workflow_state_id),
            branches: story
                .branches
                .into_iter()
                .map(|branch| StoryBranch {
                    name: branch.name,
                    deleted: branch.deleted,
                    pull_requests: branch
                        .pull_requests
                        .into_iter()
                        .map(|pr| LinkedPullRequest {
                            number: pr.number,
                            url: pr.url,
                            closed: pr.closed,
                            merged: pr.merged,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl From<WorkflowResponse> for Workflow {
    fn from(workflow: WorkflowResponse) -> Self {
        Self {
            id: WorkflowId::new(workflow.id),
            states: workflow
                .states
                .into_iter()
                .map(|state| WorkflowState::new(WorkflowStateId::new(state.id), state.name))
                .collect(),
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    operation: &str,
    response: reqwest::Response,
) -> TrackerResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(TrackerError::Response(format!(
            "{operation} returned HTTP {status}"
        )));
    }
    response.json::<T>().await.map_err(TrackerError::transport)
}

#[async_trait]
impl StoryTracker for ShortcutTracker {
    async fn fetch_story(&self, id: StoryId) -> TrackerResult<Option<StoryRecord>> {
        let response = self
            .client
            .get(self.url(&format!("/stories/{id}")))
            .send()
            .await
            .map_err(TrackerError::transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(story = %id, "tracker reported story as missing");
            return Ok(None);
        }
        let story: StoryResponse = read_json("get story", response).await?;
        debug!(story = %id, branches = story.branches.len(), "fetched story");
        Ok(Some(story.into()))
    }

    async fn fetch_workflow(&self, id: WorkflowId) -> TrackerResult<Workflow> {
        let response = self
            .client
            .get(self.url(&format!("/workflows/{id}")))
            .send()
            .await
            .map_err(TrackerError::transport)?;
        let workflow: WorkflowResponse = read_json("get workflow", response).await?;
        debug!(workflow = %id, states = workflow.states.len(), "fetched workflow");
        Ok(workflow.into())
    }

    async fn update_story(&self, id: StoryId, update: &StoryUpdate) -> TrackerResult<StoryRecord> {
        let body = UpdateStoryBody {
            workflow_state_id: update.workflow_state_id.value(),
            description: update.description.as_deref(),
        };
        let response = self
            .client
            .put(self.url(&format!("/stories/{id}")))
            .json(&body)
            .send()
            .await
            .map_err(TrackerError::transport)?;
        let story: StoryResponse = read_json("update story", response).await?;
        debug!(story = %id, workflow_state = story.workflow_state_id, "updated story");
        Ok(story.into())
    }
}
