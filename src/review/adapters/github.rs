//! GitHub GraphQL adapter for the code host port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::review::{
    domain::{CommitSnapshot, PullRequestLocator, ReviewRecord, ReviewState},
    ports::{CodeHost, CodeHostError, CodeHostResult, PULL_REQUEST_PAGE_SIZE},
};

/// GitHub's public GraphQL endpoint.
pub const DEFAULT_GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

const PULL_REQUEST_REVIEWS_QUERY: &str = r"
query($name: String!, $owner: String!, $pull_number: Int!, $page_size: Int!) {
  repository(name: $name, owner: $owner) {
    pullRequest(number: $pull_number) {
      reviews(last: $page_size) {
        totalCount
        nodes {
          state
          publishedAt
          minimizedReason
          pullRequest {
            commits(last: 1) {
              nodes {
                commit {
                  message
                  committedDate
                }
              }
            }
          }
          author {
            login
          }
        }
      }
    }
  }
}
";

const PULL_REQUEST_COMMENTS_QUERY: &str = r"
query($name: String!, $owner: String!, $pull_number: Int!, $page_size: Int!) {
  repository(name: $name, owner: $owner) {
    pullRequest(number: $pull_number) {
      comments(first: $page_size) {
        nodes {
          body
        }
      }
    }
  }
}
";

/// Code host adapter backed by the GitHub GraphQL API.
#[derive(Debug, Clone)]
pub struct GithubCodeHost {
    client: reqwest::Client,
    endpoint: String,
}

impl GithubCodeHost {
    /// Creates a client that authenticates with a bearer `token`.
    ///
    /// # Errors
    ///
    /// Returns [`CodeHostError`] when the token is not a valid header value or
    /// the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, token: &str) -> CodeHostResult<Self> {
        let headers = graphql_headers(token)?;
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(CodeHostError::transport)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        pull_request: &PullRequestLocator,
    ) -> CodeHostResult<Option<T>> {
        let request = GraphqlRequest {
            query,
            variables: PullRequestVariables {
                name: pull_request.repository(),
                owner: pull_request.owner(),
                pull_number: pull_request.number(),
                page_size: PULL_REQUEST_PAGE_SIZE,
            },
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(CodeHostError::transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(CodeHostError::Response(format!(
                "GraphQL query for {pull_request} returned HTTP {status}"
            )));
        }
        let body: GraphqlResponse<T> = response.json().await.map_err(CodeHostError::transport)?;
        if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|error| error.message).collect();
            return Err(CodeHostError::Response(messages.join("; ")));
        }
        Ok(body.data)
    }
}

/// Builds the default headers sent with every GraphQL request.
pub(crate) fn graphql_headers(token: &str) -> CodeHostResult<header::HeaderMap> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_static("storygate"),
    );
    let mut auth_value = header::HeaderValue::from_str(&format!("Bearer {}", token.trim()))
        .map_err(CodeHostError::transport)?;
    auth_value.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, auth_value);
    Ok(headers)
}

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: PullRequestVariables<'a>,
}

#[derive(Debug, Serialize)]
struct PullRequestVariables<'a> {
    name: &'a str,
    owner: &'a str,
    pull_number: u64,
    page_size: usize,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryData<P> {
    repository: Option<PullRequestData<P>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestData<P> {
    pull_request: Option<P>,
}

#[derive(Debug, Deserialize)]
struct ReviewsData {
    reviews: Option<Connection<ReviewNode>>,
}

#[derive(Debug, Deserialize)]
struct CommentsData {
    comments: Option<Connection<CommentNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "N: Deserialize<'de>"))]
struct Connection<N> {
    #[serde(default)]
    nodes: Vec<Option<N>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewNode {
    state: ReviewState,
    published_at: Option<DateTime<Utc>>,
    minimized_reason: Option<String>,
    pull_request: Option<ReviewPullRequest>,
    author: Option<Author>,
}

#[derive(Debug, Deserialize)]
struct ReviewPullRequest {
    commits: Option<Connection<CommitNode>>,
}

#[derive(Debug, Deserialize)]
struct CommitNode {
    commit: Option<Commit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Commit {
    #[serde(default)]
    message: String,
    committed_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct Author {
    login: String,
}

#[derive(Debug, Deserialize)]
struct CommentNode {
    #[serde(default)]
    body: String,
}

impl From<ReviewNode> for ReviewRecord {
    fn from(node: ReviewNode) -> Self {
        let latest_commit = node
            .pull_request
            .and_then(|pr| pr.commits)
            .and_then(|commits| commits.nodes.into_iter().flatten().next())
            .and_then(|commit_node| commit_node.commit)
            .map(|commit| CommitSnapshot::new(commit.message, commit.committed_date));
        Self {
            author: node.author.map(|author| author.login),
            state: node.state,
            published_at: node.published_at,
            minimized_reason: node.minimized_reason,
            latest_commit,
        }
    }
}

#[async_trait]
impl CodeHost for GithubCodeHost {
    async fn fetch_reviews(
        &self,
        pull_request: &PullRequestLocator,
    ) -> CodeHostResult<Option<Vec<ReviewRecord>>> {
        let response: Option<RepositoryData<ReviewsData>> =
            self.query(PULL_REQUEST_REVIEWS_QUERY, pull_request).await?;
        let reviews = response
            .and_then(|data| data.repository)
            .and_then(|repository| repository.pull_request)
            .and_then(|pr| pr.reviews)
            .map(|reviews| {
                reviews
                    .nodes
                    .into_iter()
                    .flatten()
                    .map(ReviewRecord::from)
                    .collect::<Vec<_>>()
            });
        debug!(
            pull_request = %pull_request,
            reviews = reviews.as_ref().map(Vec::len),
            "fetched pull request reviews"
        );
        Ok(reviews)
    }

    async fn fetch_comments(
        &self,
        pull_request: &PullRequestLocator,
    ) -> CodeHostResult<Vec<String>> {
        let response: Option<RepositoryData<CommentsData>> =
            self.query(PULL_REQUEST_COMMENTS_QUERY, pull_request).await?;
        let comments = response
            .and_then(|data| data.repository)
            .and_then(|repository| repository.pull_request)
            .and_then(|pr| pr.comments)
            .ok_or_else(|| {
                CodeHostError::Response(format!("couldn't get comments for {pull_request}"))
            })?;
        Ok(comments
            .nodes
            .into_iter()
            .flatten()
            .map(|comment| comment.body)
            .collect())
    }
}
