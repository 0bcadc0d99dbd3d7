use crate::error::{FetchError, Result};
use crate::resolver::CommitQuery;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const GRAPHQL_URL: &str = "https://api.github.com/graphql";
const USER_AGENT: &str = "profile-terminal";

const COMMITS_QUERY: &str = r#"
query($login: String!) {
    user(login: $login) {
        contributionsCollection {
            totalCommitContributions
        }
    }
}
"#;

/// Token-gated GitHub GraphQL client. Only constructed when a token exists.
pub struct GithubClient {
    token: String,
    http: Client,
}

#[derive(Deserialize)]
struct CommitsResponse {
    data: Option<CommitsData>,
    errors: Option<Vec<GraphqlError>>,
}
#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}
#[derive(Deserialize)]
struct CommitsData {
    user: Option<CommitsUser>,
}
#[derive(Deserialize)]
struct CommitsUser {
    #[serde(rename = "contributionsCollection")]
    contributions_collection: Option<ContribCollection>,
}
#[derive(Deserialize)]
struct ContribCollection {
    #[serde(rename = "totalCommitContributions")]
    total_commit_contributions: Option<u64>,
}

impl GithubClient {
    /// Create a GraphQL client; every request is bounded by `timeout`.
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            token: token.into(),
            http,
        })
    }

    /// Single GraphQL POST, no retry. Returns the raw body of a 2xx response.
    async fn graphql(&self, query: &str, variables: serde_json::Value) -> Result<String> {
        let resp = self
            .http
            .post(GRAPHQL_URL)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        Ok(resp.text().await?)
    }
}

#[async_trait]
impl CommitQuery for GithubClient {
    /// Commit contributions for the current contribution period.
    async fn commit_count(&self, login: &str) -> Result<u64> {
        let body = self
            .graphql(COMMITS_QUERY, serde_json::json!({ "login": login }))
            .await?;
        debug!(user = login, bytes = body.len(), "GraphQL commit query answered");
        parse_commit_count(&body)
    }
}

/// Extract `data.user.contributionsCollection.totalCommitContributions`.
pub fn parse_commit_count(body: &str) -> Result<u64> {
    let parsed: CommitsResponse = serde_json::from_str(body)?;

    if let Some(errors) = parsed.errors.filter(|e| !e.is_empty()) {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(FetchError::Api(messages.join("; ")));
    }

    parsed
        .data
        .and_then(|d| d.user)
        .and_then(|u| u.contributions_collection)
        .and_then(|c| c.total_commit_contributions)
        .ok_or(FetchError::MissingField(
            "data.user.contributionsCollection.totalCommitContributions",
        ))
}
