//! Commit history from a GitHub-style GraphQL endpoint.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{AppError, Result};

/// Display format for commit timestamps, e.g. `Mar 04, 2024 17:30`.
const DISPLAY_FORMAT: &str = "%b %d, %Y %H:%M";

/// One commit node as returned by the query, decorated with repository info.
///
/// Fields the query selects beyond `committedDate` are kept verbatim in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub committed_date: String,
    #[serde(default)]
    pub formatted_committed_date: String,
    #[serde(default)]
    pub repository_name: String,
    #[serde(default)]
    pub repository_url: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Data>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Data {
    viewer: Viewer,
}

#[derive(Debug, Deserialize)]
struct Viewer {
    repository: Repository,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Repository {
    name: String,
    url: String,
    default_branch_ref: BranchRef,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    target: Target,
}

#[derive(Debug, Deserialize)]
struct Target {
    history: History,
}

#[derive(Debug, Deserialize)]
struct History {
    nodes: Vec<Commit>,
}

/// Runs `query` against `api_url` and returns the decorated commit list.
pub async fn fetch_commits(
    client: &reqwest::Client,
    api_url: &str,
    token: &str,
    query: &str,
) -> Result<Vec<Commit>> {
    let response = client
        .post(api_url)
        .bearer_auth(token)
        .json(&json!({ "query": query }))
        .send()
        .await?;

    if response.status() != reqwest::StatusCode::OK {
        return Err(AppError::Upstream(format!(
            "unexpected status code: {}",
            response.status().as_u16()
        )));
    }

    let body = response.bytes().await?;
    parse_commits(&body)
}

/// Decodes a GraphQL commit-history response body.
pub fn parse_commits(body: &[u8]) -> Result<Vec<Commit>> {
    let response: GraphQlResponse =
        serde_json::from_slice(body).map_err(|e| AppError::Decode(e.to_string()))?;

    let data = match response.data {
        Some(data) => data,
        None => {
            let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
            return Err(AppError::Decode(format!(
                "response has no data: {}",
                messages.join("; ")
            )));
        }
    };

    let repository = data.viewer.repository;
    repository
        .default_branch_ref
        .target
        .history
        .nodes
        .into_iter()
        .map(|mut commit| -> Result<Commit> {
            commit.formatted_committed_date = format_commit_date(&commit.committed_date)?;
            commit.repository_name = repository.name.clone();
            commit.repository_url = repository.url.clone();
            Ok(commit)
        })
        .collect()
}

/// Reformats an RFC 3339 timestamp for display, keeping its own offset.
pub fn format_commit_date(raw: &str) -> Result<String> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| AppError::Decode(format!("invalid committedDate {:?}: {}", raw, e)))?;
    Ok(parsed.format(DISPLAY_FORMAT).to_string())
}
