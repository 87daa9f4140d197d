//! GitHub REST API client implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{GitHubApi, IssueSummary, RepoDetails, TreeEntry};
use crate::error::{ApiError, Result};
use crate::reference::RepoRef;

/// GitHub API base URL
const API_BASE_URL: &str = "https://api.github.com";

/// Client-side pacing below GitHub's secondary rate limits
const RATE_LIMIT_PER_SECOND: u32 = 8;

/// GitHub REST API client
pub struct GitHubClient {
    http: HttpClient,
    base_url: String,
    token: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl GitHubClient {
    /// Create a client; `host` overrides the production API base URL
    /// (for development/testing)
    pub fn with_host(token: String, host: Option<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let quota = Quota::per_second(std::num::NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap());
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            http,
            base_url: host.unwrap_or_else(|| API_BASE_URL.to_string()),
            token,
            rate_limiter,
        })
    }

    /// Make an authenticated GET request and decode the JSON response
    async fn request_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", concat!("repodoc/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let data = response.json::<T>().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;
                Ok(data)
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            StatusCode::FORBIDDEN => {
                // GitHub reports exhausted rate limits as 403
                let remaining = response
                    .headers()
                    .get("x-ratelimit-remaining")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok());
                if remaining == Some(0) {
                    Err(ApiError::RateLimit.into())
                } else {
                    Err(ApiError::Forbidden.into())
                }
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(path.to_string()).into()),
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimit.into()),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => {
                let error_msg = format!("Unexpected status code: {}", status);
                Err(ApiError::InvalidResponse(error_msg).into())
            }
        }
    }
}

#[derive(Deserialize)]
struct TreeResponse {
    /// Missing on commits without a tree; treated as an empty listing
    #[serde(default)]
    tree: Vec<TreeEntry>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

/// Issue wire item; the issues endpoint mixes in pull requests, which carry
/// a `pull_request` key
#[derive(Deserialize)]
struct IssueItem {
    number: u64,
    title: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn get_tree(&self, repo: &RepoRef) -> Result<Vec<TreeEntry>> {
        let path = format!(
            "/repos/{}/{}/git/trees/HEAD?recursive=1",
            repo.owner, repo.name
        );
        let response: TreeResponse = self.request_json(&path).await?;
        Ok(response.tree)
    }

    async fn get_content(&self, repo: &RepoRef, file_path: &str) -> Result<String> {
        let path = format!("/repos/{}/{}/contents/{}", repo.owner, repo.name, file_path);
        let response: ContentResponse = self.request_json(&path).await?;

        match (response.content, response.encoding.as_deref()) {
            (Some(content), Some("base64")) => {
                use base64::{Engine as _, engine::general_purpose};

                // GitHub line-wraps the base64 payload
                let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
                let bytes = general_purpose::STANDARD.decode(&compact).map_err(|e| {
                    ApiError::InvalidResponse(format!("Invalid base64 content: {}", e))
                })?;
                String::from_utf8(bytes).map_err(|_| {
                    ApiError::InvalidResponse(format!("Non-text content: {}", file_path)).into()
                })
            }
            _ => Err(ApiError::InvalidResponse(format!("Not a readable file: {}", file_path)).into()),
        }
    }

    async fn get_repo(&self, repo: &RepoRef) -> Result<RepoDetails> {
        let path = format!("/repos/{}/{}", repo.owner, repo.name);
        self.request_json(&path).await
    }

    async fn list_issues(&self, repo: &RepoRef, limit: usize) -> Result<Vec<IssueSummary>> {
        let path = format!(
            "/repos/{}/{}/issues?state=open&per_page={}",
            repo.owner, repo.name, limit
        );
        let items: Vec<IssueItem> = self.request_json(&path).await?;
        Ok(items
            .into_iter()
            .filter(|item| item.pull_request.is_none())
            .map(|item| IssueSummary {
                number: item.number,
                title: item.title,
                body: item.body,
            })
            .collect())
    }

    async fn list_pulls(&self, repo: &RepoRef, limit: usize) -> Result<Vec<IssueSummary>> {
        let path = format!(
            "/repos/{}/{}/pulls?state=open&per_page={}",
            repo.owner, repo.name, limit
        );
        let items: Vec<IssueItem> = self.request_json(&path).await?;
        Ok(items
            .into_iter()
            .map(|item| IssueSummary {
                number: item.number,
                title: item.title,
                body: item.body,
            })
            .collect())
    }

    async fn viewer_login(&self) -> Result<String> {
        #[derive(Deserialize)]
        struct UserResponse {
            login: String,
        }

        let response: UserResponse = self.request_json("/user").await?;
        Ok(response.login)
    }
}
