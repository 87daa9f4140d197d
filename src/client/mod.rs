//! GitHub API client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reference::RepoRef;

pub mod github;
#[cfg(test)]
pub mod mock;
pub mod retry;

pub use github::GitHubClient;
#[cfg(test)]
#[allow(unused_imports)]
pub use mock::MockGitHubClient;
pub use retry::with_retry;

/// GitHub API client trait
///
/// The seam between the pipeline and the platform: the production
/// implementation is [`GitHubClient`], tests substitute a mock. Methods
/// return transport-level errors; downgrading failures to best-effort
/// sentinels is the content fetcher's job, not the client's.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Fetch the full recursive tree for the default branch head
    async fn get_tree(&self, repo: &RepoRef) -> Result<Vec<TreeEntry>>;

    /// Fetch one file's decoded text content by path
    async fn get_content(&self, repo: &RepoRef, path: &str) -> Result<String>;

    /// Fetch repository details (stars, forks, description, ...)
    async fn get_repo(&self, repo: &RepoRef) -> Result<RepoDetails>;

    /// List open issues, pull requests excluded
    async fn list_issues(&self, repo: &RepoRef, limit: usize) -> Result<Vec<IssueSummary>>;

    /// List open pull requests
    async fn list_pulls(&self, repo: &RepoRef, limit: usize) -> Result<Vec<IssueSummary>>;

    /// Login of the token's user; used to validate credentials
    async fn viewer_login(&self) -> Result<String>;
}

/// One entry of a repository tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Path relative to the repository root
    pub path: String,

    /// Entry type as reported by the platform ("blob", "tree", ...)
    #[serde(rename = "type")]
    pub kind: String,
}

impl TreeEntry {
    pub fn is_blob(&self) -> bool {
        self.kind == "blob"
    }
}

/// Repository details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoDetails {
    /// `owner/name`
    pub full_name: String,

    /// Repository description (optional)
    #[serde(default)]
    pub description: Option<String>,

    /// Star count
    #[serde(rename = "stargazers_count", default)]
    pub stars: u64,

    /// Fork count
    #[serde(rename = "forks_count", default)]
    pub forks: u64,

    /// Open issue count
    #[serde(rename = "open_issues_count", default)]
    pub open_issues: u64,

    /// Primary language (optional)
    #[serde(default)]
    pub language: Option<String>,

    /// Default branch name
    #[serde(default)]
    pub default_branch: Option<String>,

    /// Last update timestamp
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A condensed open issue or pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueSummary {
    /// Issue/PR number
    pub number: u64,

    /// Title line
    pub title: String,

    /// Body text (optional, truncated by consumers)
    #[serde(default)]
    pub body: Option<String>,
}
