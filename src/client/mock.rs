//! Mock GitHub API client for testing
//!
//! Configure responses via builder methods, then hand to the fetcher or
//! pipeline under test. Tracks per-operation call counts for cache and
//! retry assertions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{GitHubApi, IssueSummary, RepoDetails, TreeEntry};
use crate::error::{ApiError, Result};
use crate::reference::RepoRef;

/// Per-operation call counters for verification
#[derive(Debug, Default, Clone)]
pub struct CallCounts {
    pub get_tree: usize,
    pub get_content: usize,
    pub get_repo: usize,
    pub list_issues: usize,
    pub list_pulls: usize,
    pub viewer_login: usize,
}

/// Mock API client for testing
pub struct MockGitHubClient {
    tree: Arc<Mutex<Vec<TreeEntry>>>,
    contents: Arc<Mutex<HashMap<String, String>>>,
    repo_details: Arc<Mutex<Option<RepoDetails>>>,
    issues: Arc<Mutex<Vec<IssueSummary>>>,
    pulls: Arc<Mutex<Vec<IssueSummary>>>,
    /// Fail every get_tree call with a server error
    tree_fails: bool,
    /// Paths whose content fetch fails with a server error
    failing_paths: HashSet<String>,
    /// Artificial latency per operation, for deadline tests
    tree_delay: Duration,
    content_delay: Duration,
    call_count: Arc<Mutex<CallCounts>>,
}

impl Default for MockGitHubClient {
    fn default() -> Self {
        Self {
            tree: Arc::new(Mutex::new(Vec::new())),
            contents: Arc::new(Mutex::new(HashMap::new())),
            repo_details: Arc::new(Mutex::new(None)),
            issues: Arc::new(Mutex::new(Vec::new())),
            pulls: Arc::new(Mutex::new(Vec::new())),
            tree_fails: false,
            failing_paths: HashSet::new(),
            tree_delay: Duration::ZERO,
            content_delay: Duration::ZERO,
            call_count: Arc::new(Mutex::new(CallCounts::default())),
        }
    }
}

impl MockGitHubClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree(self, paths: &[&str]) -> Self {
        {
            let mut tree = self.tree.try_lock().unwrap();
            *tree = paths
                .iter()
                .map(|path| TreeEntry {
                    path: path.to_string(),
                    kind: "blob".to_string(),
                })
                .collect();
        }
        self
    }

    pub fn with_content(self, path: &str, content: &str) -> Self {
        {
            let mut contents = self.contents.try_lock().unwrap();
            contents.insert(path.to_string(), content.to_string());
        }
        self
    }

    pub fn with_repo_details(self, details: RepoDetails) -> Self {
        {
            let mut repo = self.repo_details.try_lock().unwrap();
            *repo = Some(details);
        }
        self
    }

    pub fn with_issues(self, issues: Vec<IssueSummary>) -> Self {
        {
            let mut slot = self.issues.try_lock().unwrap();
            *slot = issues;
        }
        self
    }

    pub fn with_pulls(self, pulls: Vec<IssueSummary>) -> Self {
        {
            let mut slot = self.pulls.try_lock().unwrap();
            *slot = pulls;
        }
        self
    }

    pub fn with_tree_error(mut self) -> Self {
        self.tree_fails = true;
        self
    }

    pub fn with_failing_path(mut self, path: &str) -> Self {
        self.failing_paths.insert(path.to_string());
        self
    }

    pub fn with_tree_delay(mut self, delay: Duration) -> Self {
        self.tree_delay = delay;
        self
    }

    pub fn with_content_delay(mut self, delay: Duration) -> Self {
        self.content_delay = delay;
        self
    }

    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }
}

#[async_trait]
impl GitHubApi for MockGitHubClient {
    async fn get_tree(&self, _repo: &RepoRef) -> Result<Vec<TreeEntry>> {
        self.call_count.lock().await.get_tree += 1;
        if !self.tree_delay.is_zero() {
            tokio::time::sleep(self.tree_delay).await;
        }
        if self.tree_fails {
            return Err(ApiError::ServerError("mock tree failure".to_string()).into());
        }
        Ok(self.tree.lock().await.clone())
    }

    async fn get_content(&self, _repo: &RepoRef, path: &str) -> Result<String> {
        self.call_count.lock().await.get_content += 1;
        if !self.content_delay.is_zero() {
            tokio::time::sleep(self.content_delay).await;
        }
        if self.failing_paths.contains(path) {
            return Err(ApiError::ServerError(format!("mock failure for {}", path)).into());
        }
        self.contents
            .lock()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(path.to_string()).into())
    }

    async fn get_repo(&self, repo: &RepoRef) -> Result<RepoDetails> {
        self.call_count.lock().await.get_repo += 1;
        self.repo_details
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::NotFound(repo.full_name()).into())
    }

    async fn list_issues(&self, _repo: &RepoRef, limit: usize) -> Result<Vec<IssueSummary>> {
        self.call_count.lock().await.list_issues += 1;
        let issues = self.issues.lock().await;
        Ok(issues.iter().take(limit).cloned().collect())
    }

    async fn list_pulls(&self, _repo: &RepoRef, limit: usize) -> Result<Vec<IssueSummary>> {
        self.call_count.lock().await.list_pulls += 1;
        let pulls = self.pulls.lock().await;
        Ok(pulls.iter().take(limit).cloned().collect())
    }

    async fn viewer_login(&self) -> Result<String> {
        self.call_count.lock().await.viewer_login += 1;
        Ok("mock-user".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepoRef {
        RepoRef::parse("octocat/hello-world").unwrap()
    }

    #[tokio::test]
    async fn test_mock_tree_and_contents() {
        let mock = MockGitHubClient::new()
            .with_tree(&["README.md", "src/main.rs"])
            .with_content("README.md", "# Hello");

        let tree = mock.get_tree(&repo()).await.unwrap();
        assert_eq!(tree.len(), 2);

        let content = mock.get_content(&repo(), "README.md").await.unwrap();
        assert_eq!(content, "# Hello");

        assert!(mock.get_content(&repo(), "missing.md").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_call_counts() {
        let mock = MockGitHubClient::new().with_tree(&["a.md"]);

        let _ = mock.get_tree(&repo()).await;
        let _ = mock.get_tree(&repo()).await;
        let _ = mock.get_content(&repo(), "a.md").await;

        let counts = mock.call_counts().await;
        assert_eq!(counts.get_tree, 2);
        assert_eq!(counts.get_content, 1);
    }

    #[tokio::test]
    async fn test_mock_tree_error() {
        let mock = MockGitHubClient::new().with_tree_error();
        assert!(mock.get_tree(&repo()).await.is_err());
    }
}
