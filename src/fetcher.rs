//! Best-effort repository content fetching
//!
//! Wraps the GitHub client with the fetch policy shared by every upstream
//! read: ephemeral cache first, then the network call under a per-call
//! timeout inside a bounded fixed-backoff retry. Eventual failure is
//! downgraded to an empty/`None` sentinel and logged; transport errors
//! never cross this boundary.

use std::sync::Arc;
use std::time::Duration;

use log::warn;

use crate::cache::{MemoryCache, cache_key};
use crate::client::{GitHubApi, with_retry};
use crate::error::{ApiError, Error, Result};
use crate::reference::RepoRef;

/// Per-call network timeout
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Attempts per operation (one call plus two retries)
const FETCH_ATTEMPTS: usize = 3;

/// Fixed delay between attempts
const FETCH_BACKOFF: Duration = Duration::from_secs(1);

/// How many open issues/PRs go into a summary section
const SUMMARY_LIMIT: usize = 10;

/// Issue/PR bodies are cut to this length in summaries
const SUMMARY_BODY_LIMIT: usize = 150;

/// Cached, retrying, best-effort fetch layer over a [`GitHubApi`]
pub struct ContentFetcher {
    api: Arc<dyn GitHubApi>,
    cache: Arc<MemoryCache>,
}

impl ContentFetcher {
    pub fn new(api: Arc<dyn GitHubApi>, cache: Arc<MemoryCache>) -> Self {
        Self { api, cache }
    }

    /// List all file paths in the repository tree.
    ///
    /// Returns an empty list when the repository has no blobs or when the
    /// listing fails after retries; callers treat empty as "no files
    /// found", which is distinct from a transport error.
    pub async fn list_files(&self, repo: &RepoRef) -> Vec<String> {
        let key = cache_key("list_files", Some(&repo.full_name()), &[]);
        if let Some(files) = self.cache.get_json::<Vec<String>>(&key) {
            return files;
        }

        match self.fetch(|| self.api.get_tree(repo)).await {
            Ok(tree) => {
                let files: Vec<String> = tree
                    .into_iter()
                    .filter(|entry| entry.is_blob())
                    .map(|entry| entry.path)
                    .collect();
                self.cache.set_json(&key, &files);
                files
            }
            Err(err) => {
                warn!("Failed to list files for {}: {}", repo, err);
                Vec::new()
            }
        }
    }

    /// Fetch one file's content, or `None` on any failure (including
    /// binary/non-text payloads). Content fetch is best-effort per file.
    pub async fn file_content(&self, repo: &RepoRef, path: &str) -> Option<String> {
        let key = cache_key("file_content", Some(&repo.full_name()), &[("path", path)]);
        if let Some(content) = self.cache.get_json::<String>(&key) {
            return Some(content);
        }

        match self.fetch(|| self.api.get_content(repo, path)).await {
            Ok(content) => {
                self.cache.set_json(&key, &content);
                Some(content)
            }
            Err(err) => {
                warn!("Failed to fetch content for {}:{}: {}", repo, path, err);
                None
            }
        }
    }

    /// Condensed open-issue listing, or `None` on failure
    pub async fn issues_summary(&self, repo: &RepoRef) -> Option<String> {
        let key = cache_key("list_issues", Some(&repo.full_name()), &[]);
        if let Some(summary) = self.cache.get_json::<String>(&key) {
            return Some(summary);
        }

        match self.fetch(|| self.api.list_issues(repo, SUMMARY_LIMIT)).await {
            Ok(issues) => {
                let summary = if issues.is_empty() {
                    "No open issues found".to_string()
                } else {
                    format_summaries(&issues)
                };
                self.cache.set_json(&key, &summary);
                Some(summary)
            }
            Err(err) => {
                warn!("Failed to fetch issues for {}: {}", repo, err);
                None
            }
        }
    }

    /// Condensed open-pull-request listing, or `None` on failure
    pub async fn pulls_summary(&self, repo: &RepoRef) -> Option<String> {
        let key = cache_key("list_pulls", Some(&repo.full_name()), &[]);
        if let Some(summary) = self.cache.get_json::<String>(&key) {
            return Some(summary);
        }

        match self.fetch(|| self.api.list_pulls(repo, SUMMARY_LIMIT)).await {
            Ok(pulls) => {
                let summary = if pulls.is_empty() {
                    "No open pull requests found".to_string()
                } else {
                    format_summaries(&pulls)
                };
                self.cache.set_json(&key, &summary);
                Some(summary)
            }
            Err(err) => {
                warn!("Failed to fetch pull requests for {}: {}", repo, err);
                None
            }
        }
    }

    /// The shared fetch policy: per-call timeout inside a bounded retry
    async fn fetch<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        with_retry(FETCH_ATTEMPTS, FETCH_BACKOFF, || {
            let call = op();
            async move {
                match tokio::time::timeout(FETCH_TIMEOUT, call).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::Api(ApiError::Network(
                        "Request timed out".to_string(),
                    ))),
                }
            }
        })
        .await
    }
}

fn format_summaries(items: &[crate::client::IssueSummary]) -> String {
    items
        .iter()
        .map(|item| {
            let body = item.body.as_deref().unwrap_or("");
            let truncated: String = body.chars().take(SUMMARY_BODY_LIMIT).collect();
            let ellipsis = if body.chars().count() > SUMMARY_BODY_LIMIT {
                "..."
            } else {
                ""
            };
            format!("#{}: {}\n{}{}\n", item.number, item.title, truncated, ellipsis)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheTtl;
    use crate::client::{IssueSummary, MockGitHubClient};

    fn repo() -> RepoRef {
        RepoRef::parse("octocat/hello-world").unwrap()
    }

    fn fetcher(mock: MockGitHubClient) -> (ContentFetcher, Arc<MockGitHubClient>) {
        let api = Arc::new(mock);
        let cache = Arc::new(MemoryCache::new(CacheTtl::EPHEMERAL));
        (ContentFetcher::new(api.clone(), cache), api)
    }

    #[tokio::test]
    async fn test_list_files_keeps_blobs_only() {
        let mock = MockGitHubClient::new().with_tree(&["README.md", "src/main.rs"]);
        let (fetcher, _) = fetcher(mock);

        let files = fetcher.list_files(&repo()).await;
        assert_eq!(files, vec!["README.md", "src/main.rs"]);
    }

    #[tokio::test]
    async fn test_list_files_is_cached() {
        let mock = MockGitHubClient::new().with_tree(&["a.md"]);
        let (fetcher, api) = fetcher(mock);

        let first = fetcher.list_files(&repo()).await;
        let second = fetcher.list_files(&repo()).await;

        assert_eq!(first, second);
        assert_eq!(api.call_counts().await.get_tree, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listing_failure_retries_then_returns_empty() {
        let mock = MockGitHubClient::new().with_tree_error();
        let (fetcher, api) = fetcher(mock);

        let files = fetcher.list_files(&repo()).await;

        assert!(files.is_empty());
        assert_eq!(api.call_counts().await.get_tree, FETCH_ATTEMPTS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_listing_is_not_cached() {
        // A failure sentinel must not mask a later successful fetch
        let mock = MockGitHubClient::new().with_tree_error();
        let (fetcher, api) = fetcher(mock);

        let _ = fetcher.list_files(&repo()).await;
        let _ = fetcher.list_files(&repo()).await;

        assert_eq!(api.call_counts().await.get_tree, 2 * FETCH_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_file_content_cached_and_best_effort() {
        let mock = MockGitHubClient::new()
            .with_content("README.md", "# Hello")
            .with_failing_path("broken.rs");
        let (fetcher, api) = fetcher(mock);

        assert_eq!(
            fetcher.file_content(&repo(), "README.md").await.as_deref(),
            Some("# Hello")
        );
        assert_eq!(
            fetcher.file_content(&repo(), "README.md").await.as_deref(),
            Some("# Hello")
        );
        assert_eq!(api.call_counts().await.get_content, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_content_returns_none() {
        let mock = MockGitHubClient::new().with_failing_path("broken.rs");
        let (fetcher, _) = fetcher(mock);

        assert_eq!(fetcher.file_content(&repo(), "broken.rs").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_hits_per_call_timeout() {
        let mock = MockGitHubClient::new()
            .with_content("slow.rs", "content")
            .with_content_delay(Duration::from_secs(20));
        let (fetcher, api) = fetcher(mock);

        let content = fetcher.file_content(&repo(), "slow.rs").await;

        assert_eq!(content, None);
        // Each attempt timed out independently
        assert_eq!(api.call_counts().await.get_content, FETCH_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_issues_summary_formats_and_truncates() {
        let mock = MockGitHubClient::new().with_issues(vec![
            IssueSummary {
                number: 12,
                title: "Crash on startup".to_string(),
                body: Some("x".repeat(200)),
            },
            IssueSummary {
                number: 13,
                title: "Docs typo".to_string(),
                body: None,
            },
        ]);
        let (fetcher, _) = fetcher(mock);

        let summary = fetcher.issues_summary(&repo()).await.unwrap();
        assert!(summary.contains("#12: Crash on startup"));
        assert!(summary.contains("..."));
        assert!(summary.contains("#13: Docs typo"));
    }

    #[tokio::test]
    async fn test_issues_summary_empty_list() {
        let mock = MockGitHubClient::new();
        let (fetcher, _) = fetcher(mock);

        let summary = fetcher.issues_summary(&repo()).await.unwrap();
        assert_eq!(summary, "No open issues found");
    }

    #[tokio::test]
    async fn test_pulls_summary_empty_list() {
        let mock = MockGitHubClient::new();
        let (fetcher, _) = fetcher(mock);

        let summary = fetcher.pulls_summary(&repo()).await.unwrap();
        assert_eq!(summary, "No open pull requests found");
    }
}
