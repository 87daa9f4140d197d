//! Documentation-generation pipeline
//!
//! Orchestrates one request end to end: parse the reference, consult both
//! cache tiers, list and select files, assemble the context, build the
//! prompt, generate, and persist. The `ListFiles…Generate` span runs under
//! an overall deadline independent of the generation client's own deadline.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::cache::{DocStore, MemoryCache, cache_key};
use crate::client::GitHubApi;
use crate::error::PipelineError;
use crate::fetcher::ContentFetcher;
use crate::generate::TextGenerator;
use crate::reference::RepoRef;

pub mod assemble;
pub mod options;
pub mod prompt;
pub mod select;

pub use options::ContextOptions;

/// Independent deadlines for one request.
///
/// The generation deadline bounds only the model call; the overall deadline
/// bounds everything from the file listing onward. Whichever elapses first
/// aborts the request.
#[derive(Debug, Clone, Copy)]
pub struct PipelineDeadlines {
    pub generation: Duration,
    pub overall: Duration,
}

impl Default for PipelineDeadlines {
    fn default() -> Self {
        Self {
            generation: Duration::from_secs(40),
            overall: Duration::from_secs(55),
        }
    }
}

/// One documentation-generation request
#[derive(Debug, Clone)]
pub struct DocRequest {
    /// Repository URL or `owner/repo` shorthand
    pub repo_url: String,

    /// Caller-supplied options; `None` selects the simpler default filter
    pub options: Option<ContextOptions>,

    /// Skip both cache tiers and overwrite the durable row on completion
    pub force_refresh: bool,
}

/// Successful pipeline outcome
#[derive(Debug, Clone)]
pub struct DocResult {
    pub documentation: String,
    pub from_cache: bool,
    pub cached_at: Option<DateTime<Utc>>,
}

/// The request pipeline, shared across all concurrent requests.
///
/// Per-request state lives on the stack of [`DocPipeline::run`]; only the
/// two cache tiers are shared mutable state.
pub struct DocPipeline {
    github: Arc<dyn GitHubApi>,
    generator: Arc<dyn TextGenerator>,
    memory: Arc<MemoryCache>,
    store: Option<Arc<Mutex<DocStore>>>,
    deadlines: PipelineDeadlines,
}

impl DocPipeline {
    pub fn new(
        github: Arc<dyn GitHubApi>,
        generator: Arc<dyn TextGenerator>,
        memory: Arc<MemoryCache>,
        store: Option<Arc<Mutex<DocStore>>>,
    ) -> Self {
        Self {
            github,
            generator,
            memory,
            store,
            deadlines: PipelineDeadlines::default(),
        }
    }

    /// Override the default deadlines (used by tests)
    pub fn with_deadlines(mut self, deadlines: PipelineDeadlines) -> Self {
        self.deadlines = deadlines;
        self
    }

    /// Run one request through the full pipeline
    pub async fn run(&self, request: &DocRequest) -> Result<DocResult, PipelineError> {
        let repo = RepoRef::parse(&request.repo_url)?;

        // Cache identity always uses the defaulted option set, so a request
        // without options shares its entry with explicit defaults.
        let effective = request.options.clone().unwrap_or_default();
        let docs_key = docs_cache_key(&repo, &effective);

        if !request.force_refresh {
            if let Some((json, stored_at)) = self.memory.get_entry(&docs_key)
                && let Ok(documentation) = serde_json::from_str::<String>(&json)
            {
                info!("Documentation for {} served from memory cache", repo);
                return Ok(DocResult {
                    documentation,
                    from_cache: true,
                    cached_at: Some(stored_at),
                });
            }

            if let Some(store) = &self.store {
                match store
                    .lock()
                    .expect("store mutex poisoned")
                    .find(&repo.owner, &repo.name, &effective)
                {
                    Ok(Some(doc)) => {
                        info!("Documentation for {} served from durable cache", repo);
                        self.memory.set_json(&docs_key, &doc.documentation);
                        return Ok(DocResult {
                            documentation: doc.documentation,
                            from_cache: true,
                            cached_at: Some(doc.updated_at),
                        });
                    }
                    Ok(None) => {}
                    // The durable tier is an optimization, never a
                    // correctness dependency
                    Err(err) => warn!("Durable cache read failed for {}: {}", repo, err),
                }
            }
        }

        let documentation = match tokio::time::timeout(
            self.deadlines.overall,
            self.generate_fresh(&repo, request.options.as_ref(), &effective),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(PipelineError::OverallTimeout),
        };

        self.memory.set_json(&docs_key, &documentation);
        if let Some(store) = &self.store
            && let Err(err) = store.lock().expect("store mutex poisoned").upsert(
                &repo.owner,
                &repo.name,
                &effective,
                &documentation,
            )
        {
            warn!("Durable cache write failed for {}: {}", repo, err);
        }

        Ok(DocResult {
            documentation,
            from_cache: false,
            cached_at: None,
        })
    }

    /// The `ListFiles…Generate` span, run under the overall deadline
    async fn generate_fresh(
        &self,
        repo: &RepoRef,
        options: Option<&ContextOptions>,
        effective: &ContextOptions,
    ) -> Result<String, PipelineError> {
        let fetcher = ContentFetcher::new(self.github.clone(), self.memory.clone());

        let files = fetcher.list_files(repo).await;
        if files.is_empty() {
            return Err(PipelineError::NoFilesFound);
        }
        info!("Found {} files in {}, applying filters", files.len(), repo);

        let limit = match options {
            Some(options) => options.file_limit(),
            None => select::DEFAULT_FILE_LIMIT,
        };
        let mut selected = select::select_files(&files, options, limit);

        // Pull the README out of the list; it is fetched separately and
        // always leads the assembled context.
        let readme_path = if effective.include_readme {
            selected
                .iter()
                .position(|path| select::is_readme(path))
                .map(|index| selected.remove(index))
        } else {
            None
        };

        let mut context = assemble::assemble_context(
            &fetcher,
            repo,
            readme_path.as_deref(),
            &selected,
            effective.per_file_limit(),
        )
        .await?;

        // Issue/PR sections are best-effort, like any other fetch
        if effective.include_issues
            && let Some(summary) = fetcher.issues_summary(repo).await
        {
            context.push_str(&format!("\n\n--- Open Issues ---\n{}", summary));
        }
        if effective.include_pull_requests
            && let Some(summary) = fetcher.pulls_summary(repo).await
        {
            context.push_str(&format!("\n\n--- Open Pull Requests ---\n{}", summary));
        }

        let prompt = prompt::build_prompt(options, &context);
        info!("Sending {} bytes of context for {} to the model", context.len(), repo);

        let generated = match tokio::time::timeout(
            self.deadlines.generation,
            self.generator.generate(&prompt),
        )
        .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(err)) => return Err(PipelineError::GenerationFailed(err.to_string())),
            Err(_) => return Err(PipelineError::GenerationTimeout),
        };

        if generated.trim().is_empty() {
            return Err(PipelineError::GenerationFailed(
                "Empty generation response".to_string(),
            ));
        }
        Ok(generated)
    }
}

/// Ephemeral docs-tier key over the defaulted option fields
fn docs_cache_key(repo: &RepoRef, options: &ContextOptions) -> String {
    let readme = options.include_readme.to_string();
    let source = options.include_source_code.to_string();
    let issues = options.include_issues.to_string();
    let pulls = options.include_pull_requests.to_string();
    let quick = options.quick_mode.to_string();
    cache_key(
        "docs",
        Some(&repo.full_name()),
        &[
            ("include_readme", &readme),
            ("include_source_code", &source),
            ("include_issues", &issues),
            ("include_pull_requests", &pulls),
            ("quick_mode", &quick),
            ("custom_prompt", options.custom_prompt()),
        ],
    )
}
