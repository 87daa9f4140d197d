//! Context assembly
//!
//! Fetches the selected files and concatenates them into one bounded text
//! blob. Fetches fan out across a small fixed pool of workers, each
//! striding through the file list; every worker halts once the shared size
//! budget is spent. The README, when present, is fetched first and always
//! leads the assembled context.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::PipelineError;
use crate::fetcher::ContentFetcher;
use crate::reference::RepoRef;

/// Global ceiling on assembled context size, in characters
pub const MAX_CONTEXT_CHARS: usize = 90_000;

/// Concurrent per-file fetch streams within one request
const ASSEMBLY_WORKERS: usize = 5;

/// Appended to a file block cut at the per-file ceiling
const TRUNCATION_MARKER: &str = "... [truncated for size]";

/// Appended once when the global ceiling cuts the file list short
const OMISSION_MARKER: &str = "\n\n[Additional files omitted due to size constraints]";

/// Assemble the labeled-block context for `files`, with `readme_path`
/// (already pulled out of the list) fetched first and prepended.
///
/// Fails only with [`PipelineError::EmptyContext`], when every fetch failed
/// or nothing but whitespace survived.
pub async fn assemble_context(
    fetcher: &ContentFetcher,
    repo: &RepoRef,
    readme_path: Option<&str>,
    files: &[String],
    per_file_limit: usize,
) -> Result<String, PipelineError> {
    assemble_with_ceiling(fetcher, repo, readme_path, files, per_file_limit, MAX_CONTEXT_CHARS)
        .await
}

async fn assemble_with_ceiling(
    fetcher: &ContentFetcher,
    repo: &RepoRef,
    readme_path: Option<&str>,
    files: &[String],
    per_file_limit: usize,
    max_chars: usize,
) -> Result<String, PipelineError> {
    let mut context = String::new();

    if let Some(path) = readme_path
        && let Some(content) = fetcher.file_content(repo, path).await
    {
        context.push_str(&format!(
            "\n\n--- File: {} (README) ---\n{}",
            path,
            trim_content(&content, per_file_limit)
        ));
    }

    // Fetched blocks land in their listing slot so the final order is
    // deterministic regardless of arrival order.
    let blocks: Mutex<Vec<Option<String>>> = Mutex::new(vec![None; files.len()]);
    let budget = AtomicUsize::new(context.len());

    let workers = (0..ASSEMBLY_WORKERS).map(|worker| {
        let blocks = &blocks;
        let budget = &budget;
        async move {
            let mut index = worker;
            while index < files.len() {
                if budget.load(Ordering::SeqCst) > max_chars {
                    break;
                }
                let path = &files[index];
                if let Some(content) = fetcher.file_content(repo, path).await {
                    let block = format!(
                        "\n\n--- File: {} ---\n{}",
                        path,
                        trim_content(&content, per_file_limit)
                    );
                    budget.fetch_add(block.len(), Ordering::SeqCst);
                    blocks.lock().expect("assembly mutex poisoned")[index] = Some(block);
                }
                index += ASSEMBLY_WORKERS;
            }
        }
    });
    futures::future::join_all(workers).await;

    // Sequential concatenation enforces the exact ceiling; the worker-side
    // budget only bounds how much gets fetched.
    let mut omitted = false;
    for block in blocks.into_inner().expect("assembly mutex poisoned").into_iter().flatten() {
        if context.len() + block.len() > max_chars {
            omitted = true;
            break;
        }
        context.push_str(&block);
    }
    if omitted {
        context.push_str(OMISSION_MARKER);
    }

    if context.trim().is_empty() {
        return Err(PipelineError::EmptyContext);
    }
    Ok(context)
}

/// Cut content at the per-file character ceiling, marking the cut
fn trim_content(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        None => content.to_string(),
        Some((byte_index, _)) => format!("{}{}", &content[..byte_index], TRUNCATION_MARKER),
    }
}
