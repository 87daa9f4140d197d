//! Generation context options
//!
//! Caller-supplied knobs controlling what goes into the generation context.
//! An option set doubles as part of the cache identity: two requests with
//! equal options for the same repository share one cached document.

use serde::{Deserialize, Serialize};

/// Context options for a documentation-generation request.
///
/// The wire shape is camelCase; missing fields take the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextOptions {
    /// Include the repository README, always ranked first
    pub include_readme: bool,

    /// Include source-code files
    pub include_source_code: bool,

    /// Append a summary of open issues
    pub include_issues: bool,

    /// Append a summary of open pull requests
    pub include_pull_requests: bool,

    /// Smaller file and per-file budgets for faster generation
    pub quick_mode: bool,

    /// Caller-supplied generation instructions, used verbatim instead of
    /// the default prompt when non-empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            include_readme: true,
            include_source_code: true,
            include_issues: false,
            include_pull_requests: false,
            quick_mode: true,
            custom_prompt: None,
        }
    }
}

/// Option equality is field-wise, with an absent custom prompt equal to an
/// empty one. This is the cache-identity relation for both tiers.
impl PartialEq for ContextOptions {
    fn eq(&self, other: &Self) -> bool {
        self.include_readme == other.include_readme
            && self.include_source_code == other.include_source_code
            && self.include_issues == other.include_issues
            && self.include_pull_requests == other.include_pull_requests
            && self.quick_mode == other.quick_mode
            && self.custom_prompt() == other.custom_prompt()
    }
}

impl Eq for ContextOptions {}

impl ContextOptions {
    /// Custom prompt with the absent case normalized to empty
    pub fn custom_prompt(&self) -> &str {
        self.custom_prompt.as_deref().unwrap_or("")
    }

    /// Hard ceiling on the number of files fed to the assembler
    pub fn file_limit(&self) -> usize {
        if self.quick_mode { 15 } else { 25 }
    }

    /// Per-file character ceiling before truncation
    pub fn per_file_limit(&self) -> usize {
        if self.quick_mode { 3000 } else { 5000 }
    }
}
