//! File selection policy
//!
//! Filters a repository file listing down to the entries worth feeding the
//! generator, ranks them (README first, manifests next, then source
//! directories), and applies the file-count ceiling.

use crate::pipeline::options::ContextOptions;

/// Source-code extensions toggled by `include_source_code`
const SOURCE_CODE_EXTS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "py", "java", "go", "c", "cpp", "h", "hpp",
];

/// Binary and media extensions, never useful as text context
const BINARY_EXTS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "svg", "ico", "mp4", "webm", "ogg", "mp3", "wav", "pdf",
    "zip", "tar", "gz",
];

/// Directory segments that add noise rather than signal
const NOISE_DIRS: &[&str] = &[
    "node_modules/",
    ".git/",
    ".next/",
    "dist/",
    "build/",
    "vendor/",
    ".cache/",
];

/// Allow-list used when the caller supplied no options at all
const DEFAULT_ALLOW_EXTS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "py", "md", "txt", "java", "go", "c", "cpp", "h", "hpp", "css",
    "scss", "html",
];

/// Noisiest directories, excluded even by the permissive default filter
const DEFAULT_NOISE_DIRS: &[&str] = &["node_modules/", ".git/", ".next/", "dist/", "build/"];

/// Manifest/config files ranked right after the README
const MANIFEST_FILES: &[&str] = &[
    "package.json",
    "tsconfig.json",
    "composer.json",
    "Cargo.toml",
    "pyproject.toml",
];

/// Default file ceiling when no options were supplied
pub const DEFAULT_FILE_LIMIT: usize = 25;

/// Case-insensitive `readme.md` suffix match
pub fn is_readme(path: &str) -> bool {
    path.to_lowercase().ends_with("readme.md")
}

fn extension(path: &str) -> Option<String> {
    let name = path.rsplit('/').next()?;
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        // Dotfiles like `.gitignore` have no extension
        return None;
    }
    Some(ext.to_lowercase())
}

fn has_extension(path: &str, exts: &[&str]) -> bool {
    extension(path).is_some_and(|ext| exts.contains(&ext.as_str()))
}

fn in_noise_dir(path: &str, dirs: &[&str]) -> bool {
    dirs.iter().any(|dir| path.contains(dir))
}

/// Apply the option-driven filter rules to a single path
fn keep_with_options(path: &str, options: &ContextOptions) -> bool {
    // Rule order matters: a requested README survives every later rule
    if options.include_readme && is_readme(path) {
        return true;
    }
    if !options.include_source_code && has_extension(path, SOURCE_CODE_EXTS) {
        return false;
    }
    if in_noise_dir(path, NOISE_DIRS) {
        return false;
    }
    if has_extension(path, BINARY_EXTS) {
        return false;
    }
    true
}

/// Simpler default filter for callers that supplied no options: keep only
/// known text/code extensions outside the noisiest directories
fn keep_default(path: &str) -> bool {
    has_extension(path, DEFAULT_ALLOW_EXTS) && !in_noise_dir(path, DEFAULT_NOISE_DIRS)
}

/// Ranking bucket; ties keep their listing order (stable sort)
fn rank(path: &str) -> u8 {
    if is_readme(path) {
        return 0;
    }
    let name = path.rsplit('/').next().unwrap_or(path);
    if MANIFEST_FILES.contains(&name) {
        return 1;
    }
    let in_source_dir =
        path.starts_with("src/") || path.starts_with("app/") || path.starts_with("lib/");
    if in_source_dir && (has_extension(path, SOURCE_CODE_EXTS) || has_extension(path, &["rs"])) {
        return 2;
    }
    3
}

/// Filter, rank, and cap a file listing.
///
/// `limit` is the hard ceiling on returned entries; callers derive it from
/// the options (quick mode uses a smaller budget).
pub fn select_files(paths: &[String], options: Option<&ContextOptions>, limit: usize) -> Vec<String> {
    let mut selected: Vec<String> = match options {
        Some(options) => paths
            .iter()
            .filter(|path| keep_with_options(path, options))
            .cloned()
            .collect(),
        None => paths.iter().filter(|path| keep_default(path)).cloned().collect(),
    };

    selected.sort_by_key(|path| rank(path));
    selected.truncate(limit);
    selected
}
