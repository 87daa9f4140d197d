//! Cache key generation using SHA-256 hashes

use sha2::{Digest, Sha256};

/// Generate a deterministic cache key from an operation name, a repository
/// `owner/name` pair, and extra parameters.
///
/// The key is a SHA-256 hash of the operation, repo, and sorted parameters,
/// so equal request shapes produce equal keys regardless of parameter order.
pub fn cache_key(operation: &str, repo: Option<&str>, params: &[(&str, &str)]) -> String {
    let mut hasher = Sha256::new();

    hasher.update(operation.as_bytes());
    hasher.update(b"|");

    if let Some(repo) = repo {
        hasher.update(repo.as_bytes());
    }
    hasher.update(b"|");

    let mut sorted_params: Vec<_> = params.iter().collect();
    sorted_params.sort_by_key(|(k, _)| *k);

    for (k, v) in sorted_params {
        hasher.update(k.as_bytes());
        hasher.update(b"=");
        hasher.update(v.as_bytes());
        hasher.update(b"&");
    }

    format!("{:x}", hasher.finalize())
}
