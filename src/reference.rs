//! Repository reference parsing
//!
//! Normalizes user-supplied repository references into a canonical
//! `(owner, name)` pair before any network call is made.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// A parsed `(owner, name)` repository reference. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// Repository owner (user or organization)
    pub owner: String,

    /// Repository name
    pub name: String,
}

impl RepoRef {
    /// Parse a user-supplied reference.
    ///
    /// Two forms are accepted:
    /// - a full URL (`https://github.com/owner/repo`, optionally with a
    ///   trailing slash, extra path segments, query, or fragment)
    /// - the bare `owner/repo` shorthand
    ///
    /// Anything else fails with [`PipelineError::InvalidReference`].
    pub fn parse(input: &str) -> Result<Self, PipelineError> {
        let input = input.trim();

        if let Some(rest) = input
            .strip_prefix("https://")
            .or_else(|| input.strip_prefix("http://"))
        {
            let mut segments = rest.splitn(4, '/');
            let host = segments.next().unwrap_or("");
            let owner = segments.next().unwrap_or("");
            let name = clean_name_segment(segments.next().unwrap_or(""));

            if host.is_empty() || !is_valid_segment(owner) || !is_valid_segment(&name) {
                return Err(PipelineError::InvalidReference);
            }

            return Ok(Self {
                owner: owner.to_string(),
                name,
            });
        }

        // Bare owner/repo shorthand: exactly two segments, nothing trailing
        let mut segments = input.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(owner), Some(name), None)
                if is_valid_segment(owner) && is_valid_segment(name) && is_clean_name(name) =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(PipelineError::InvalidReference),
        }
    }

    /// The `owner/name` form used in logs and cache keys
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Cut a URL repo segment at the first path/query/fragment delimiter and
/// strip trailing slashes and whitespace.
fn clean_name_segment(segment: &str) -> String {
    let end = segment
        .find(['/', '#', '?'])
        .unwrap_or(segment.len());
    segment[..end].trim().to_string()
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.chars().any(char::is_whitespace)
}

/// A bare-form name must not carry URL leftovers
fn is_clean_name(name: &str) -> bool {
    !name.contains(['#', '?'])
}
