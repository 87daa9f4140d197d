//! Shared command context
//!
//! Consolidates config loading and client construction so command handlers
//! stay small. Credentials are validated lazily, when a command actually
//! needs the corresponding client.

use std::sync::{Arc, Mutex};

use crate::cache::{CacheTtl, DocStore, MemoryCache};
use crate::client::GitHubClient;
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::generate::GeminiClient;
use crate::pipeline::DocPipeline;

/// Context shared by all command handlers
pub struct CommandContext {
    pub config: Config,
}

impl CommandContext {
    /// Load configuration from the default or overridden path
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        Ok(Self {
            config: Config::load(config_path)?,
        })
    }

    /// GitHub client; fails when no token is configured
    pub fn github(&self) -> Result<GitHubClient> {
        let token = self
            .config
            .github_token()
            .ok_or(ConfigError::MissingGitHubToken)?;
        GitHubClient::with_host(token, host_override("REPODOC_GITHUB_HOST"))
    }

    /// Generation client; fails when no API key is configured
    pub fn generator(&self) -> Result<GeminiClient> {
        let key = self
            .config
            .gemini_api_key()
            .ok_or(ConfigError::MissingGeminiKey)?;
        GeminiClient::with_host(
            key,
            &self.config.generation,
            host_override("REPODOC_GEMINI_HOST"),
        )
    }

    /// Open the durable documentation store
    pub fn store(&self) -> Result<DocStore> {
        let store = match &self.config.cache.dir {
            Some(dir) => DocStore::open_at(dir)?,
            None => DocStore::open()?,
        };
        Ok(store)
    }

    /// Build the full pipeline for a one-shot generation.
    ///
    /// An unavailable durable store degrades to cacheless operation, same
    /// as the server.
    pub fn pipeline(&self) -> Result<DocPipeline> {
        let github = Arc::new(self.github()?);
        let generator = Arc::new(self.generator()?);
        let memory = Arc::new(MemoryCache::new(CacheTtl::EPHEMERAL));

        let store = match self.store() {
            Ok(store) => Some(Arc::new(Mutex::new(store))),
            Err(err) => {
                log::warn!("Durable cache unavailable, continuing without it: {}", err);
                None
            }
        };

        Ok(DocPipeline::new(github, generator, memory, store))
    }
}

fn host_override(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_github_client_requires_token() {
        // Guard against ambient credentials leaking into the test
        if std::env::var("GITHUB_TOKEN").is_ok() {
            return;
        }

        let ctx = CommandContext {
            config: Config::default(),
        };
        assert!(ctx.github().is_err());
    }

    #[test]
    fn test_store_respects_configured_dir() {
        let dir = TempDir::new().unwrap();
        let ctx = CommandContext {
            config: Config {
                cache: crate::config::CacheConfig {
                    dir: Some(dir.path().to_path_buf()),
                },
                ..Default::default()
            },
        };

        ctx.store().unwrap();
        assert!(dir.path().join("docs.db").exists());
    }
}
