//! Configuration management for repodoc

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GitHub personal access token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    /// Gemini API key for documentation generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Generation model settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Durable cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for `repodoc serve`
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Generation model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model identifier passed to the generation API
    #[serde(default = "default_model")]
    pub model: String,

    /// Hard cap on generated output size
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Sampling temperature; kept low for focused documentation
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_max_output_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.2
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Durable cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory for the documentation cache database.
    /// Defaults to the platform cache dir (`~/.cache/repodoc`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".repodoc").join("config.yaml"))
    }

    /// Load configuration from the default path, or an explicit override
    pub fn load(path_override: Option<&str>) -> Result<Self> {
        match path_override {
            Some(path) => Self::load_from(PathBuf::from(path)),
            None => Self::load_from(Self::default_path()?),
        }
    }

    /// Load configuration from a specific path.
    ///
    /// A missing file is not an error: credentials may be supplied entirely
    /// through the environment.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::default_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // Config holds credentials; keep it private on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// GitHub token, with the environment taking precedence over the file
    pub fn github_token(&self) -> Option<String> {
        std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.github_token.clone())
    }

    /// Gemini API key, with the environment taking precedence over the file
    pub fn gemini_api_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.gemini_api_key.clone())
    }

    /// Validate that both outbound credentials are present
    pub fn validate_credentials(&self) -> Result<()> {
        if self.github_token().is_none() {
            return Err(ConfigError::MissingGitHubToken.into());
        }
        if self.gemini_api_key().is_none() {
            return Err(ConfigError::MissingGeminiKey.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path().join("nope.yaml")).unwrap();
        assert!(config.github_token.is_none());
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.generation.model, "gemini-1.5-flash-latest");
        assert_eq!(config.generation.max_output_tokens, 2048);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let config = Config {
            github_token: Some("ghp_test".to_string()),
            gemini_api_key: Some("gm_test".to_string()),
            ..Default::default()
        };
        config.save_to(path.clone()).unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.github_token.as_deref(), Some("ghp_test"));
        assert_eq!(loaded.gemini_api_key.as_deref(), Some("gm_test"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "github_token: tok\n").unwrap();

        let config = Config::load_from(path).unwrap();
        assert_eq!(config.github_token.as_deref(), Some("tok"));
        assert_eq!(config.generation.temperature, 0.2);
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "github_token: [broken").unwrap();

        assert!(Config::load_from(path).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_config_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        Config::default().save_to(path.clone()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
