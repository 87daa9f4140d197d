//! Error types for repodoc

use thiserror::Error;

/// Result type alias for repodoc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Errors from the GitHub and generation API clients
#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum ApiError {
    #[error("Authentication failed. Check your access token (`repodoc init`).")]
    Unauthorized,

    #[error("Access denied. You don't have permission to access this resource.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("GitHub access token not configured. Run `repodoc init` or set GITHUB_TOKEN.")]
    MissingGitHubToken,

    #[error("Gemini API key not configured. Run `repodoc init` or set GEMINI_API_KEY.")]
    MissingGeminiKey,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Durable cache storage errors.
///
/// Always absorbed by the pipeline: a failing durable tier degrades to a
/// cache miss, never to a failed request.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Could not determine cache directory")]
    NoCacheDir,
}

/// Request-level failures of the documentation pipeline.
///
/// These are the only errors that reach the caller; everything
/// transport-level is absorbed into sentinels before this point.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(
        "Invalid GitHub repository URL format. Please use 'username/repository' or a complete GitHub URL."
    )]
    InvalidReference,

    #[error("GitHub access token not configured on the server.")]
    MissingCredential,

    #[error("No files found in the repository.")]
    NoFilesFound,

    #[error("Could not retrieve content from the repository.")]
    EmptyContext,

    #[error(
        "Documentation generation timed out. Try quick mode or fewer context options."
    )]
    GenerationTimeout,

    #[error("Request timed out. Try quick mode or fewer context options.")]
    OverallTimeout,

    #[error("Failed to generate documentation: {0}")]
    GenerationFailed(String),
}

impl PipelineError {
    /// HTTP status code for this failure
    pub fn status(&self) -> u16 {
        match self {
            PipelineError::InvalidReference => 400,
            PipelineError::NoFilesFound => 404,
            PipelineError::GenerationTimeout | PipelineError::OverallTimeout => 504,
            PipelineError::MissingCredential
            | PipelineError::EmptyContext
            | PipelineError::GenerationFailed(_) => 500,
        }
    }

    /// Whether a client should retry with a narrower scope rather than
    /// retrying the same request as-is
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            PipelineError::GenerationTimeout | PipelineError::OverallTimeout
        )
    }
}
