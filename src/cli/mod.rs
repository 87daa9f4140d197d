//! CLI command definitions and handlers

use clap::{Parser, Subcommand, ValueEnum};

pub mod cache;
pub mod context;
pub mod generate;
pub mod init;
pub mod repo;
pub mod serve;
pub mod status;

pub use context::CommandContext;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-friendly output
    Pretty,
    /// Column-aligned table
    Table,
    /// Machine-readable JSON
    Json,
}

/// repodoc - AI documentation generator for GitHub repositories
#[derive(Parser, Debug)]
#[command(name = "repodoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "REPODOC_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "REPODOC_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "REPODOC_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize repodoc configuration
    Init,

    /// Show configuration and credential status
    Status,

    /// Display version information
    Version,

    /// Start the documentation-generation HTTP server
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Generate documentation for a repository
    Generate(GenerateArgs),

    /// Inspect repositories
    #[command(subcommand)]
    Repo(RepoCommands),

    /// Manage the local documentation cache
    #[command(subcommand)]
    Cache(CacheCommands),
}

/// Arguments for the generate command
#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    /// Repository URL or owner/repo shorthand
    pub repo: String,

    /// Skip the repository README
    #[arg(long)]
    pub no_readme: bool,

    /// Skip source-code files
    #[arg(long)]
    pub no_source: bool,

    /// Include a summary of open issues
    #[arg(long)]
    pub issues: bool,

    /// Include a summary of open pull requests
    #[arg(long)]
    pub pull_requests: bool,

    /// Use the larger full-mode context budget
    #[arg(long)]
    pub full: bool,

    /// Custom generation instructions
    #[arg(long)]
    pub prompt: Option<String>,

    /// Bypass caches and regenerate
    #[arg(long)]
    pub refresh: bool,

    /// Write the documentation to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<String>,
}

/// Repository inspection commands
#[derive(Subcommand, Debug)]
pub enum RepoCommands {
    /// Show repository details
    Info {
        /// Repository URL or owner/repo shorthand
        repo: String,
    },
}

/// Cache management commands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache status/statistics
    Status,

    /// Clear all cached documentation
    Clear,

    /// Show the cache directory path
    Path,
}
