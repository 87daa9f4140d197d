//! Init command implementation

use colored::Colorize;
use dialoguer::{Password, theme::ColorfulTheme};

use crate::cli::CommandContext;
use crate::client::{GitHubApi, GitHubClient};
use crate::config::Config;
use crate::error::Result;

/// Run the init command
///
/// Prompts for both outbound credentials, validates the GitHub token by
/// looking up its user, and writes the config file.
pub async fn run(config_path: Option<&str>) -> Result<()> {
    println!("{}", "Welcome to repodoc!".bold().green());
    println!("Let's set up your credentials.\n");

    let github_token: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter your GitHub personal access token")
        .interact()?;

    println!("\n{}", "Validating GitHub token...".cyan());
    let client = GitHubClient::with_host(
        github_token.clone(),
        std::env::var("REPODOC_GITHUB_HOST").ok(),
    )?;
    let login = client.viewer_login().await?;
    println!("{}", format!("✓ Authenticated as {}", login).green());

    let gemini_api_key: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter your Gemini API key")
        .interact()?;

    // Keep any non-credential settings the user already has
    let ctx = CommandContext::load(config_path)?;
    let config = Config {
        github_token: Some(github_token),
        gemini_api_key: Some(gemini_api_key),
        ..ctx.config
    };

    match config_path {
        Some(path) => config.save_to(path.into())?,
        None => config.save()?,
    }

    println!("\n{}", "✓ Configuration saved.".green());
    println!("Try: {}", "repodoc generate octocat/hello-world".bold());

    Ok(())
}
