//! Status command implementation

use colored::Colorize;

use crate::cli::{CommandContext, OutputFormat};
use crate::config::Config;
use crate::error::Result;

/// Show configuration and credential status
pub fn run(format: OutputFormat, config_path: Option<&str>, ctx: &CommandContext) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_string(),
        None => Config::default_path()?.display().to_string(),
    };

    let github_set = ctx.config.github_token().is_some();
    let gemini_set = ctx.config.gemini_api_key().is_some();

    if format == OutputFormat::Json {
        let json = serde_json::json!({
            "config_path": path,
            "github_token_configured": github_set,
            "gemini_api_key_configured": gemini_set,
            "model": ctx.config.generation.model,
            "server_bind": ctx.config.server.bind,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("Config file:    {}", path);
    println!("GitHub token:   {}", presence(github_set));
    println!("Gemini key:     {}", presence(gemini_set));
    println!("Model:          {}", ctx.config.generation.model);
    println!("Server bind:    {}", ctx.config.server.bind);

    if !github_set || !gemini_set {
        println!("\n{}", "Run `repodoc init` to configure credentials.".yellow());
    }

    Ok(())
}

fn presence(set: bool) -> String {
    if set {
        "configured".green().to_string()
    } else {
        "missing".red().to_string()
    }
}
