//! Generate command implementation

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{CommandContext, GenerateArgs, OutputFormat};
use crate::error::Result;
use crate::output::format_json;
use crate::pipeline::{ContextOptions, DocRequest};

/// Run the generate command
pub async fn run(args: GenerateArgs, format: OutputFormat, ctx: &CommandContext) -> Result<()> {
    let pipeline = ctx.pipeline()?;

    let options = ContextOptions {
        include_readme: !args.no_readme,
        include_source_code: !args.no_source,
        include_issues: args.issues,
        include_pull_requests: args.pull_requests,
        quick_mode: !args.full,
        custom_prompt: args.prompt.clone(),
    };

    let request = DocRequest {
        repo_url: args.repo.clone(),
        options: Some(options),
        force_refresh: args.refresh,
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .expect("static template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]),
    );
    spinner.set_message(format!("Generating documentation for {}", args.repo));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = pipeline.run(&request).await;
    spinner.finish_and_clear();

    let result = result?;

    if result.from_cache {
        eprintln!(
            "{}",
            "Documentation served from cache (use --refresh to regenerate)".cyan()
        );
    }

    match format {
        OutputFormat::Json => {
            let json = format_json(&serde_json::json!({
                "documentation": result.documentation,
                "fromCache": result.from_cache,
                "cachedAt": result.cached_at,
            }))?;
            emit(&json, args.output.as_deref())?;
        }
        _ => emit(&result.documentation, args.output.as_deref())?,
    }

    if let Some(path) = &args.output {
        eprintln!("{}", format!("✓ Documentation written to {}", path).green());
    }

    Ok(())
}

fn emit(content: &str, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, content).map_err(Into::into),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
