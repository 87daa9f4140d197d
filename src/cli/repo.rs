//! Repository inspection commands

use colored::Colorize;
use tabled::Tabled;

use crate::cli::{CommandContext, OutputFormat};
use crate::client::{GitHubApi, RepoDetails};
use crate::error::Result;
use crate::output::{format_json, format_table};
use crate::reference::RepoRef;

#[derive(Tabled)]
struct RepoRow {
    #[tabled(rename = "REPOSITORY")]
    repository: String,
    #[tabled(rename = "STARS")]
    stars: u64,
    #[tabled(rename = "FORKS")]
    forks: u64,
    #[tabled(rename = "OPEN ISSUES")]
    open_issues: u64,
    #[tabled(rename = "LANGUAGE")]
    language: String,
}

/// Show repository details
pub async fn info(repo: String, format: OutputFormat, ctx: &CommandContext) -> Result<()> {
    let reference = RepoRef::parse(&repo)?;
    let client = ctx.github()?;
    let details = client.get_repo(&reference).await?;

    match format {
        OutputFormat::Json => println!("{}", format_json(&details)?),
        OutputFormat::Table => {
            let rows = vec![RepoRow {
                repository: details.full_name.clone(),
                stars: details.stars,
                forks: details.forks,
                open_issues: details.open_issues,
                language: details.language.clone().unwrap_or_else(|| "-".to_string()),
            }];
            println!("{}", format_table(&rows));
        }
        OutputFormat::Pretty => print_pretty(&details),
    }

    Ok(())
}

fn print_pretty(details: &RepoDetails) {
    println!("{}", details.full_name.bold());
    if let Some(description) = &details.description {
        println!("{}", description);
    }
    println!();
    println!("Stars:        {}", details.stars);
    println!("Forks:        {}", details.forks);
    println!("Open issues:  {}", details.open_issues);
    if let Some(language) = &details.language {
        println!("Language:     {}", language);
    }
    if let Some(branch) = &details.default_branch {
        println!("Branch:       {}", branch);
    }
    if let Some(updated) = &details.updated_at {
        println!("Updated:      {}", updated.format("%Y-%m-%d %H:%M"));
    }
}
