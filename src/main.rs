//! repodoc - AI documentation generator for GitHub repositories

use clap::Parser;

mod cache;
mod cli;
mod client;
mod config;
mod error;
mod fetcher;
mod generate;
mod output;
mod pipeline;
mod reference;
mod server;

use cli::{CacheCommands, Cli, CommandContext, Commands, RepoCommands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Init => cli::init::run(cli.config.as_deref()).await,
        Commands::Version => {
            println!("repodoc version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Status => {
            let ctx = CommandContext::load(cli.config.as_deref())?;
            cli::status::run(cli.format, cli.config.as_deref(), &ctx)
        }
        Commands::Serve { bind } => {
            let ctx = CommandContext::load(cli.config.as_deref())?;
            cli::serve::run(bind, ctx).await
        }
        Commands::Generate(args) => {
            let ctx = CommandContext::load(cli.config.as_deref())?;
            cli::generate::run(args, cli.format, &ctx).await
        }
        Commands::Repo(repo_cmd) => match repo_cmd {
            RepoCommands::Info { repo } => {
                let ctx = CommandContext::load(cli.config.as_deref())?;
                cli::repo::info(repo, cli.format, &ctx).await
            }
        },
        Commands::Cache(cache_cmd) => {
            let ctx = CommandContext::load(cli.config.as_deref())?;
            match cache_cmd {
                CacheCommands::Status => cli::cache::status(cli.format, &ctx),
                CacheCommands::Clear => cli::cache::clear(cli.format, &ctx),
                CacheCommands::Path => cli::cache::path(&ctx),
            }
        }
    }
}
