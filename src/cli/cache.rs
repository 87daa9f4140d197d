//! Cache management commands

use crate::cache::DocStore;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;

/// Show cache status/statistics
pub fn status(format: OutputFormat, ctx: &CommandContext) -> Result<()> {
    let store = ctx.store()?;
    let stats = store.stats()?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "total_entries": stats.total_entries,
                "distinct_repos": stats.distinct_repos,
                "oldest_entry_millis": stats.oldest_entry,
                "newest_entry_millis": stats.newest_entry,
                "path": cache_path_string(ctx),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            println!("Documentation Cache");
            println!("────────────────────────────────────────");
            println!("Location:       {}", cache_path_string(ctx));
            println!("Entries:        {}", stats.total_entries);
            println!("Repositories:   {}", stats.distinct_repos);

            if let Some(oldest) = stats.oldest_entry {
                println!("Oldest entry:   {}", format_millis(oldest));
            }
            if let Some(newest) = stats.newest_entry {
                println!("Newest entry:   {}", format_millis(newest));
            }
        }
    }

    Ok(())
}

/// Clear all cached documentation
pub fn clear(format: OutputFormat, ctx: &CommandContext) -> Result<()> {
    let store = ctx.store()?;
    let stats = store.clear_all()?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "entries_removed": stats.entries_removed,
                "success": true,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            if stats.entries_removed > 0 {
                println!("Cleared {} cached documents", stats.entries_removed);
            } else {
                println!("Cache was already empty");
            }
        }
    }

    Ok(())
}

/// Show the cache directory path
pub fn path(ctx: &CommandContext) -> Result<()> {
    println!("{}", cache_path_string(ctx));
    Ok(())
}

fn cache_path_string(ctx: &CommandContext) -> String {
    match &ctx.config.cache.dir {
        Some(dir) => dir.display().to_string(),
        None => DocStore::cache_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "unknown".to_string()),
    }
}

fn format_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|d| {
            d.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| "unknown".to_string())
}
