//! Serve command implementation

use crate::cli::CommandContext;
use crate::error::Result;
use crate::server;

/// Start the HTTP server
pub async fn run(bind: Option<String>, ctx: CommandContext) -> Result<()> {
    let mut config = ctx.config;
    if let Some(bind) = bind {
        config.server.bind = bind;
    }

    server::run_server(&config).await
}
