//! Safedesk - incident query server for the safety dashboard.

use anyhow::Result;
use safedesk::cli::Cli;
use safedesk::config::{init_logging, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    // Load errors surface again from the command itself.
    let configured = Settings::load(cli.config.as_deref())
        .ok()
        .map(|settings| settings.server.log_level);
    init_logging(cli.log_level.as_deref(), configured.as_deref())?;

    cli.run().await
}
