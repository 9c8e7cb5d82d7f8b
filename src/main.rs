//! moonshot CLI
//!
//! Command-line client for the Moonshot chat-completion service.

use clap::Parser;

use moonshot_sdk::cli::{execute, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    execute(cli).await
}
