use anyhow::Context;
use clap::Parser;

use riskwarden::adapter::inbound::cli::command::Cli;
use riskwarden::adapter::inbound::cli::{execute, output};

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    if let Err(e) = runtime.block_on(execute(cli)) {
        output::error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}
