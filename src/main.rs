mod cli;
mod commands;
mod config;
mod mcp;
mod page_range;
mod pdf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, OutputKind};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    // stdout belongs to command output and the MCP transport
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server(config).await?;
        }
        Commands::Info { path } => {
            println!("{}", commands::info::run(&path)?);
        }
        Commands::Images { inputs, output } => {
            let output = config.output_path(output.as_deref(), OutputKind::Images);
            println!("{}", commands::images::run(&inputs, output)?);
        }
        Commands::Merge { inputs, output } => {
            let output = config.output_path(output.as_deref(), OutputKind::Merged);
            println!("{}", commands::merge::run(&inputs, output)?);
        }
        Commands::Extract {
            path,
            pages,
            output,
        } => {
            let ranges = config.ranges_or_default(pages.as_deref());
            let output = config.output_path(output.as_deref(), OutputKind::Extracted);
            println!("{}", commands::extract::run(&path, ranges, output)?);
        }
        Commands::Compress { path, output } => {
            let output = config.output_path(output.as_deref(), OutputKind::Compressed);
            println!("{}", commands::compress::run(&path, output)?);
        }
        Commands::Ranges { pages, total } => {
            println!("{}", commands::ranges::run(&pages, total));
        }
    }

    Ok(())
}
