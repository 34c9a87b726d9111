use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "wikijs-mcp", version, about = "MCP server for the Wiki.js GraphQL API")]
struct Cli {
    /// Log filter, e.g. "debug" or "wikijs_graphql=trace". Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the MCP server on stdin/stdout (default).
    Serve,

    /// Load and validate the WIKI_* configuration, then print a summary.
    CheckConfig,

    /// List every tool the server exposes.
    Tools,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the protocol, so logs go to stderr.
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd.unwrap_or(Command::Serve) {
        Command::Serve => commands::serve::run().await,
        Command::CheckConfig => commands::check::run(),
        Command::Tools => commands::tools::run(),
    }
}
