mod config;
mod error;
mod probe;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fetch::{ClientConfig, Fetcher, HttpCall, ReqwestExecutor};
use tracing_subscriber::EnvFilter;

use config::Config;
use error::Result;

const CONFIG_FILE: &str = "fetch.toml";

#[derive(Parser)]
#[command(name = "fetchctl")]
#[command(about = "Fetch JSON over HTTP and report classified failures", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Base URL relative paths are resolved against
    #[arg(long)]
    base_url: Option<String>,

    /// Whole-call timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Check connectivity when a host fails to resolve
    #[arg(long)]
    probe: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a JSON document and pretty-print it
    Get {
        /// Path relative to the base URL, or an absolute URL
        path: String,
    },
    /// Fetch without a payload and report success
    Ping {
        /// Path relative to the base URL, or an absolute URL
        path: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(&cli.config)?;
    let client = config.client_config(cli.base_url.as_deref(), cli.timeout)?;

    let mut fetcher = Fetcher::from_config(&client)?;
    if cli.probe {
        fetcher = fetcher.with_probe(config.tcp_probe()?);
    }

    match cli.command {
        Commands::Get { path } => cmd_get(&fetcher, &client, &path).await,
        Commands::Ping { path } => cmd_ping(&fetcher, &client, &path).await,
    }
}

async fn cmd_get(
    fetcher: &Fetcher<ReqwestExecutor>,
    client: &ClientConfig,
    path: &str,
) -> Result<()> {
    let call: HttpCall<serde_json::Value> = HttpCall::get(client.endpoint(path)?);
    let value = fetcher.fetch_result(call).await?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &value)?;
    writeln!(stdout)?;
    Ok(())
}

async fn cmd_ping(
    fetcher: &Fetcher<ReqwestExecutor>,
    client: &ClientConfig,
    path: &str,
) -> Result<()> {
    let call: HttpCall<()> = HttpCall::get(client.endpoint(path)?);
    fetcher.fetch_result(call).await?;
    println!("ok");
    Ok(())
}
