// rest_api/src/main.rs

// Entry point for the MediAlert API server.

use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use tokio::sync::oneshot;

use rest_api::config::load_config;
use rest_api::start_server;

#[derive(Debug, Parser)]
#[command(name = "medialert", version, about = "MediAlert emergency triage API")]
struct Cli {
    /// YAML configuration file.
    #[arg(long, short = 'c', env = "MEDIALERT_CONFIG", value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Directory for the embedded database.
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    data_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config)?;
    config.apply_cli_overrides(cli.host, cli.port, cli.data_dir);

    info!("Starting MediAlert on {}:{}", config.server.host, config.server.port);

    // Held for the lifetime of the server; Ctrl-C is the normal way out.
    let (_shutdown_tx, shutdown_rx) = oneshot::channel();
    start_server(config, shutdown_rx).await
}
