use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};

use tasku_db::config;
use tasku_db::core::db::Backend;
use tasku_db::logging::init_tracing;
use tasku_db::probe::{run_probe, OutputFormat};

/// Connects to the TaskU database and lists its tables.
#[derive(Debug, Parser)]
#[command(name = "tasku-db", version, about)]
struct Cli {
    /// TOML config file (default: <config dir>/tasku/db.toml if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Database backend: mysql or sqlite
    #[arg(long)]
    backend: Option<Backend>,

    /// Database server host
    #[arg(long)]
    host: Option<String>,

    /// Database server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Database name (file path for sqlite)
    #[arg(short, long)]
    database: Option<String>,

    /// Database user
    #[arg(short, long)]
    user: Option<String>,

    /// Print the table list as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize the logging system using tracing subscriber
    init_tracing(cli.debug);

    info!("Starting tasku-db...");

    let mut db_config = match config::resolve(cli.config.as_deref()) {
        Ok(db_config) => db_config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(backend) = cli.backend {
        db_config.backend = backend;
    }
    if let Some(host) = cli.host {
        db_config.host = host;
    }
    if let Some(port) = cli.port {
        db_config.port = port;
    }
    if let Some(database) = cli.database {
        db_config.database = database;
    }
    if let Some(user) = cli.user {
        db_config.user = user;
    }
    debug!(?db_config, "resolved configuration");

    let format = if cli.json { OutputFormat::Json } else { OutputFormat::Text };
    let mut stdout = std::io::stdout().lock();
    match run_probe(db_config, format, &mut stdout) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to write output: {}", e);
            ExitCode::FAILURE
        }
    }
}
