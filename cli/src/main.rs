//! OIB user service CLI
//!
//! ```sh
//! # Run with default config (~/.config/oib-users/config.toml)
//! oib-users
//!
//! # Custom config path, port and export directory
//! oib-users --config /etc/oib-users/config.toml --port 9090 --export-dir /var/lib/oib-users
//!
//! # Validate config without starting
//! oib-users --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use oib_users::config::AppConfig;
use oib_users::server::{init_tracing, ServerHandle, ServerOptions};

/// REST service for users identified by their OIB.
#[derive(Parser, Debug)]
#[command(
    name = "oib-users",
    version,
    about = "REST service for users identified by their Croatian OIB",
    long_about = "Create, fetch and delete users keyed by OIB, and export a user \
                  to a timestamped text file.\n\n\
                  Default config: ~/.config/oib-users/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "OIB_USERS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the database URL.
    #[arg(long)]
    database_url: Option<String>,

    /// Keep users in memory instead of the database.
    #[arg(long)]
    in_memory: bool,

    /// Override the directory export files are written into.
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(oib_users::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Log level applies before the subscriber is installed.
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            if cli.check {
                return Err(e.into());
            }
            error!("Using default configuration.");
        }
    }

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }
    if let Some(url) = cli.database_url {
        info!("CLI override: database url = {}", url);
        config.database.url = url;
    }
    if cli.in_memory {
        info!("CLI override: in-memory store");
        config.database.in_memory = true;
    }
    if let Some(dir) = cli.export_dir {
        info!("CLI override: export directory = {}", dir.display());
        config.export.directory = dir;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.api_address());
        if config.database.in_memory {
            println!("   Database    : in-memory");
        } else {
            println!("   Database    : {}", config.database.connection_url());
        }
        println!("   Export dir  : {}", config.export.directory.display());
        println!("   Log level   : {} ({})", config.logging.level, config.logging.format);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
