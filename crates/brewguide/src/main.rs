//! # Brewguide CLI
//!
//! The command-line interface for the brewguide café lookup service.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;

mod commands;
mod config;
mod telemetry;

#[derive(Parser)]
#[command(name = "brewguide")]
#[command(version)]
#[command(about = "Café lookup HTTP service", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the lookup server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Catalog file (TOML) to layer over the built-in city set
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// List the cities known to the catalog
    Cities {
        /// Catalog file (TOML) to layer over the built-in city set
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// Display version and build info
    Version,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Initialize logging
    let telemetry_config = telemetry::TelemetryConfig::new("brewguide")
        .with_log_level(&cli.log_level);

    let telemetry_config = if cli.json_logs {
        telemetry_config.with_json_logs()
    } else {
        telemetry_config
    };

    telemetry::init_logging(&telemetry_config);

    // Load configuration for default values
    let cfg = config::Config::load();

    match cli.command {
        Commands::Serve {
            host,
            port,
            catalog,
        } => {
            // Fall back to config file values when flags are not given
            let host = host.unwrap_or_else(|| cfg.server_host.clone());
            let port = port.unwrap_or(cfg.server_port);
            let catalog = catalog.or(cfg.catalog_path.clone());
            commands::serve(host, port, catalog, cfg.cors).await?;
        }

        Commands::Cities { catalog } => {
            let catalog = catalog.or(cfg.catalog_path.clone());
            commands::cities(catalog)?;
        }

        Commands::Version => {
            commands::version();
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                config::show_config();
            }
            ConfigAction::Path => {
                println!("{}", config::Config::config_path().display());
            }
        },
    }

    Ok(())
}
