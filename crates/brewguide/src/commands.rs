//! CLI command implementations.

use std::path::{Path, PathBuf};

use color_eyre::eyre::Result;

use brewguide_core::CafeCatalog;
use brewguide_server::{Server, ServerConfig};

/// Start the lookup server.
pub async fn serve(
    host: String,
    port: u16,
    catalog: Option<PathBuf>,
    cors: bool,
) -> Result<()> {
    tracing::info!("Starting brewguide server...");

    let addr = format!("{}:{}", host, port).parse()?;
    let catalog = load_catalog(catalog.as_deref())?;

    let config = ServerConfig::builder().addr(addr).cors(cors).build();
    let server = Server::with_catalog(config, catalog);
    server.run().await?;

    Ok(())
}

/// List the cities known to the catalog.
pub fn cities(catalog: Option<PathBuf>) -> Result<()> {
    let catalog = load_catalog(catalog.as_deref())?;

    let mut names: Vec<&str> = catalog.cities().collect();
    names.sort_unstable();

    for name in names {
        let count = catalog.cafes(name).map_or(0, <[String]>::len);
        println!("{}  ({} cafés)", name, count);
    }

    Ok(())
}

/// Print version and build info.
pub fn version() {
    println!("brewguide {}", env!("CARGO_PKG_VERSION"));
}

fn load_catalog(path: Option<&Path>) -> Result<CafeCatalog> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading catalog file");
            Ok(CafeCatalog::from_toml_file(path)?)
        }
        None => Ok(CafeCatalog::default()),
    }
}
