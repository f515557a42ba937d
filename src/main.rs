use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use movie_map::catalog::Catalog;
use movie_map::controller::MovieMapController;
use movie_map::loader::{load_catalog, CatalogSource};
use movie_map::logger;
use movie_map::server::{start_server, AppState};
use movie_map::settings::Settings;

/// Browse movies and jump to their filming locations on a map.
#[derive(Parser, Debug)]
#[command(name = "movie_map", version, about)]
struct Cli {
    /// Settings file (defaults to movie_map.ini beside the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Catalog source: "embedded", a JSON file path or an http(s) URL
    #[arg(long)]
    catalog: Option<String>,

    /// Open the map in the default browser once the server is up
    #[arg(long)]
    open: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    info!("🗺️  MovieMap v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(port) = cli.port {
        settings.port = port;
    }
    if let Some(catalog) = cli.catalog {
        settings.catalog = catalog;
    }
    settings.auto_open_browser |= cli.open;
    debug!("Settings: {:?}", settings);

    let source: CatalogSource = settings.catalog_source();
    let catalog = match load_catalog(&source).await {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("❌ Could not load catalog from {}: {}", source, e);
            warn!("   Starting with an empty movie menu");
            Catalog::default()
        }
    };

    let initializer = settings.map_initializer();
    let map = initializer.initialize(settings.geolocator().as_ref()).await;
    let controller = MovieMapController::new(catalog, map);

    let port = settings.port;
    let open_browser = settings.auto_open_browser;
    let state = AppState::new(controller, initializer, settings);

    start_server(state, port, open_browser).await
}
