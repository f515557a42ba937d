use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub mod events;
pub mod handlers;
pub mod state;

pub use self::state::AppState;
use handlers::{
    deselect_all, focus_location, get_movies, get_settings, get_state, index_html, locate_map,
    locations_json, map_events_stream, script_js, select_movie, style_css,
};

// Create the main application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_html))
        .route("/style.css", get(style_css))
        .route("/script.js", get(script_js))
        .route("/locations.json", get(locations_json))
        .route("/api/movies", get(get_movies))
        .route("/api/state", get(get_state))
        .route("/api/settings", get(get_settings))
        .route("/api/select", post(select_movie))
        .route("/api/deselect", post(deselect_all))
        .route("/api/focus", post(focus_location))
        .route("/api/map/locate", post(locate_map))
        .route("/api/events", get(map_events_stream))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16, open_browser: bool) -> Result<()> {
    let app = create_app(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let url = format!("http://{}", listener.local_addr()?);
    info!("✅ HTTP server started successfully at {}", url);

    if open_browser {
        if let Err(e) = crate::utils::open_browser(&url) {
            warn!("Could not open browser: {}", e);
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("🛑 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
