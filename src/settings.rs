use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_CENTER, DEFAULT_PORT, DEFAULT_ZOOM, GEOLOCATION_TIMEOUT_MS, LOCATED_ZOOM,
};
use crate::geolocation::{FixedPosition, Geolocator, MapInitializer, NoGeolocation};
use crate::loader::CatalogSource;
use crate::map::{LatLng, TileLayer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub port: u16,
    pub catalog: String,
    pub auto_open_browser: bool,
    pub home_lat: Option<f64>,
    pub home_lng: Option<f64>,
    pub default_lat: f64,
    pub default_lng: f64,
    pub default_zoom: u8,
    pub located_zoom: u8,
    pub geolocation_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            catalog: "embedded".to_string(),
            auto_open_browser: false,
            home_lat: None,
            home_lng: None,
            default_lat: DEFAULT_CENTER.0,
            default_lng: DEFAULT_CENTER.1,
            default_zoom: DEFAULT_ZOOM,
            located_zoom: LOCATED_ZOOM,
            geolocation_timeout_ms: GEOLOCATION_TIMEOUT_MS,
        }
    }
}

impl Settings {
    /// Reads `path`, or `movie_map.ini` beside the executable. A missing file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        if !config_path.exists() {
            return Ok(Settings::default());
        }

        let file = File::open(&config_path)
            .with_context(|| format!("Failed to open config file {}", config_path.display()))?;
        let reader = BufReader::new(file);
        let mut config_map = HashMap::new();

        for line in reader.lines() {
            let line = line.context("Failed to read line from config")?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim().to_string(), value.trim().trim_matches('"').to_string());
            }
        }

        Ok(Self::from_map(&config_map))
    }

    /// Unknown keys are ignored; unparsable values keep their defaults.
    fn from_map(config_map: &HashMap<String, String>) -> Self {
        let mut settings = Settings::default();

        if let Some(catalog) = config_map.get("catalog") {
            settings.catalog = catalog.clone();
        }
        if let Some(port) = parse(config_map, "port") {
            settings.port = port;
        }
        if let Some(auto_open) = parse(config_map, "auto_open_browser") {
            settings.auto_open_browser = auto_open;
        }
        settings.home_lat = parse(config_map, "home_lat");
        settings.home_lng = parse(config_map, "home_lng");
        if let Some(lat) = parse(config_map, "default_lat") {
            settings.default_lat = lat;
        }
        if let Some(lng) = parse(config_map, "default_lng") {
            settings.default_lng = lng;
        }
        if let Some(zoom) = parse(config_map, "default_zoom") {
            settings.default_zoom = zoom;
        }
        if let Some(zoom) = parse(config_map, "located_zoom") {
            settings.located_zoom = zoom;
        }
        if let Some(timeout) = parse(config_map, "geolocation_timeout_ms") {
            settings.geolocation_timeout_ms = timeout;
        }

        settings
    }

    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .unwrap_or_default()
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        if path.ends_with("target/debug") || path.ends_with("target/release") {
            path.pop();
            path.pop();
        }
        path.push("movie_map.ini");
        path
    }

    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::parse(&self.catalog)
    }

    /// Startup position source: the configured home, if both coordinates are set.
    pub fn geolocator(&self) -> Box<dyn Geolocator> {
        match (self.home_lat, self.home_lng) {
            (Some(lat), Some(lng)) => Box::new(FixedPosition(LatLng::new(lat, lng))),
            _ => Box::new(NoGeolocation),
        }
    }

    pub fn map_initializer(&self) -> MapInitializer {
        MapInitializer {
            default_center: LatLng::new(self.default_lat, self.default_lng),
            default_zoom: self.default_zoom,
            located_zoom: self.located_zoom,
            timeout: Duration::from_millis(self.geolocation_timeout_ms),
            tile_layer: TileLayer::default(),
        }
    }
}

fn parse<T: std::str::FromStr>(config_map: &HashMap<String, String>, key: &str) -> Option<T> {
    config_map.get(key).and_then(|value| value.parse::<T>().ok())
}
