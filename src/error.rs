use thiserror::Error;

/// Failures while fetching or decoding the movie catalog.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Catalog resource not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog server answered with status {0}")]
    Status(u16),

    #[error("Malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid coordinates for location '{location}': [{lat}, {lng}]")]
    InvalidCoordinates { location: String, lat: f64, lng: f64 },
}

/// Reasons a current-position query produced no coordinates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("Geolocation is not available")]
    Unavailable,

    #[error("Geolocation denied: {0}")]
    Denied(String),

    #[error("Geolocation timed out")]
    TimedOut,

    #[error("Geolocation reported an out-of-range position [{lat}, {lng}]")]
    InvalidPosition { lat: f64, lng: f64 },
}
