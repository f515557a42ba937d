// Port configuration
pub const DEFAULT_PORT: u16 = 3001;

// Map view defaults
pub const MAP_CONTAINER_ID: &str = "map";
pub const DEFAULT_CENTER: (f64, f64) = (52.5, 13.4);
pub const DEFAULT_ZOOM: u8 = 10;
pub const LOCATED_ZOOM: u8 = 12;
pub const GEOLOCATION_TIMEOUT_MS: u64 = 10_000;
pub const FOCUS_PAN_DURATION_SECS: f64 = 1.0;
pub const POSITION_NOTICE: &str = "Could not get your position";

// Tile layer
pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

// Popup sizing (pixels)
pub const POPUP_MAX_WIDTH: u32 = 200;
pub const POPUP_MIN_WIDTH: u32 = 100;

// Catalog loading
pub const EMBEDDED_CATALOG: &str = "locations.json";
pub const CATALOG_REQUEST_TIMEOUT_SECS: u64 = 15;
