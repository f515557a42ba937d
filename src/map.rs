use serde::{Deserialize, Serialize};

use crate::catalog::Location;
use crate::constants::{
    MAP_CONTAINER_ID, POPUP_MAX_WIDTH, POPUP_MIN_WIDTH, TILE_ATTRIBUTION, TILE_URL,
};
use crate::utils::escape_html;

/// Geographic position; serialized as `[lat, lng]` like Leaflet expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(coords: LatLng) -> Self {
        [coords.lat, coords.lng]
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// How the widget should move to a new view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewTransition {
    Instant,
    Pan { duration_secs: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupOptions {
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            max_width: POPUP_MAX_WIDTH,
            min_width: POPUP_MIN_WIDTH,
            auto_close: false,
            close_on_click: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    /// HTML fragment, already escaped.
    pub content: String,
    pub options: PopupOptions,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub coords: LatLng,
    pub popup: Popup,
}

impl Marker {
    /// Marker for a filming location with an opened popup showing its name and image.
    pub fn for_location(location: &Location) -> Self {
        let content = format!(
            "{}<img class=\"movie__img\" src=\"{}\"/>",
            escape_html(&location.name),
            escape_html(&location.img)
        );

        Self {
            coords: location.coords,
            popup: Popup {
                content,
                options: PopupOptions::default(),
                open: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: TILE_URL.to_string(),
            attribution: TILE_ATTRIBUTION.to_string(),
        }
    }
}

/// Where the current view came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewOrigin {
    Located,
    Fallback,
}

/// Surface of the map widget the synchronizer drives.
pub trait MapWidget {
    fn set_view(&mut self, center: LatLng, zoom: u8, transition: ViewTransition);
    fn center(&self) -> LatLng;
    fn zoom(&self) -> u8;
    fn clear_markers(&mut self);
    fn add_marker(&mut self, marker: Marker);
    fn markers(&self) -> &[Marker];
    /// Bumped by every programmatic view change so renderers move only when asked to.
    fn view_revision(&self) -> u64;
    /// Continues the revision sequence of the widget this one replaces.
    fn resume_revisions(&mut self, previous: u64);
}

/// Headless map: records view and marker layer so the browser can replay them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub container: String,
    pub center: LatLng,
    pub zoom: u8,
    pub tile_layer: TileLayer,
    pub markers: Vec<Marker>,
    pub transition: ViewTransition,
    pub origin: ViewOrigin,
    /// Center the view was created at, before any panning.
    pub home: LatLng,
    pub notice: Option<String>,
    pub view_revision: u64,
}

impl MapView {
    pub fn new(center: LatLng, zoom: u8, origin: ViewOrigin) -> Self {
        Self {
            container: MAP_CONTAINER_ID.to_string(),
            center,
            zoom,
            tile_layer: TileLayer::default(),
            markers: Vec::new(),
            transition: ViewTransition::Instant,
            origin,
            home: center,
            notice: None,
            view_revision: 0,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    pub fn with_tile_layer(mut self, tile_layer: TileLayer) -> Self {
        self.tile_layer = tile_layer;
        self
    }

    /// A fresh view replaces `current` only when it carries a position `current`
    /// does not already show. A failed query never discards a located view.
    pub fn supersedes(&self, current: &MapView) -> bool {
        self.origin == ViewOrigin::Located
            && !(current.origin == ViewOrigin::Located && current.home == self.home)
    }
}

impl MapWidget for MapView {
    fn set_view(&mut self, center: LatLng, zoom: u8, transition: ViewTransition) {
        self.center = center;
        self.zoom = zoom;
        self.transition = transition;
        self.view_revision += 1;
    }

    fn center(&self) -> LatLng {
        self.center
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn markers(&self) -> &[Marker] {
        &self.markers
    }

    fn view_revision(&self) -> u64 {
        self.view_revision
    }

    fn resume_revisions(&mut self, previous: u64) {
        self.view_revision = previous + 1;
    }
}
