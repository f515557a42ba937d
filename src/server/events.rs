use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::controller::ViewState;
use crate::map::MapView;

pub const MOVIE_SELECTED: &str = "movie_selected";
pub const SELECTION_CLEARED: &str = "selection_cleared";
pub const LOCATION_FOCUSED: &str = "location_focused";
pub const MAP_INITIALIZED: &str = "map_initialized";
pub const HEARTBEAT: &str = "heartbeat";

// SSE event pushed to every open page after a state change
#[derive(Debug, Clone, Serialize)]
pub struct MapEvent {
    pub event_type: String,
    pub state: Option<ViewState<MapView>>,
    pub message: Option<String>,
    pub at: DateTime<Utc>,
}

impl MapEvent {
    pub fn state_changed(event_type: &str, state: ViewState<MapView>, message: String) -> Self {
        Self {
            event_type: event_type.to_string(),
            state: Some(state),
            message: Some(message),
            at: Utc::now(),
        }
    }

    pub fn heartbeat() -> Self {
        Self {
            event_type: HEARTBEAT.to_string(),
            state: None,
            message: Some("SSE connection alive".to_string()),
            at: Utc::now(),
        }
    }
}
