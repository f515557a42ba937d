use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{sse::Event as SseEvent, Html, Json, Response, Sse},
};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::MutexGuard;
use std::time::Duration;
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;
use tracing::{debug, error, info};

use crate::assets::Asset;
use crate::catalog::{Catalog, MovieId};
use crate::constants::EMBEDDED_CATALOG;
use crate::controller::{MovieMapController, ViewState};
use crate::error::GeolocationError;
use crate::geolocation::ReportedPosition;
use crate::html_template::get_map_html;
use crate::map::{LatLng, MapView};
use crate::settings::Settings;

use super::events::{
    MapEvent, LOCATION_FOCUSED, MAP_INITIALIZED, MOVIE_SELECTED, SELECTION_CLEARED,
};
use super::state::AppState;

/// A movie is addressed by its menu id, or by title as a fallback.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MovieRef {
    Id { id: MovieId },
    Title { title: String },
}

#[derive(Debug, Deserialize)]
pub struct FocusRequest {
    pub name: String,
    /// Zoom the browser's widget shows right now; the recorded zoom is used when absent.
    #[serde(default)]
    pub zoom: Option<u8>,
}

/// Browser geolocation result: coordinates, or a `GeolocationPositionError` code and message.
#[derive(Debug, Default, Deserialize)]
pub struct LocateRequest {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub code: Option<u16>,
    pub error: Option<String>,
}

impl LocateRequest {
    pub fn into_reported(self) -> ReportedPosition {
        if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            return ReportedPosition(Ok(LatLng::new(lat, lng)));
        }
        let message = self.error.unwrap_or_else(|| "no position reported".to_string());
        let error = match self.code {
            Some(2) => GeolocationError::Unavailable,
            Some(3) => GeolocationError::TimedOut,
            _ => GeolocationError::Denied(message),
        };
        ReportedPosition(Err(error))
    }
}

type Controller<'a> = MutexGuard<'a, MovieMapController<MapView>>;

fn lock(state: &AppState) -> Result<Controller<'_>, StatusCode> {
    state.controller.lock().map_err(|e| {
        error!("Controller lock poisoned: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

// Broadcasts the new state; having no subscribers is fine
fn publish(state: &AppState, event_type: &str, view: &ViewState<MapView>, message: String) {
    let _ = state
        .event_sender
        .send(MapEvent::state_changed(event_type, view.clone(), message));
}

// HTTP API Handlers
pub async fn get_movies(State(state): State<AppState>) -> Result<Json<Catalog>, StatusCode> {
    let controller = lock(&state)?;
    Ok(Json(controller.catalog().clone()))
}

pub async fn get_state(
    State(state): State<AppState>,
) -> Result<Json<ViewState<MapView>>, StatusCode> {
    let controller = lock(&state)?;
    Ok(Json(controller.view_state()))
}

pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json((*state.settings).clone())
}

pub async fn select_movie(
    State(state): State<AppState>,
    Json(movie): Json<MovieRef>,
) -> Result<Json<ViewState<MapView>>, StatusCode> {
    let mut controller = lock(&state)?;

    let selected = match &movie {
        MovieRef::Id { id } => controller.select_movie_id(*id),
        MovieRef::Title { title } => controller.select_movie(title),
    }
    .map(|entry| entry.title.clone());

    let view = controller.view_state();
    drop(controller);

    match selected {
        Some(title) => {
            info!("🎬 Selected '{}'", title);
            publish(&state, MOVIE_SELECTED, &view, format!("Selected {}", title));
        }
        None => debug!("Ignoring selection of unknown movie {:?}", movie),
    }
    Ok(Json(view))
}

pub async fn deselect_all(
    State(state): State<AppState>,
) -> Result<Json<ViewState<MapView>>, StatusCode> {
    let mut controller = lock(&state)?;
    controller.deselect_all();
    let view = controller.view_state();
    drop(controller);

    publish(&state, SELECTION_CLEARED, &view, "Selection cleared".to_string());
    Ok(Json(view))
}

pub async fn focus_location(
    State(state): State<AppState>,
    Json(request): Json<FocusRequest>,
) -> Result<Json<ViewState<MapView>>, StatusCode> {
    let mut controller = lock(&state)?;
    let target = controller.focus_location_at(&request.name, request.zoom);
    let view = controller.view_state();
    drop(controller);

    if let Some(coords) = target {
        debug!("Focused '{}' at {:.4}, {:.4}", request.name, coords.lat, coords.lng);
        publish(&state, LOCATION_FOCUSED, &view, format!("Focused {}", request.name));
    }
    Ok(Json(view))
}

pub async fn locate_map(
    State(state): State<AppState>,
    Json(request): Json<LocateRequest>,
) -> Result<Json<ViewState<MapView>>, StatusCode> {
    let reported = request.into_reported();
    // Initialize outside the lock: the geolocator may await
    let map = state.initializer.initialize(&reported).await;

    let mut controller = lock(&state)?;
    if !map.supersedes(controller.map()) {
        debug!("Reported position adds nothing to the current view; keeping it");
        return Ok(Json(controller.view_state()));
    }
    controller.install_map(map);
    let view = controller.view_state();
    drop(controller);

    publish(&state, MAP_INITIALIZED, &view, "Map initialized".to_string());
    Ok(Json(view))
}

// SSE endpoint for state changes made by any tab
pub async fn map_events_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let (tx, rx) = mpsc::channel::<Result<SseEvent, Infallible>>(100);

    let mut event_receiver = state.event_sender.subscribe();

    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                event = event_receiver.recv() => match event {
                    Ok(map_event) => map_event,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("SSE subscriber lagged by {} events", skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = tokio::time::sleep(Duration::from_secs(30)) => MapEvent::heartbeat(),
            };

            let sse_event = SseEvent::default()
                .json_data(&event)
                .unwrap_or_else(|_| SseEvent::default().data("Error serializing event"));

            if tx.send(Ok(sse_event)).await.is_err() {
                break; // Client disconnected
            }
        }
    });

    Sse::new(ReceiverStream::new(rx)).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive-message"),
    )
}

pub async fn index_html(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let controller = lock(&state)?;
    Ok(get_map_html(controller.menu()))
}

fn embedded_asset(name: &str, content_type: &'static str) -> Result<Response, StatusCode> {
    let content = Asset::get(name).ok_or(StatusCode::NOT_FOUND)?.data;
    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .body(content.into_owned().into())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

pub async fn style_css() -> Result<Response, StatusCode> {
    embedded_asset("style.css", "text/css")
}

pub async fn script_js() -> Result<Response, StatusCode> {
    embedded_asset("script.js", "application/javascript")
}

pub async fn locations_json() -> Result<Response, StatusCode> {
    embedded_asset(EMBEDDED_CATALOG, "application/json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_ref_accepts_id_or_title() {
        let by_id: MovieRef = serde_json::from_str(r#"{ "id": 3 }"#).unwrap();
        assert!(matches!(by_id, MovieRef::Id { id: MovieId(3) }));

        let by_title: MovieRef = serde_json::from_str(r#"{ "title": "Heat" }"#).unwrap();
        assert!(matches!(by_title, MovieRef::Title { ref title } if title == "Heat"));
    }

    #[test]
    fn focus_request_zoom_is_optional() {
        let bare: FocusRequest = serde_json::from_str(r#"{ "name": "Tokyo" }"#).unwrap();
        assert_eq!(bare.zoom, None);

        let live: FocusRequest = serde_json::from_str(r#"{ "name": "Tokyo", "zoom": 16 }"#).unwrap();
        assert_eq!(live.zoom, Some(16));
    }

    #[test]
    fn locate_request_maps_browser_errors() {
        let located = LocateRequest { lat: Some(1.0), lng: Some(2.0), ..Default::default() };
        assert_eq!(located.into_reported().0, Ok(LatLng::new(1.0, 2.0)));

        let timed_out = LocateRequest { code: Some(3), ..Default::default() };
        assert_eq!(timed_out.into_reported().0, Err(GeolocationError::TimedOut));

        let denied = LocateRequest {
            code: Some(1),
            error: Some("User denied Geolocation".to_string()),
            ..Default::default()
        };
        assert_eq!(
            denied.into_reported().0,
            Err(GeolocationError::Denied("User denied Geolocation".to_string()))
        );
    }
}
