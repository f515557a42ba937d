use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use super::events::MapEvent;
use crate::controller::MovieMapController;
use crate::geolocation::MapInitializer;
use crate::map::MapView;
use crate::settings::Settings;

pub type SharedController = Arc<Mutex<MovieMapController<MapView>>>;

// Application state shared by every handler; one controller for all tabs
#[derive(Clone)]
pub struct AppState {
    pub controller: SharedController,
    pub initializer: Arc<MapInitializer>,
    pub settings: Arc<Settings>,
    pub event_sender: broadcast::Sender<MapEvent>,
}

impl AppState {
    pub fn new(
        controller: MovieMapController<MapView>,
        initializer: MapInitializer,
        settings: Settings,
    ) -> Self {
        let (event_sender, _event_receiver) = broadcast::channel(100);
        Self {
            controller: Arc::new(Mutex::new(controller)),
            initializer: Arc::new(initializer),
            settings: Arc::new(settings),
            event_sender,
        }
    }
}
