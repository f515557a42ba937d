pub mod assets;
pub mod catalog;
pub mod constants;
pub mod controller;
pub mod error;
pub mod geolocation;
pub mod html_template;
pub mod loader;
pub mod logger;
pub mod map;
pub mod menu;
pub mod server;
pub mod settings;
pub mod utils;

pub use catalog::{Catalog, Location, Movie, MovieId};
pub use controller::{MovieMapController, ViewState};
pub use error::{GeolocationError, LoadError};
pub use geolocation::{Geolocator, MapInitializer};
pub use map::{LatLng, MapView, MapWidget};
pub use server::{create_app, start_server, AppState};
pub use settings::Settings;
