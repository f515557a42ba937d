use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, MovieId};
use crate::constants::FOCUS_PAN_DURATION_SECS;
use crate::map::{LatLng, MapWidget, Marker, ViewTransition};
use crate::menu::{Menu, MenuEntry};

/// Snapshot handed to the browser after every event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState<M> {
    pub map: M,
    pub menu: Menu,
}

/// Keeps the menu tree and the map's marker layer in step with one selected movie.
///
/// Every mutating method runs to completion on `&mut self`, so callers never
/// observe a half-cleared menu or marker layer.
pub struct MovieMapController<M: MapWidget> {
    catalog: Catalog,
    map: M,
    menu: Menu,
}

impl<M: MapWidget> MovieMapController<M> {
    pub fn new(catalog: Catalog, map: M) -> Self {
        let menu = Menu::from_catalog(&catalog);
        Self { catalog, map, menu }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Expands the first movie titled `title`. Unknown titles change nothing.
    pub fn select_movie(&mut self, title: &str) -> Option<&MenuEntry> {
        let Some((id, _)) = self.catalog.find_movie(title) else {
            debug!("No movie titled '{}'", title);
            return None;
        };
        self.select_movie_id(id)
    }

    /// Clears every sub-menu and marker, then rebuilds both for `id`.
    pub fn select_movie_id(&mut self, id: MovieId) -> Option<&MenuEntry> {
        let Some(movie) = self.catalog.movie(id) else {
            debug!("No movie with id {}", id.0);
            return None;
        };

        self.menu.remove_sub_menus();
        self.map.clear_markers();

        for location in &movie.locations {
            self.map.add_marker(Marker::for_location(location));
        }
        debug!(
            "Expanded '{}' with {} locations",
            movie.title,
            movie.locations.len()
        );
        self.menu.expand(id, &movie.locations)
    }

    pub fn deselect_all(&mut self) {
        self.menu.remove_sub_menus();
        self.map.clear_markers();
    }

    /// Pans to the first location named `name` anywhere in the catalog,
    /// keeping the current zoom. Unknown names change nothing.
    pub fn focus_location(&mut self, name: &str) -> Option<LatLng> {
        self.focus_location_at(name, None)
    }

    /// Like [`focus_location`](Self::focus_location), with the zoom the live widget
    /// currently shows when the caller knows it better than the recorded view.
    pub fn focus_location_at(&mut self, name: &str, current_zoom: Option<u8>) -> Option<LatLng> {
        let Some(location) = self.catalog.find_location(name) else {
            debug!("No location named '{}'", name);
            return None;
        };

        let zoom = current_zoom.unwrap_or_else(|| self.map.zoom());
        self.map.set_view(
            location.coords,
            zoom,
            ViewTransition::Pan {
                duration_secs: FOCUS_PAN_DURATION_SECS,
            },
        );
        Some(location.coords)
    }

    /// Swaps in a freshly initialized map. The selection is dropped so the new,
    /// empty marker layer matches the menu.
    pub fn install_map(&mut self, mut map: M) {
        self.deselect_all();
        map.resume_revisions(self.map.view_revision());
        self.map = map;
    }
}

impl<M: MapWidget + Clone> MovieMapController<M> {
    pub fn view_state(&self) -> ViewState<M> {
        ViewState {
            map: self.map.clone(),
            menu: self.menu.clone(),
        }
    }
}
