use serde::Serialize;

use crate::catalog::{Catalog, Location, MovieId};

/// One location row under an expanded movie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubMenuEntry {
    pub movie: MovieId,
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuEntry {
    pub id: MovieId,
    pub title: String,
    pub locations: Vec<SubMenuEntry>,
}

/// Rendered menu tree: every title, with at most one expanded sub-menu.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Menu {
    entries: Vec<MenuEntry>,
    expanded: Option<MovieId>,
}

impl Menu {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let entries = catalog
            .movies()
            .iter()
            .enumerate()
            .map(|(index, movie)| MenuEntry {
                id: MovieId(index),
                title: movie.title.clone(),
                locations: Vec::new(),
            })
            .collect();

        Self {
            entries,
            expanded: None,
        }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn expanded(&self) -> Option<MovieId> {
        self.expanded
    }

    pub fn entry(&self, id: MovieId) -> Option<&MenuEntry> {
        self.entries.get(id.0)
    }

    /// Every rendered sub-menu row, whichever movie it belongs to.
    pub fn sub_menu_entries(&self) -> impl Iterator<Item = &SubMenuEntry> {
        self.entries.iter().flat_map(|entry| entry.locations.iter())
    }

    pub fn remove_sub_menus(&mut self) {
        for entry in &mut self.entries {
            entry.locations.clear();
        }
        self.expanded = None;
    }

    /// Renders one row per location under `id`. Callers remove other sub-menus first.
    pub fn expand<'a>(
        &mut self,
        id: MovieId,
        locations: impl IntoIterator<Item = &'a Location>,
    ) -> Option<&MenuEntry> {
        let entry = self.entries.get_mut(id.0)?;
        entry.locations = locations
            .into_iter()
            .enumerate()
            .map(|(index, location)| SubMenuEntry {
                movie: id,
                index,
                name: location.name.clone(),
            })
            .collect();
        self.expanded = Some(id);
        Some(&*entry)
    }
}
