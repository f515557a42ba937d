use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::LoadError;
use crate::map::LatLng;

/// Position of a movie in the catalog; stable for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub coords: LatLng,
    pub img: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    #[serde(rename = "location", default)]
    pub locations: Vec<Location>,
}

/// Ordered, immutable list of movies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    /// Decodes `{ "movies": [...] }` and rejects out-of-range coordinates.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), LoadError> {
        for location in self.movies.iter().flat_map(|m| m.locations.iter()) {
            if !location.coords.is_valid() {
                return Err(LoadError::InvalidCoordinates {
                    location: location.name.clone(),
                    lat: location.coords.lat,
                    lng: location.coords.lng,
                });
            }
        }
        Ok(())
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(id.0)
    }

    /// First movie with this title.
    pub fn find_movie(&self, title: &str) -> Option<(MovieId, &Movie)> {
        self.movies
            .iter()
            .enumerate()
            .find(|(_, movie)| movie.title == title)
            .map(|(index, movie)| (MovieId(index), movie))
    }

    /// First location with this name across every movie, in catalog order.
    pub fn find_location(&self, name: &str) -> Option<&Location> {
        self.movies
            .iter()
            .flat_map(|movie| movie.locations.iter())
            .find(|location| location.name == name)
    }

    pub fn duplicate_titles(&self) -> Vec<&str> {
        duplicates(self.movies.iter().map(|m| m.title.as_str()))
    }

    pub fn duplicate_location_names(&self) -> Vec<&str> {
        duplicates(
            self.movies
                .iter()
                .flat_map(|m| m.locations.iter())
                .map(|l| l.name.as_str()),
        )
    }
}

fn duplicates<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    for name in names {
        if !seen.insert(name) && !repeated.contains(&name) {
            repeated.push(name);
        }
    }
    repeated
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "movies": [
            { "title": "Inception", "location": [
                { "name": "Tokyo", "coords": [35.6, 139.6], "img": "a.jpg" },
                { "name": "Paris", "coords": [48.85, 2.35], "img": "b.jpg" }
            ]},
            { "title": "Before Sunrise", "location": [
                { "name": "Vienna", "coords": [48.2, 16.37], "img": "c.jpg" },
                { "name": "Paris", "coords": [48.86, 2.34], "img": "d.jpg" }
            ]},
            { "title": "Empty" }
        ]
    }"#;

    #[test]
    fn parses_wire_format_in_order() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();

        assert_eq!(catalog.len(), 3);
        let titles: Vec<_> = catalog.movies().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Inception", "Before Sunrise", "Empty"]);
        assert_eq!(catalog.movies()[0].locations[0].coords, LatLng::new(35.6, 139.6));
        assert!(catalog.movies()[2].locations.is_empty());
    }

    #[test]
    fn location_lookup_is_first_match_across_catalog() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();

        let paris = catalog.find_location("Paris").unwrap();
        assert_eq!(paris.img, "b.jpg");
        assert!(catalog.find_location("Atlantis").is_none());
        assert_eq!(catalog.duplicate_location_names(), ["Paris"]);
    }

    #[test]
    fn movie_lookup_by_title_and_id() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();

        let (id, movie) = catalog.find_movie("Before Sunrise").unwrap();
        assert_eq!(id, MovieId(1));
        assert_eq!(catalog.movie(id), Some(movie));
        assert!(catalog.find_movie("Tenet").is_none());
        assert!(catalog.movie(MovieId(9)).is_none());
        assert!(catalog.duplicate_titles().is_empty());
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            Catalog::from_json(r#"{ "films": [] }"#),
            Err(LoadError::Malformed(_))
        ));
        assert!(matches!(
            Catalog::from_json(r#"{ "movies": [{ "title": "X", "location": [{ "name": "N", "coords": [1.0], "img": "" }] }] }"#),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let json = r#"{ "movies": [{ "title": "X", "location": [{ "name": "Nowhere", "coords": [120.0, 0.0], "img": "" }] }] }"#;
        match Catalog::from_json(json) {
            Err(LoadError::InvalidCoordinates { location, lat, .. }) => {
                assert_eq!(location, "Nowhere");
                assert_eq!(lat, 120.0);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
