use std::path::PathBuf;

use hashbrown::HashMap;

use crate::Error;

/// Where to find map data for a place
#[derive(Debug, Clone, Default)]
pub struct NetworkSourceConfig {
    /// Directory holding `<slug>.osm.pbf` extracts
    pub data_dir: PathBuf,
    /// Explicit place name to extract path mapping, checked first
    pub places: HashMap<String, PathBuf>,
}

impl NetworkSourceConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            places: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_place(mut self, place: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.places.insert(place.into(), path.into());
        self
    }

    /// Path of the extract for `place`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlaceNotFound`] if no extract exists for the place.
    pub fn resolve(&self, place: &str) -> Result<PathBuf, Error> {
        let path = self
            .places
            .get(place)
            .cloned()
            .unwrap_or_else(|| self.data_dir.join(format!("{}.osm.pbf", place_slug(place))));

        if path.is_file() {
            Ok(path)
        } else {
            Err(Error::PlaceNotFound(place.to_string()))
        }
    }
}

/// File-name friendly form of a place name: `"Hoboken, New Jersey, USA"` -> `hoboken-new-jersey-usa`
pub fn place_slug(place: &str) -> String {
    let mut slug = String::with_capacity(place.len());
    for ch in place.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
