//! The static city → café catalog.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::{Error, Result};

/// Read-only mapping from city name to its ordered list of café names.
///
/// Keys are lowercase and lookups are case-sensitive (`"moscow"` matches,
/// `"Moscow"` does not). The catalog is built once at process start and never
/// mutated afterwards, so it can be shared across request handlers without
/// locking.
#[derive(Debug, Clone)]
pub struct CafeCatalog {
    cities: HashMap<String, Vec<String>>,
}

/// On-disk catalog format: a `[cities]` table of city → array of café names.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    cities: HashMap<String, Vec<String>>,
}

impl Default for CafeCatalog {
    fn default() -> Self {
        let mut cities = HashMap::new();
        cities.insert(
            "moscow".to_string(),
            vec![
                "Мир кофе".to_string(),
                "Сладкоежка".to_string(),
                "Кофе и завтраки".to_string(),
                "Сытый студент".to_string(),
            ],
        );
        Self { cities }
    }
}

impl CafeCatalog {
    /// Creates a catalog from an explicit city mapping.
    #[must_use]
    pub fn from_map(cities: HashMap<String, Vec<String>>) -> Self {
        Self { cities }
    }

    /// Parses a catalog from TOML, layered on top of the built-in default set.
    ///
    /// Cities present in the input replace the built-in entry of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCatalog`] if the input is not valid TOML or does
    /// not match the expected shape.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(input).map_err(|e| Error::invalid_catalog(e.to_string()))?;

        let mut catalog = Self::default();
        catalog.cities.extend(file.cities);
        Ok(catalog)
    }

    /// Loads a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Returns the café list for a city, or `None` if the city is unknown.
    #[must_use]
    pub fn cafes(&self, city: &str) -> Option<&[String]> {
        self.cities.get(city).map(Vec::as_slice)
    }

    /// Returns the first `count` cafés for a city, clamped to the list length.
    ///
    /// Returns `None` if the city is unknown.
    #[must_use]
    pub fn first_cafes(&self, city: &str, count: usize) -> Option<&[String]> {
        self.cafes(city).map(|list| &list[..count.min(list.len())])
    }

    /// Returns the number of known cities.
    #[must_use]
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// Iterates over the known city names, in arbitrary order.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.cities.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_moscow() {
        let catalog = CafeCatalog::default();
        let cafes = catalog.cafes("moscow").unwrap();
        assert_eq!(cafes.len(), 4);
        assert_eq!(cafes[0], "Мир кофе");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let catalog = CafeCatalog::default();
        assert!(catalog.cafes("moscow").is_some());
        assert!(catalog.cafes("Moscow").is_none());
    }

    #[test]
    fn test_first_cafes_clamps_to_length() {
        let catalog = CafeCatalog::default();
        assert_eq!(catalog.first_cafes("moscow", 2).unwrap().len(), 2);
        assert_eq!(catalog.first_cafes("moscow", 100).unwrap().len(), 4);
        assert!(catalog.first_cafes("moscow", 0).unwrap().is_empty());
        assert!(catalog.first_cafes("petersburg", 2).is_none());
    }

    #[test]
    fn test_from_toml_str_extends_defaults() {
        let catalog = CafeCatalog::from_toml_str(
            r#"
            [cities]
            tula = ["Пряник", "Самовар"]
            "#,
        )
        .unwrap();

        assert_eq!(catalog.cafes("tula").unwrap().len(), 2);
        // Built-in entries survive.
        assert_eq!(catalog.cafes("moscow").unwrap().len(), 4);
    }

    #[test]
    fn test_from_toml_str_overrides_builtin_entry() {
        let catalog = CafeCatalog::from_toml_str(
            r#"
            [cities]
            moscow = ["Единственное кафе"]
            "#,
        )
        .unwrap();

        assert_eq!(catalog.cafes("moscow").unwrap().len(), 1);
    }

    #[test]
    fn test_from_toml_str_rejects_bad_input() {
        let err = CafeCatalog::from_toml_str("cities = 42").unwrap_err();
        assert!(matches!(err, Error::InvalidCatalog { .. }));
    }
}
