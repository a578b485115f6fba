//! Attraction catalog
//!
//! A static, read-only table of tourist attractions keyed by city. The catalog
//! is loaded once at startup and shared behind an `Arc`; lookups are an exact,
//! case-insensitive match on the city name.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use crate::{Result, TravelPlannerError};

/// A single point of interest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttractionRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

/// All attractions recorded for one city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityAttractions {
    pub city: String,
    #[serde(default)]
    pub attractions: Vec<AttractionRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct AttractionCatalog {
    entries: Vec<CityAttractions>,
}

impl AttractionCatalog {
    #[must_use]
    pub fn new(entries: Vec<CityAttractions>) -> Self {
        Self { entries }
    }

    /// Load the dataset from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading attractions from: {:?}", path);

        let content = fs::read_to_string(path).map_err(|e| {
            TravelPlannerError::dataset(format!("Failed to read {}: {e}", path.display()))
        })?;

        Self::from_json_str(&content)
    }

    /// Load the dataset, degrading to an empty catalog on any failure
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(catalog) => {
                info!(
                    "Attractions data loaded: {} entries from {}",
                    catalog.len(),
                    path.as_ref().display()
                );
                catalog
            }
            Err(e) => {
                error!("Failed to load attractions dataset: {}", e);
                Self::default()
            }
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let entries: Vec<CityAttractions> = serde_json::from_str(content)
            .map_err(|e| TravelPlannerError::dataset(format!("Invalid attractions JSON: {e}")))?;
        Ok(Self::new(entries))
    }

    /// Attractions of the first city matching `city`, ignoring case and surrounding whitespace
    #[must_use]
    pub fn lookup(&self, city: &str) -> &[AttractionRecord] {
        let wanted = city.trim().to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.city.to_lowercase() == wanted)
            .map(|entry| entry.attractions.as_slice())
            .unwrap_or_default()
    }

    /// Number of city entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.city.as_str())
    }
}
