//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair, shared by every fetch of one orchestration call
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as a coordinates string
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Whether both values are within the valid geographic range
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A resolved location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Place name (city, town), absent for raw coordinates
    pub name: Option<String>,
    /// State or region, when the geocoder reports one
    pub state: Option<String>,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: Option<String>,
}

impl Location {
    /// Create a location from bare coordinates
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            name: None,
            state: None,
            country: None,
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Label shown in the search box and stored when the location is saved,
    /// e.g. "Springfield, Illinois US"
    #[must_use]
    pub fn display_label(&self) -> String {
        match &self.name {
            Some(name) => {
                let region = [self.state.as_deref(), self.country.as_deref()]
                    .into_iter()
                    .flatten()
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                if region.is_empty() {
                    name.clone()
                } else {
                    format!("{name}, {region}")
                }
            }
            None => self.coordinates().format(),
        }
    }
}
