//! Location Resolution Module
//!
//! Turns free-text queries into [`Location`]s and provides the device
//! position seam used by "current location".

use async_trait::async_trait;
use tracing::debug;

use crate::api::WeatherSource;
use crate::models::{Coordinates, Location};
use crate::{DashboardError, Result};

/// Parsed form of a search query
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Literal "lat,lon" or "lat lon"
    Coordinates(Coordinates),
    /// Place name to geocode
    Name(String),
}

/// Parser for search queries
pub struct LocationParser;

impl LocationParser {
    /// Parse a query; anything that is not a valid coordinate pair is a name
    pub fn parse(input: &str) -> Result<LocationInput> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DashboardError::validation("Search query is empty"));
        }

        match Self::parse_coordinates(input) {
            Some(coordinates) => Ok(LocationInput::Coordinates(coordinates)),
            None => Ok(LocationInput::Name(input.to_string())),
        }
    }

    /// "46.8182,8.2275", "46.8182 8.2275" or "46.8182, 8.2275"
    fn parse_coordinates(input: &str) -> Option<Coordinates> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        let [lat, lon] = parts.as_slice() else {
            return None;
        };

        let coordinates = Coordinates::new(lat.parse().ok()?, lon.parse().ok()?);
        coordinates.is_valid().then_some(coordinates)
    }
}

/// Service for resolving location inputs
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a parsed query; names use the geocoder's best match
    pub async fn resolve(source: &dyn WeatherSource, input: LocationInput) -> Result<Location> {
        debug!("Resolving location input: {:?}", input);

        let location = match input {
            LocationInput::Coordinates(at) => Location::new(at.latitude, at.longitude),
            LocationInput::Name(name) => Self::resolve_name(source, &name).await?,
        };

        debug!(
            "Resolved location: {} at ({}, {})",
            location.display_label(),
            location.latitude,
            location.longitude
        );

        Ok(location)
    }

    async fn resolve_name(source: &dyn WeatherSource, name: &str) -> Result<Location> {
        debug!("Geocoding location name: {}", name);

        let geocoding = source
            .geocode(name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DashboardError::no_results(name))?;

        debug!(
            "Found location: {} ({:.4}, {:.4})",
            geocoding.name, geocoding.lat, geocoding.lon
        );

        Ok(Location::from(geocoding))
    }
}

/// Source of the device's current position
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates>;
}

/// Position fixed by configuration
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(Coordinates);

impl FixedPosition {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self(Coordinates::new(latitude, longitude))
    }
}

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates> {
        if self.0.is_valid() {
            Ok(self.0)
        } else {
            Err(DashboardError::validation(format!(
                "Configured position {} is out of range",
                self.0.format()
            )))
        }
    }
}
