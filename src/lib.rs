//! `WeatherDash` - location-driven weather dashboard
//!
//! This library resolves a location (coordinates, text search or device
//! position), fetches current conditions, forecast, air quality, UV index and
//! history from OpenWeather, and hands ready-to-display panels to a
//! [`DashboardView`].

pub mod api;
pub mod config;
pub mod error;
pub mod history;
pub mod insights;
pub mod location_resolver;
pub mod models;
pub mod orchestrator;
pub mod presentation;
pub mod store;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

// Re-export core types for public API
pub use api::{GeocodingResult, OpenWeatherClient, WeatherSource};
pub use config::DashboardConfig;
pub use error::{DashboardError, Endpoint};
pub use location_resolver::{FixedPosition, LocationInput, LocationParser, PositionSource};
pub use models::{
    AirQualityIndex, Coordinates, CurrentConditions, ForecastSeries, Location, UvIndex,
};
pub use orchestrator::{
    Dashboard, DashboardSettings, LocationOutcome, LocationUpdate, WeatherSnapshot,
};
pub use store::{LocalStore, SavedLocations};
pub use view::DashboardView;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DashboardError>;
