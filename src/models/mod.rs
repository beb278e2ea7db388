//! Data models for the weather dashboard
//!
//! - Location: geographic coordinates and labels
//! - Weather: current conditions, precipitation and alerts
//! - Forecast: 3-hourly samples and their sampled views
//! - Air quality / UV: index types with their lookup tables
//! - Condition: category to icon / color / emoji tables

pub mod air_quality;
pub mod condition;
pub mod forecast;
pub mod location;
pub mod uv;
pub mod weather;

pub use air_quality::AirQualityIndex;
pub use forecast::{ForecastSample, ForecastSeries};
pub use location::{Coordinates, Location};
pub use uv::UvIndex;
pub use weather::{CurrentConditions, Precipitation, PrecipitationKind, WeatherAlert};
