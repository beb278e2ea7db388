//! Current-conditions model and display helpers

use std::fmt;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Kind of precipitation currently falling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PrecipitationKind {
    #[default]
    None,
    Rain,
    Snow,
}

impl fmt::Display for PrecipitationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PrecipitationKind::None => "None",
            PrecipitationKind::Rain => "Rain",
            PrecipitationKind::Snow => "Snow",
        };
        f.write_str(label)
    }
}

/// Precipitation amount and kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Precipitation {
    pub kind: PrecipitationKind,
    /// Millimetres over the last reported bucket (1h, else 3h)
    pub amount_mm: f64,
}

impl Precipitation {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// "None" when nothing falls, otherwise "<amount> mm"
    #[must_use]
    pub fn format_amount(&self) -> String {
        match self.kind {
            PrecipitationKind::None => "None".to_string(),
            _ => format!("{} mm", self.amount_mm),
        }
    }
}

/// Active weather alert reported with the conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub sender: String,
    pub description: String,
}

/// Current conditions at one location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Observation time
    pub observed_at: DateTime<Utc>,
    /// Place name reported by the provider
    pub city_name: String,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Apparent temperature in Celsius
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Wind speed in m/s
    pub wind_speed_ms: f64,
    pub precipitation: Precipitation,
    /// Cloud cover percentage (0-100)
    pub cloud_cover: u8,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    /// Shift in seconds from UTC at the location
    pub utc_offset_seconds: i32,
    /// Coarse category, e.g. "Clouds"
    pub category: String,
    /// Provider description, e.g. "scattered clouds"
    pub description: String,
    pub alert: Option<WeatherAlert>,
}

impl CurrentConditions {
    /// Wind speed in km/h
    #[must_use]
    pub fn wind_speed_kmh(&self) -> f64 {
        self.wind_speed_ms * 3.6
    }

    /// Time zone of the location
    #[must_use]
    pub fn local_offset(&self) -> FixedOffset {
        local_offset(self.utc_offset_seconds)
    }
}

/// Fixed offset for a UTC shift in seconds, UTC when out of range
#[must_use]
pub fn local_offset(utc_offset_seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_seconds).unwrap_or_else(|| Utc.fix())
}
