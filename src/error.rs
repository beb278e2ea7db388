//! Error types and handling for the weather dashboard

use std::fmt;

use thiserror::Error;

/// Remote endpoints the dashboard talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CurrentWeather,
    Forecast,
    AirQuality,
    UvIndex,
    History,
    Geocoding,
}

impl Endpoint {
    /// Fixed message reported when the endpoint answers with a non-success status
    #[must_use]
    pub fn failure_message(self) -> &'static str {
        match self {
            Endpoint::CurrentWeather => "Weather data not found",
            Endpoint::Forecast => "Forecast data not found",
            Endpoint::AirQuality => "Air quality data not found",
            Endpoint::UvIndex => "UV index data not found",
            Endpoint::History => "Historical weather data not found",
            Endpoint::Geocoding => "Location search failed",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::CurrentWeather => "weather",
            Endpoint::Forecast => "forecast",
            Endpoint::AirQuality => "air_pollution",
            Endpoint::UvIndex => "uvi",
            Endpoint::History => "weather (historical)",
            Endpoint::Geocoding => "geo/direct",
        };
        f.write_str(name)
    }
}

/// Main error type for the dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Transport-level failure, the request never produced a response
    #[error("Network error on {endpoint}: {message}")]
    Network { endpoint: Endpoint, message: String },

    /// The provider answered with a non-success status
    #[error("{}: HTTP {status} from {endpoint}", .endpoint.failure_message())]
    Response { endpoint: Endpoint, status: u16 },

    /// The body did not have the expected shape
    #[error("Invalid {endpoint} response: {message}")]
    Decode { endpoint: Endpoint, message: String },

    /// A text search matched nothing
    #[error("No location found for '{query}'")]
    NoResults { query: String },

    /// The host cannot provide a capability (device position, sharing)
    #[error("{capability} is not supported in this environment")]
    UnsupportedCapability { capability: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Saved-location storage errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DashboardError {
    pub fn network<S: Into<String>>(endpoint: Endpoint, message: S) -> Self {
        Self::Network {
            endpoint,
            message: message.into(),
        }
    }

    pub fn decode<S: Into<String>>(endpoint: Endpoint, message: S) -> Self {
        Self::Decode {
            endpoint,
            message: message.into(),
        }
    }

    pub fn no_results<S: Into<String>>(query: S) -> Self {
        Self::NoResults {
            query: query.into(),
        }
    }

    pub fn unsupported<S: Into<String>>(capability: S) -> Self {
        Self::UnsupportedCapability {
            capability: capability.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Network { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            DashboardError::Response { endpoint, .. } => endpoint.failure_message().to_string(),
            DashboardError::Decode { .. } => {
                "The weather service returned unexpected data. Please try again.".to_string()
            }
            DashboardError::NoResults { .. } => {
                "Location not found. Please try another search.".to_string()
            }
            DashboardError::UnsupportedCapability { capability } => {
                format!("{capability} is not supported here. Please search for a location manually.")
            }
            DashboardError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            DashboardError::Storage { .. } => {
                "Saved locations could not be updated.".to_string()
            }
            DashboardError::Validation { message } => format!("Invalid input: {message}"),
            DashboardError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = DashboardError::config("missing API key");
        assert!(matches!(err, DashboardError::Config { .. }));

        let err = DashboardError::no_results("Atlantis");
        assert!(matches!(err, DashboardError::NoResults { .. }));

        let err = DashboardError::unsupported("Geolocation");
        assert!(matches!(err, DashboardError::UnsupportedCapability { .. }));
    }

    #[test]
    fn test_response_error_carries_endpoint_message() {
        let err = DashboardError::Response {
            endpoint: Endpoint::AirQuality,
            status: 500,
        };
        assert_eq!(err.to_string(), "Air quality data not found: HTTP 500 from air_pollution");
        assert_eq!(err.user_message(), "Air quality data not found");
    }

    #[test]
    fn test_user_messages() {
        let err = DashboardError::no_results("nowhere");
        assert!(err.user_message().contains("Location not found"));

        let err = DashboardError::network(Endpoint::Forecast, "timeout");
        assert!(err.user_message().contains("Unable to reach"));

        let err = DashboardError::validation("empty label");
        assert!(err.user_message().contains("empty label"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DashboardError = io_err.into();
        assert!(matches!(err, DashboardError::Io { .. }));
    }
}
