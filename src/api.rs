//! Weather API client for OpenWeather integration
//!
//! [`WeatherSource`] is the seam between the dashboard and the weather
//! provider. [`OpenWeatherClient`] implements it over HTTP: one GET per
//! call, no retries, every non-success status mapped to a per-endpoint
//! [`DashboardError::Response`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::error::Endpoint;
use crate::models::{
    AirQualityIndex, Coordinates, CurrentConditions, ForecastSeries, Location, UvIndex,
};
use crate::{DashboardError, Result};

/// Maximum number of candidates requested from the geocoder
pub const GEOCODING_LIMIT: u8 = 5;

/// Provider of every piece of weather data the dashboard shows
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current conditions at the coordinates
    async fn current_conditions(&self, at: Coordinates) -> Result<CurrentConditions>;
    /// 3-hourly forecast at the coordinates
    async fn forecast(&self, at: Coordinates) -> Result<ForecastSeries>;
    /// Air-quality index at the coordinates
    async fn air_quality(&self, at: Coordinates) -> Result<AirQualityIndex>;
    /// UV index at the coordinates
    async fn uv_index(&self, at: Coordinates) -> Result<UvIndex>;
    /// Conditions at the coordinates for a past instant
    async fn historical_conditions(
        &self,
        at: Coordinates,
        when: DateTime<Utc>,
    ) -> Result<CurrentConditions>;
    /// Candidate locations for a free-text query, best match first
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodingResult>>;
}

/// Geocoding result from the OpenWeather direct geocoding API
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeocodingResult {
    /// Location name
    pub name: String,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lon: f64,
    /// Country code
    #[serde(default)]
    pub country: String,
    /// State or region
    pub state: Option<String>,
}

impl From<GeocodingResult> for Location {
    fn from(geocoding: GeocodingResult) -> Self {
        Location {
            latitude: geocoding.lat,
            longitude: geocoding.lon,
            name: Some(geocoding.name),
            state: geocoding.state,
            country: Some(geocoding.country).filter(|c| !c.is_empty()),
        }
    }
}

/// OpenWeather HTTP client
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    /// Create a new client; an API key is required
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                DashboardError::config(
                    "Missing OpenWeather API key. Set weather.api_key or WEATHERDASH_WEATHER__API_KEY.",
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("WeatherDash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DashboardError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// GET `{base}/{path}?{query}&appid=...` and decode the JSON body
    #[instrument(skip_all, fields(endpoint = %endpoint))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
        query: &str,
    ) -> Result<T> {
        let url = format!("{}/{}?{}", self.base_url, path, query);
        // logged without the key
        debug!("OpenWeather request URL: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(format!("{url}&appid={}", self.api_key))
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                warn!("Network error on {}: {}", endpoint, e);
                DashboardError::network(endpoint, e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} responded with HTTP {}", endpoint, status);
            return Err(DashboardError::Response {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.json::<T>().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to parse {} response: {}", endpoint, e);
            DashboardError::decode(endpoint, e.to_string())
        })?;

        let total_duration = start_time.elapsed();
        debug!("{} answered in {:.3}s", endpoint, total_duration.as_secs_f64());
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow {} response: {:.3}s",
                endpoint,
                total_duration.as_secs_f64()
            );
        }

        Ok(body)
    }
}

fn position_query(at: Coordinates) -> String {
    format!("lat={}&lon={}", at.latitude, at.longitude)
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current_conditions(&self, at: Coordinates) -> Result<CurrentConditions> {
        let endpoint = Endpoint::CurrentWeather;
        let query = format!("{}&units=metric", position_query(at));
        let response: openweather::CurrentResponse =
            self.get_json(endpoint, "data/2.5/weather", &query).await?;
        response
            .into_conditions()
            .map_err(|message| DashboardError::decode(endpoint, message))
    }

    async fn forecast(&self, at: Coordinates) -> Result<ForecastSeries> {
        let endpoint = Endpoint::Forecast;
        let query = format!("{}&units=metric", position_query(at));
        let response: openweather::ForecastResponse =
            self.get_json(endpoint, "data/2.5/forecast", &query).await?;
        let forecast = response
            .into_series()
            .map_err(|message| DashboardError::decode(endpoint, message))?;
        info!("Retrieved forecast with {} samples", forecast.samples.len());
        Ok(forecast)
    }

    async fn air_quality(&self, at: Coordinates) -> Result<AirQualityIndex> {
        let endpoint = Endpoint::AirQuality;
        let response: openweather::AirPollutionResponse = self
            .get_json(endpoint, "data/2.5/air_pollution", &position_query(at))
            .await?;
        response
            .list
            .first()
            .map(|entry| AirQualityIndex::from_raw(entry.main.aqi))
            .ok_or_else(|| DashboardError::decode(endpoint, "empty air-quality list"))
    }

    async fn uv_index(&self, at: Coordinates) -> Result<UvIndex> {
        let response: openweather::UviResponse = self
            .get_json(Endpoint::UvIndex, "data/2.5/uvi", &position_query(at))
            .await?;
        Ok(UvIndex::from_raw(response.value))
    }

    async fn historical_conditions(
        &self,
        at: Coordinates,
        when: DateTime<Utc>,
    ) -> Result<CurrentConditions> {
        let endpoint = Endpoint::History;
        let query = format!(
            "{}&dt={}&units=metric",
            position_query(at),
            when.timestamp()
        );
        let response: openweather::CurrentResponse =
            self.get_json(endpoint, "data/2.5/weather", &query).await?;
        response
            .into_conditions()
            .map_err(|message| DashboardError::decode(endpoint, message))
    }

    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodingResult>> {
        let url_query = format!(
            "q={}&limit={}",
            urlencoding::encode(query),
            GEOCODING_LIMIT
        );
        let results: Vec<GeocodingResult> = self
            .get_json(Endpoint::Geocoding, "geo/1.0/direct", &url_query)
            .await?;

        if results.is_empty() {
            warn!("No results found for location '{}'", query);
        } else {
            debug!(
                "Geocoding results: {:?}",
                results
                    .iter()
                    .map(|r| format!("{} ({:.4}, {:.4})", r.name, r.lat, r.lon))
                    .collect::<Vec<_>>()
            );
        }

        Ok(results)
    }
}

/// OpenWeather response structures and conversion into the models
mod openweather {
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    use crate::models::{
        CurrentConditions, ForecastSample, ForecastSeries, Precipitation, PrecipitationKind,
        WeatherAlert,
    };

    #[derive(Debug, Deserialize)]
    pub struct MainBlock {
        pub temp: f64,
        pub feels_like: Option<f64>,
        pub temp_min: Option<f64>,
        pub temp_max: Option<f64>,
        #[serde(default)]
        pub pressure: f64,
        #[serde(default)]
        pub humidity: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ConditionBlock {
        pub main: String,
        #[serde(default)]
        pub description: String,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct WindBlock {
        #[serde(default)]
        pub speed: f64,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct CloudsBlock {
        #[serde(default)]
        pub all: u8,
    }

    #[derive(Debug, Deserialize)]
    pub struct VolumeBlock {
        #[serde(rename = "1h")]
        pub one_hour: Option<f64>,
        #[serde(rename = "3h")]
        pub three_hours: Option<f64>,
    }

    impl VolumeBlock {
        fn amount(&self) -> f64 {
            self.one_hour.or(self.three_hours).unwrap_or(0.0)
        }
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct SysBlock {
        #[serde(default)]
        pub sunrise: i64,
        #[serde(default)]
        pub sunset: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct AlertBlock {
        #[serde(default)]
        pub sender_name: String,
        #[serde(default)]
        pub description: String,
    }

    /// Current (or historical) weather response
    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        #[serde(default)]
        pub name: String,
        pub dt: i64,
        pub main: MainBlock,
        #[serde(default)]
        pub weather: Vec<ConditionBlock>,
        #[serde(default)]
        pub wind: WindBlock,
        #[serde(default)]
        pub clouds: CloudsBlock,
        pub rain: Option<VolumeBlock>,
        pub snow: Option<VolumeBlock>,
        #[serde(default)]
        pub sys: SysBlock,
        #[serde(default)]
        pub timezone: i32,
        #[serde(default)]
        pub alerts: Vec<AlertBlock>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastItem {
        pub dt: i64,
        pub main: MainBlock,
        #[serde(default)]
        pub weather: Vec<ConditionBlock>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct CityBlock {
        #[serde(default)]
        pub timezone: i32,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub list: Vec<ForecastItem>,
        #[serde(default)]
        pub city: CityBlock,
    }

    #[derive(Debug, Deserialize)]
    pub struct AqiBlock {
        pub aqi: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct AirPollutionItem {
        pub main: AqiBlock,
    }

    #[derive(Debug, Deserialize)]
    pub struct AirPollutionResponse {
        pub list: Vec<AirPollutionItem>,
    }

    #[derive(Debug, Deserialize)]
    pub struct UviResponse {
        pub value: f64,
    }

    fn timestamp(seconds: i64) -> Result<DateTime<Utc>, String> {
        DateTime::from_timestamp(seconds, 0).ok_or_else(|| format!("invalid timestamp {seconds}"))
    }

    fn category(weather: &[ConditionBlock]) -> (String, String) {
        weather
            .first()
            .map(|w| (w.main.clone(), w.description.clone()))
            .unwrap_or_default()
    }

    impl CurrentResponse {
        pub fn into_conditions(self) -> Result<CurrentConditions, String> {
            let precipitation = match (&self.rain, &self.snow) {
                (Some(rain), _) => Precipitation {
                    kind: PrecipitationKind::Rain,
                    amount_mm: rain.amount(),
                },
                (None, Some(snow)) => Precipitation {
                    kind: PrecipitationKind::Snow,
                    amount_mm: snow.amount(),
                },
                (None, None) => Precipitation::none(),
            };
            let (category, description) = category(&self.weather);
            let alert = self.alerts.into_iter().next().map(|a| WeatherAlert {
                sender: a.sender_name,
                description: a.description,
            });

            Ok(CurrentConditions {
                observed_at: timestamp(self.dt)?,
                city_name: self.name,
                temperature: self.main.temp,
                feels_like: self.main.feels_like.unwrap_or(self.main.temp),
                temp_min: self.main.temp_min.unwrap_or(self.main.temp),
                temp_max: self.main.temp_max.unwrap_or(self.main.temp),
                humidity: self.main.humidity,
                pressure: self.main.pressure,
                wind_speed_ms: self.wind.speed,
                precipitation,
                cloud_cover: self.clouds.all,
                sunrise: timestamp(self.sys.sunrise)?,
                sunset: timestamp(self.sys.sunset)?,
                utc_offset_seconds: self.timezone,
                category,
                description,
                alert,
            })
        }
    }

    impl ForecastResponse {
        pub fn into_series(self) -> Result<ForecastSeries, String> {
            let samples = self
                .list
                .into_iter()
                .map(|item| {
                    Ok(ForecastSample {
                        timestamp: timestamp(item.dt)?,
                        temperature: item.main.temp,
                        category: category(&item.weather).0,
                    })
                })
                .collect::<Result<Vec<_>, String>>()?;
            Ok(ForecastSeries::new(samples, self.city.timezone))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrecipitationKind;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenWeatherClient {
        let config = WeatherConfig {
            api_key: Some("test_api_key_123".to_string()),
            base_url: server.uri(),
            ..WeatherConfig::default()
        };
        OpenWeatherClient::new(&config).unwrap()
    }

    fn current_body() -> serde_json::Value {
        json!({
            "name": "London",
            "dt": 1_717_243_200,
            "timezone": 3600,
            "main": {"temp": 18.4, "feels_like": 17.9, "temp_min": 16.0, "temp_max": 20.2,
                     "pressure": 1012, "humidity": 72},
            "weather": [{"main": "Rain", "description": "light rain"}],
            "wind": {"speed": 5.0},
            "clouds": {"all": 90},
            "rain": {"3h": 1.5},
            "sys": {"sunrise": 1_717_213_000, "sunset": 1_717_272_000}
        })
    }

    #[test]
    fn test_client_requires_api_key() {
        let err = OpenWeatherClient::new(&WeatherConfig::default()).err().unwrap();
        assert!(matches!(err, DashboardError::Config { .. }));
    }

    #[test]
    fn test_geocoding_result_to_location() {
        let geocoding = GeocodingResult {
            name: "Springfield".to_string(),
            lat: 39.8,
            lon: -89.64,
            country: "US".to_string(),
            state: Some("Illinois".to_string()),
        };

        let location: Location = geocoding.into();
        assert_eq!(location.display_label(), "Springfield, Illinois US");
        assert_eq!(location.latitude, 39.8);
        assert_eq!(location.country.as_deref(), Some("US"));
    }

    #[tokio::test]
    async fn test_current_conditions_are_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "51.5"))
            .and(query_param("lon", "-0.12"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "test_api_key_123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;

        let conditions = client_for(&server)
            .current_conditions(Coordinates::new(51.5, -0.12))
            .await
            .unwrap();

        assert_eq!(conditions.city_name, "London");
        assert_eq!(conditions.category, "Rain");
        assert_eq!(conditions.humidity, 72.0);
        assert_eq!(conditions.precipitation.kind, PrecipitationKind::Rain);
        assert_eq!(conditions.precipitation.amount_mm, 1.5);
        assert_eq!(conditions.utc_offset_seconds, 3600);
        assert!(conditions.alert.is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_maps_to_endpoint_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/uvi"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .uv_index(Coordinates::new(1.0, 2.0))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DashboardError::Response {
                endpoint: Endpoint::UvIndex,
                status: 404
            }
        ));
        assert_eq!(err.user_message(), "UV index data not found");
    }

    #[tokio::test]
    async fn test_air_quality_reads_first_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/air_pollution"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"list": [{"main": {"aqi": 3}}, {"main": {"aqi": 5}}]})),
            )
            .mount(&server)
            .await;

        let aqi = client_for(&server)
            .air_quality(Coordinates::new(1.0, 2.0))
            .await
            .unwrap();
        assert_eq!(aqi.value(), 3);
    }

    #[tokio::test]
    async fn test_empty_air_quality_list_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/air_pollution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": []})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .air_quality(Coordinates::new(1.0, 2.0))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_forecast_keeps_sample_order() {
        let server = MockServer::start().await;
        let list: Vec<_> = (0..40i64)
            .map(|i| {
                json!({"dt": 1_717_243_200 + i * 10_800, "main": {"temp": i as f64},
                       "weather": [{"main": "Clouds"}]})
            })
            .collect();
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"list": list, "city": {"timezone": -14400}})),
            )
            .mount(&server)
            .await;

        let forecast = client_for(&server)
            .forecast(Coordinates::new(40.7, -74.0))
            .await
            .unwrap();
        assert_eq!(forecast.samples.len(), 40);
        assert_eq!(forecast.utc_offset_seconds, -14400);
        assert!(forecast.samples.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[tokio::test]
    async fn test_historical_request_carries_timestamp() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("dt", "1717243200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;

        let when = DateTime::from_timestamp(1_717_243_200, 0).unwrap();
        let conditions = client_for(&server)
            .historical_conditions(Coordinates::new(51.5, -0.12), when)
            .await
            .unwrap();
        assert_eq!(conditions.temperature, 18.4);
    }

    #[tokio::test]
    async fn test_geocode_encodes_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "New York"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "New York", "lat": 40.71, "lon": -74.0, "country": "US", "state": "New York"}
            ])))
            .mount(&server)
            .await;

        let results = client_for(&server).geocode("New York").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].state.as_deref(), Some("New York"));
    }
}
