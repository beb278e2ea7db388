//! In-memory doubles for the provider and the view

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use parking_lot::Mutex;

use crate::api::{GeocodingResult, WeatherSource};
use crate::models::{
    AirQualityIndex, Coordinates, CurrentConditions, ForecastSample, ForecastSeries,
    Precipitation, UvIndex,
};
use crate::presentation::{
    AirQualityGauge, AlertBanner, ChartSeries, CurrentPanel, ForecastPoint, MapView,
    SupplementaryInfo,
};
use crate::view::DashboardView;
use crate::{DashboardError, Endpoint, Result};

pub fn observed_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Conditions whose city name and temperature encode the latitude
pub fn conditions_at(at: Coordinates) -> CurrentConditions {
    CurrentConditions {
        observed_at: observed_at(),
        city_name: format!("Place {}", at.latitude),
        temperature: at.latitude,
        feels_like: at.latitude,
        temp_min: at.latitude - 2.0,
        temp_max: at.latitude + 2.0,
        humidity: 50.0,
        pressure: 1013.0,
        wind_speed_ms: 3.0,
        precipitation: Precipitation::none(),
        cloud_cover: 10,
        sunrise: observed_at() - ChronoDuration::hours(6),
        sunset: observed_at() + ChronoDuration::hours(7),
        utc_offset_seconds: 0,
        category: "Clear".to_string(),
        description: "clear sky".to_string(),
        alert: None,
    }
}

/// Scriptable [`WeatherSource`]
#[derive(Default)]
pub struct FakeSource {
    failing: HashSet<Endpoint>,
    delays: Vec<(f64, Duration)>,
    history_reference: Option<DateTime<Utc>>,
    history_delay: Option<Duration>,
    places: Vec<GeocodingResult>,
    calls: Mutex<HashMap<Endpoint, usize>>,
}

impl FakeSource {
    /// Every call to `endpoint` answers HTTP 500
    pub fn failing(mut self, endpoint: Endpoint) -> Self {
        self.failing.insert(endpoint);
        self
    }

    /// Primary fetches for `latitude` take `delay`
    pub fn slow_at(mut self, latitude: f64, delay: Duration) -> Self {
        self.delays.push((latitude, delay));
        self
    }

    /// Historical requests further before `reference` answer later
    pub fn with_history_delay_by_age(mut self, reference: DateTime<Utc>) -> Self {
        self.history_reference = Some(reference);
        self
    }

    /// Every historical request takes `delay`
    pub fn slow_history(mut self, delay: Duration) -> Self {
        self.history_delay = Some(delay);
        self
    }

    pub fn with_places(mut self, places: &[(&str, f64, f64)]) -> Self {
        self.places = places
            .iter()
            .map(|(name, lat, lon)| GeocodingResult {
                name: (*name).to_string(),
                lat: *lat,
                lon: *lon,
                country: "FR".to_string(),
                state: None,
            })
            .collect();
        self
    }

    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.calls.lock().get(&endpoint).copied().unwrap_or(0)
    }

    pub fn geocode_calls(&self) -> usize {
        self.calls(Endpoint::Geocoding)
    }

    async fn enter(&self, endpoint: Endpoint, at: Option<Coordinates>) -> Result<()> {
        *self.calls.lock().entry(endpoint).or_default() += 1;

        let delay = at.and_then(|at| {
            self.delays
                .iter()
                .find(|(latitude, _)| *latitude == at.latitude)
                .map(|(_, delay)| *delay)
        });
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(&endpoint) {
            Err(DashboardError::Response {
                endpoint,
                status: 500,
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl WeatherSource for FakeSource {
    async fn current_conditions(&self, at: Coordinates) -> Result<CurrentConditions> {
        self.enter(Endpoint::CurrentWeather, Some(at)).await?;
        Ok(conditions_at(at))
    }

    async fn forecast(&self, at: Coordinates) -> Result<ForecastSeries> {
        self.enter(Endpoint::Forecast, Some(at)).await?;
        let samples = (0..40)
            .map(|i| ForecastSample {
                timestamp: observed_at() + ChronoDuration::hours(3 * i),
                temperature: at.latitude + i as f64,
                category: "Clouds".to_string(),
            })
            .collect();
        Ok(ForecastSeries::new(samples, 0))
    }

    async fn air_quality(&self, at: Coordinates) -> Result<AirQualityIndex> {
        self.enter(Endpoint::AirQuality, Some(at)).await?;
        Ok(AirQualityIndex::from_raw(2))
    }

    async fn uv_index(&self, at: Coordinates) -> Result<UvIndex> {
        self.enter(Endpoint::UvIndex, Some(at)).await?;
        Ok(UvIndex::from_raw(4.0))
    }

    async fn historical_conditions(
        &self,
        at: Coordinates,
        when: DateTime<Utc>,
    ) -> Result<CurrentConditions> {
        self.enter(Endpoint::History, None).await?;
        if let Some(reference) = self.history_reference {
            let days = u64::try_from((reference - when).num_days()).unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(5 * days)).await;
        }
        if let Some(delay) = self.history_delay {
            tokio::time::sleep(delay).await;
        }
        let mut conditions = conditions_at(at);
        conditions.observed_at = when;
        Ok(conditions)
    }

    async fn geocode(&self, _query: &str) -> Result<Vec<GeocodingResult>> {
        self.enter(Endpoint::Geocoding, None).await?;
        Ok(self.places.clone())
    }
}

/// Everything a view was asked to show
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Current(CurrentPanel),
    Hourly(Vec<ForecastPoint>),
    Daily(Vec<ForecastPoint>),
    AirQuality(AirQualityGauge),
    Alert(Option<AlertBanner>),
    Supplementary(SupplementaryInfo),
    Map(MapView),
    TemperatureChart(ChartSeries),
    HistoryChart(ChartSeries),
    SavedLocations(Vec<String>),
    Notice(String),
}

/// [`DashboardView`] that records every call
#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<Rendered>>,
    slow_current: Option<(String, Duration)>,
}

impl RecordingView {
    /// Drawing the current panel of `city_name` blocks the thread for `delay`
    pub fn slow_current_for(mut self, city_name: &str, delay: Duration) -> Self {
        self.slow_current = Some((city_name.to_string(), delay));
        self
    }

    pub fn events(&self) -> Vec<Rendered> {
        self.events.lock().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Rendered::Notice(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn current_panels(&self) -> Vec<CurrentPanel> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Rendered::Current(panel) => Some(panel),
                _ => None,
            })
            .collect()
    }

    pub fn history_charts(&self) -> Vec<ChartSeries> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Rendered::HistoryChart(chart) => Some(chart),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Rendered) {
        self.events.lock().push(event);
    }
}

impl DashboardView for RecordingView {
    fn render_current(&self, panel: &CurrentPanel) {
        self.push(Rendered::Current(panel.clone()));
        if let Some((city_name, delay)) = &self.slow_current
            && *city_name == panel.city_name
        {
            std::thread::sleep(*delay);
        }
    }

    fn render_hourly(&self, points: &[ForecastPoint]) {
        self.push(Rendered::Hourly(points.to_vec()));
    }

    fn render_daily(&self, points: &[ForecastPoint]) {
        self.push(Rendered::Daily(points.to_vec()));
    }

    fn render_air_quality(&self, gauge: &AirQualityGauge) {
        self.push(Rendered::AirQuality(gauge.clone()));
    }

    fn render_alert(&self, alert: Option<&AlertBanner>) {
        self.push(Rendered::Alert(alert.cloned()));
    }

    fn render_supplementary(&self, info: &SupplementaryInfo) {
        self.push(Rendered::Supplementary(info.clone()));
    }

    fn render_map(&self, map: &MapView) {
        self.push(Rendered::Map(map.clone()));
    }

    fn render_temperature_chart(&self, chart: &ChartSeries) {
        self.push(Rendered::TemperatureChart(chart.clone()));
    }

    fn render_history_chart(&self, chart: &ChartSeries) {
        self.push(Rendered::HistoryChart(chart.clone()));
    }

    fn render_saved_locations(&self, names: &[String]) {
        self.push(Rendered::SavedLocations(names.to_vec()));
    }

    fn notify(&self, message: &str) {
        self.push(Rendered::Notice(message.to_string()));
    }
}
