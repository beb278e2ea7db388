//! View models handed to render consumers
//!
//! Every panel is built from fetched data before anything is rendered, so a
//! failure while building can never leave the dashboard half updated.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::history::HistoricalPoint;
use crate::insights::{ImpactInputs, activity_impact, dew_point, display_round};
use crate::models::condition::{weather_color, weather_emoji, weather_icon};
use crate::models::weather::local_offset;
use crate::models::{
    AirQualityIndex, Coordinates, CurrentConditions, ForecastSample, ForecastSeries,
    PrecipitationKind, UvIndex,
};
use crate::orchestrator::{DashboardSettings, WeatherSnapshot};
use crate::view::DashboardView;

/// Base map tiles
pub const BASE_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
/// Opacity of the precipitation overlay
pub const OVERLAY_OPACITY: f32 = 0.5;

/// Current-conditions panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentPanel {
    pub city_name: String,
    pub temperature: i64,
    pub condition: String,
    pub description: String,
    pub high: i64,
    pub low: i64,
    pub feels_like: i64,
    pub humidity: f64,
    pub wind_kmh: i64,
    pub pressure: f64,
    pub precipitation: String,
    pub precipitation_type: String,
    pub dew_point: i64,
    pub cloud_cover: u8,
    pub icon: &'static str,
    pub color: &'static str,
    pub emoji: &'static str,
    pub activity_impact: String,
}

impl CurrentPanel {
    #[must_use]
    pub fn from_conditions(conditions: &CurrentConditions) -> Self {
        let temperature = display_round(conditions.temperature);
        let wind_kmh = display_round(conditions.wind_speed_kmh());
        let impact = activity_impact(ImpactInputs {
            temperature: temperature as f64,
            condition: &conditions.category,
            wind_kmh: wind_kmh as f64,
            humidity: conditions.humidity,
        });

        Self {
            city_name: conditions.city_name.clone(),
            temperature,
            condition: conditions.category.clone(),
            description: conditions.description.clone(),
            high: display_round(conditions.temp_max),
            low: display_round(conditions.temp_min),
            feels_like: display_round(conditions.feels_like),
            humidity: conditions.humidity,
            wind_kmh,
            pressure: conditions.pressure,
            precipitation: conditions.precipitation.format_amount(),
            precipitation_type: conditions.precipitation.kind.to_string(),
            dew_point: display_round(dew_point(conditions.temperature, conditions.humidity)),
            cloud_cover: conditions.cloud_cover,
            icon: weather_icon(&conditions.category),
            color: weather_color(&conditions.category),
            emoji: weather_emoji(&conditions.category),
            activity_impact: impact,
        }
    }

    /// Text offered to the host's share intent
    #[must_use]
    pub fn share_text(&self) -> String {
        format!(
            "Current weather in {}: {}° and {}",
            self.city_name, self.temperature, self.condition
        )
    }
}

/// One point of the hourly or daily strip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub label: String,
    pub temperature: i64,
    pub icon: &'static str,
    pub color: &'static str,
}

impl ForecastPoint {
    fn from_sample(sample: &ForecastSample, label: String) -> Self {
        Self {
            label,
            temperature: display_round(sample.temperature),
            icon: weather_icon(&sample.category),
            color: weather_color(&sample.category),
        }
    }
}

fn local(timestamp: DateTime<Utc>, offset: FixedOffset) -> DateTime<FixedOffset> {
    timestamp.with_timezone(&offset)
}

/// Hourly strip, labelled "H:00" in location time
#[must_use]
pub fn hourly_points(forecast: &ForecastSeries) -> Vec<ForecastPoint> {
    let offset = forecast.local_offset();
    forecast
        .hourly_samples()
        .map(|sample| {
            let label = local(sample.timestamp, offset).format("%-H:00").to_string();
            ForecastPoint::from_sample(sample, label)
        })
        .collect()
}

/// Daily strip, "Today" then short weekday names
#[must_use]
pub fn daily_points(forecast: &ForecastSeries) -> Vec<ForecastPoint> {
    let offset = forecast.local_offset();
    forecast
        .daily_samples()
        .enumerate()
        .map(|(index, sample)| {
            let label = if index == 0 {
                "Today".to_string()
            } else {
                local(sample.timestamp, offset).format("%a").to_string()
            };
            ForecastPoint::from_sample(sample, label)
        })
        .collect()
}

/// Air-quality gauge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityGauge {
    pub index: u8,
    pub status: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub width_percent: u8,
}

impl From<AirQualityIndex> for AirQualityGauge {
    fn from(aqi: AirQualityIndex) -> Self {
        Self {
            index: aqi.value(),
            status: aqi.status(),
            description: aqi.description(),
            color: aqi.color(),
            width_percent: aqi.gauge_percent(),
        }
    }
}

/// Alert banner content; the banner is hidden when there is none
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertBanner {
    pub description: String,
    pub source: String,
}

impl AlertBanner {
    #[must_use]
    pub fn from_conditions(conditions: &CurrentConditions) -> Option<Self> {
        conditions.alert.as_ref().map(|alert| Self {
            description: alert.description.clone(),
            source: format!("Source: {}", alert.sender),
        })
    }
}

/// UV, sun times and precipitation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplementaryInfo {
    pub uv_index: i64,
    pub uv_color: &'static str,
    pub sunrise: String,
    pub sunset: String,
    pub precipitation: String,
}

impl SupplementaryInfo {
    #[must_use]
    pub fn new(conditions: &CurrentConditions, uv: UvIndex) -> Self {
        let offset = conditions.local_offset();
        let precipitation = match conditions.precipitation.kind {
            PrecipitationKind::None => "0 mm".to_string(),
            _ => conditions.precipitation.format_amount(),
        };

        Self {
            uv_index: display_round(uv.value()),
            uv_color: uv.color(),
            sunrise: local(conditions.sunrise, offset).format("%I:%M %p").to_string(),
            sunset: local(conditions.sunset, offset).format("%I:%M %p").to_string(),
            precipitation,
        }
    }
}

/// Map centre, marker and tile layers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub marker: Coordinates,
    pub zoom: u8,
    pub base_tiles: String,
    pub overlay_tiles: String,
    pub overlay_opacity: f32,
}

impl MapView {
    #[must_use]
    pub fn centered(at: Coordinates, zoom: u8, overlay_tiles: &str) -> Self {
        Self {
            center: at,
            marker: at,
            zoom,
            base_tiles: BASE_TILE_URL.to_string(),
            overlay_tiles: overlay_tiles.to_string(),
            overlay_opacity: OVERLAY_OPACITY,
        }
    }
}

/// A labelled line chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub dataset_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    /// Temperatures of the leading forecast samples, labelled by hour
    #[must_use]
    pub fn temperature_forecast(forecast: &ForecastSeries) -> Self {
        let offset = forecast.local_offset();
        let (labels, values) = forecast
            .chart_samples()
            .map(|sample| {
                (
                    local(sample.timestamp, offset).format("%H").to_string(),
                    display_round(sample.temperature) as f64,
                )
            })
            .unzip();

        Self {
            title: "24-Hour Temperature Forecast".to_string(),
            dataset_label: "Temperature (°C)".to_string(),
            labels,
            values,
        }
    }

    /// Historical temperatures, in the order given
    #[must_use]
    pub fn history(points: &[HistoricalPoint], utc_offset_seconds: i32) -> Self {
        let offset = local_offset(utc_offset_seconds);
        let (labels, values) = points
            .iter()
            .map(|point| {
                (
                    local(point.timestamp, offset).format("%-m/%-d/%Y").to_string(),
                    point.temperature,
                )
            })
            .unzip();

        Self {
            title: format!("{}-Day Historical Temperature", points.len()),
            dataset_label: "Historical Temperature (°C)".to_string(),
            labels,
            values,
        }
    }
}

/// Every primary panel, built before any of them is rendered
#[derive(Debug, Clone)]
pub struct DashboardPanels {
    pub current: CurrentPanel,
    pub hourly: Vec<ForecastPoint>,
    pub daily: Vec<ForecastPoint>,
    pub air_quality: AirQualityGauge,
    pub alert: Option<AlertBanner>,
    pub supplementary: SupplementaryInfo,
    pub map: MapView,
    pub temperature_chart: ChartSeries,
}

impl DashboardPanels {
    #[must_use]
    pub fn build(snapshot: &WeatherSnapshot, settings: &DashboardSettings) -> Self {
        Self {
            current: CurrentPanel::from_conditions(&snapshot.conditions),
            hourly: hourly_points(&snapshot.forecast),
            daily: daily_points(&snapshot.forecast),
            air_quality: AirQualityGauge::from(snapshot.air_quality),
            alert: AlertBanner::from_conditions(&snapshot.conditions),
            supplementary: SupplementaryInfo::new(&snapshot.conditions, snapshot.uv),
            map: MapView::centered(snapshot.coordinates, settings.map_zoom, &settings.tile_url),
            temperature_chart: ChartSeries::temperature_forecast(&snapshot.forecast),
        }
    }

    /// Hand each panel to its consumer
    pub fn render(&self, view: &dyn DashboardView) {
        view.render_current(&self.current);
        view.render_hourly(&self.hourly);
        view.render_daily(&self.daily);
        view.render_air_quality(&self.air_quality);
        view.render_alert(self.alert.as_ref());
        view.render_supplementary(&self.supplementary);
        view.render_map(&self.map);
        view.render_temperature_chart(&self.temperature_chart);
    }
}
