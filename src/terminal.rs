//! Plain-text rendering of the dashboard panels

use weatherdash::DashboardView;
use weatherdash::presentation::{
    AirQualityGauge, AlertBanner, ChartSeries, CurrentPanel, ForecastPoint, MapView,
    SupplementaryInfo,
};

/// Prints every panel to stdout and notices to stderr
pub struct TerminalView;

fn strip(points: &[ForecastPoint]) -> String {
    points
        .iter()
        .map(|point| format!("{} {}°", point.label, point.temperature))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn chart(series: &ChartSeries) -> String {
    series
        .labels
        .iter()
        .zip(&series.values)
        .map(|(label, value)| format!("  {label:>10}  {value:>6.1}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl DashboardView for TerminalView {
    fn render_current(&self, panel: &CurrentPanel) {
        println!(
            "{} {}  {}°C  {} ({})",
            panel.emoji, panel.city_name, panel.temperature, panel.condition, panel.description
        );
        println!(
            "  H: {}°  L: {}°  Feels like: {}°  Dew point: {}°",
            panel.high, panel.low, panel.feels_like, panel.dew_point
        );
        println!(
            "  Humidity: {}%  Wind: {} km/h  Pressure: {} hPa  Clouds: {}%",
            panel.humidity, panel.wind_kmh, panel.pressure, panel.cloud_cover
        );
        println!(
            "  Precipitation: {} ({})",
            panel.precipitation, panel.precipitation_type
        );
        println!("  {}", panel.activity_impact);
        println!("  Share: {}", panel.share_text());
    }

    fn render_hourly(&self, points: &[ForecastPoint]) {
        println!("Hourly: {}", strip(points));
    }

    fn render_daily(&self, points: &[ForecastPoint]) {
        println!("Daily:  {}", strip(points));
    }

    fn render_air_quality(&self, gauge: &AirQualityGauge) {
        println!(
            "Air quality: {} ({}) {}",
            gauge.index, gauge.status, gauge.description
        );
    }

    fn render_alert(&self, alert: Option<&AlertBanner>) {
        if let Some(alert) = alert {
            println!("ALERT: {} [{}]", alert.description, alert.source);
        }
    }

    fn render_supplementary(&self, info: &SupplementaryInfo) {
        println!(
            "UV index: {}  Sunrise: {}  Sunset: {}  Precipitation: {}",
            info.uv_index, info.sunrise, info.sunset, info.precipitation
        );
    }

    fn render_map(&self, map: &MapView) {
        println!("Map: {} (zoom {})", map.center.format(), map.zoom);
    }

    fn render_temperature_chart(&self, series: &ChartSeries) {
        println!("{}\n{}", series.title, chart(series));
    }

    fn render_history_chart(&self, series: &ChartSeries) {
        println!("{}\n{}", series.title, chart(series));
    }

    fn render_saved_locations(&self, names: &[String]) {
        if names.is_empty() {
            println!("No saved locations");
        }
        for name in names {
            println!("* {name}");
        }
    }

    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}
