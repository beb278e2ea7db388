//! Render consumers of the dashboard

use crate::presentation::{
    AirQualityGauge, AlertBanner, ChartSeries, CurrentPanel, ForecastPoint, MapView,
    SupplementaryInfo,
};

/// Sink for every panel the dashboard shows.
///
/// Calls are synchronous and infallible: a view only displays what it is
/// handed and never fetches.
pub trait DashboardView: Send + Sync {
    fn render_current(&self, panel: &CurrentPanel);

    fn render_hourly(&self, points: &[ForecastPoint]);

    fn render_daily(&self, points: &[ForecastPoint]);

    fn render_air_quality(&self, gauge: &AirQualityGauge);

    /// `None` hides the banner
    fn render_alert(&self, alert: Option<&AlertBanner>);

    fn render_supplementary(&self, info: &SupplementaryInfo);

    fn render_map(&self, map: &MapView);

    fn render_temperature_chart(&self, chart: &ChartSeries);

    fn render_history_chart(&self, chart: &ChartSeries);

    fn render_saved_locations(&self, names: &[String]);

    /// User-visible notice (failed search, unsupported capability, ...)
    fn notify(&self, message: &str);
}
