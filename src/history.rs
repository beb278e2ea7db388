//! Historical temperatures for the days before now

use chrono::{DateTime, Duration, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::Result;
use crate::api::WeatherSource;
use crate::models::Coordinates;

/// Days of history shown by default
pub const DEFAULT_HISTORY_DAYS: u32 = 7;

/// Temperature observed at a past instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalPoint {
    pub timestamp: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: f64,
}

/// `now`, `now - 1 day`, ... for `days` entries, newest first
#[must_use]
pub fn history_timestamps(now: DateTime<Utc>, days: u32) -> Vec<DateTime<Utc>> {
    (0..i64::from(days))
        .map(|offset| now - Duration::days(offset))
        .collect()
}

/// Fetch one observation per day concurrently, oldest first.
///
/// Any failed request fails the whole series.
#[instrument(skip(source))]
pub async fn fetch_history(
    source: &dyn WeatherSource,
    at: Coordinates,
    now: DateTime<Utc>,
    days: u32,
) -> Result<Vec<HistoricalPoint>> {
    let requests = history_timestamps(now, days).into_iter().map(|when| async move {
        let conditions = source.historical_conditions(at, when).await?;
        Ok::<_, crate::DashboardError>(HistoricalPoint {
            timestamp: when,
            temperature: conditions.temperature,
        })
    });

    let mut points = try_join_all(requests).await?;
    points.sort_by_key(|point| point.timestamp);
    debug!("Fetched {} historical points", points.len());

    Ok(points)
}
