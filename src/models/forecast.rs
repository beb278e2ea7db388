//! Forecast series and its sampled views

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::weather::local_offset;

/// Samples considered by the hourly strip (24 samples of 3 hours)
pub const HOURLY_WINDOW: usize = 24;
/// One hourly point is shown for every this many samples
pub const HOURLY_STRIDE: usize = 3;
/// One daily point per 8 samples of 3 hours
pub const DAILY_STRIDE: usize = 8;
/// Points in the temperature chart
pub const CHART_POINTS: usize = 8;

/// One forecast sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Coarse category, e.g. "Rain"
    pub category: String,
}

/// Ordered forecast samples at a fixed 3-hour interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub samples: Vec<ForecastSample>,
    /// Shift in seconds from UTC at the location
    pub utc_offset_seconds: i32,
}

impl ForecastSeries {
    #[must_use]
    pub fn new(samples: Vec<ForecastSample>, utc_offset_seconds: i32) -> Self {
        Self {
            samples,
            utc_offset_seconds,
        }
    }

    #[must_use]
    pub fn local_offset(&self) -> FixedOffset {
        local_offset(self.utc_offset_seconds)
    }

    /// Every 3rd sample among the first 24
    pub fn hourly_samples(&self) -> impl Iterator<Item = &ForecastSample> {
        self.samples.iter().take(HOURLY_WINDOW).step_by(HOURLY_STRIDE)
    }

    /// Every 8th sample of the whole series, starting with the first
    pub fn daily_samples(&self) -> impl Iterator<Item = &ForecastSample> {
        self.samples.iter().step_by(DAILY_STRIDE)
    }

    /// Leading samples plotted in the temperature chart
    pub fn chart_samples(&self) -> impl Iterator<Item = &ForecastSample> {
        self.samples.iter().take(CHART_POINTS)
    }
}
