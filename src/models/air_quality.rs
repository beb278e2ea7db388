//! Air-quality index and its fixed lookup tables

use serde::Serialize;
use tracing::warn;

const STATUS: [&str; 5] = ["Good", "Fair", "Moderate", "Poor", "Very Poor"];

const DESCRIPTION: [&str; 5] = [
    "Air quality is satisfactory, and air pollution poses little or no risk.",
    "Air quality is acceptable. However, there may be a risk for some people, particularly those who are unusually sensitive to air pollution.",
    "Members of sensitive groups may experience health effects. The general public is less likely to be affected.",
    "Some members of the general public may experience health effects; members of sensitive groups may experience more serious health effects.",
    "Health alert: The risk of health effects is increased for everyone.",
];

const COLOR: [&str; 5] = ["#00e400", "#ffff00", "#ff7e00", "#ff0000", "#8f3f97"];

/// Air-quality index, always within 1 (good) to 5 (very poor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct AirQualityIndex(u8);

impl AirQualityIndex {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Build from a raw provider value, clamping anything outside 1-5
    #[must_use]
    pub fn from_raw(raw: i64) -> Self {
        let clamped = raw.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        if clamped != raw {
            warn!("Air-quality index {} out of range, clamped to {}", raw, clamped);
        }
        // clamped fits in u8
        Self(clamped as u8)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    fn slot(self) -> usize {
        usize::from(self.0 - Self::MIN)
    }

    #[must_use]
    pub fn status(self) -> &'static str {
        STATUS[self.slot()]
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        DESCRIPTION[self.slot()]
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        COLOR[self.slot()]
    }

    /// Gauge fill, 20 % per index step
    #[must_use]
    pub fn gauge_percent(self) -> u8 {
        self.0 * 20
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "Good", "#00e400", 20)]
    #[case(2, "Fair", "#ffff00", 40)]
    #[case(3, "Moderate", "#ff7e00", 60)]
    #[case(4, "Poor", "#ff0000", 80)]
    #[case(5, "Very Poor", "#8f3f97", 100)]
    fn test_lookup_tables(
        #[case] raw: i64,
        #[case] status: &str,
        #[case] color: &str,
        #[case] percent: u8,
    ) {
        let aqi = AirQualityIndex::from_raw(raw);
        assert_eq!(aqi.status(), status);
        assert_eq!(aqi.color(), color);
        assert_eq!(aqi.gauge_percent(), percent);
        assert!(!aqi.description().is_empty());
    }

    #[rstest]
    #[case(0, 1)]
    #[case(-3, 1)]
    #[case(6, 5)]
    #[case(250, 5)]
    fn test_out_of_range_is_clamped(#[case] raw: i64, #[case] expected: u8) {
        let aqi = AirQualityIndex::from_raw(raw);
        assert_eq!(aqi.value(), expected);
        assert!(!aqi.status().is_empty());
    }

    #[test]
    fn test_descriptions_follow_severity() {
        let good = AirQualityIndex::from_raw(1);
        assert!(good.description().starts_with("Air quality is satisfactory"));
        assert!(AirQualityIndex::from_raw(5).description().starts_with("Health alert"));
    }
}
