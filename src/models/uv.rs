//! UV index and its severity color bands

use serde::Serialize;
use tracing::warn;

/// UV index, finite and non-negative
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct UvIndex(f64);

impl UvIndex {
    /// Build from a raw provider value; negative or non-finite values become 0
    #[must_use]
    pub fn from_raw(raw: f64) -> Self {
        if raw.is_finite() && raw >= 0.0 {
            Self(raw)
        } else {
            warn!("UV index {} out of range, clamped to 0", raw);
            Self(0.0)
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Severity color; each band includes its upper bound
    #[must_use]
    pub fn color(self) -> &'static str {
        match self.0 {
            v if v <= 2.0 => "#299501",
            v if v <= 5.0 => "#F7E401",
            v if v <= 7.0 => "#F85900",
            v if v <= 10.0 => "#D8001D",
            _ => "#6B49C8",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "#299501")]
    #[case(2.0, "#299501")]
    #[case(2.01, "#F7E401")]
    #[case(5.0, "#F7E401")]
    #[case(5.5, "#F85900")]
    #[case(7.0, "#F85900")]
    #[case(7.1, "#D8001D")]
    #[case(10.0, "#D8001D")]
    #[case(10.01, "#6B49C8")]
    #[case(14.0, "#6B49C8")]
    fn test_color_bands(#[case] raw: f64, #[case] color: &str) {
        assert_eq!(UvIndex::from_raw(raw).color(), color);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_invalid_values_are_clamped(#[case] raw: f64) {
        let uv = UvIndex::from_raw(raw);
        assert_eq!(uv.value(), 0.0);
        assert_eq!(uv.color(), "#299501");
    }
}
