//! Derived computations used by the panels

const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.7;

const GREAT_DAY: &str = "It's a great day for outdoor activities!";
const COLD: &str = "It's quite cold. Indoor activities might be more comfortable.";
const HOT: &str = "It's very hot. Stay hydrated and avoid prolonged sun exposure.";
const RAINY: &str = "Rainy weather. Consider indoor activities or bring an umbrella.";
const SNOWY: &str = "Snowy conditions. Be cautious if driving and dress warmly.";
const WINDY: &str = " Strong winds may affect outdoor activities.";
const HUMID: &str = " High humidity may make it feel warmer than it is.";

/// Dew point in Celsius (Magnus approximation)
#[must_use]
pub fn dew_point(temperature_c: f64, humidity_percent: f64) -> f64 {
    let alpha =
        (MAGNUS_A * temperature_c) / (MAGNUS_B + temperature_c) + (humidity_percent / 100.0).ln();
    (MAGNUS_B * alpha) / (MAGNUS_A - alpha)
}

/// Round half up, so -2.5 becomes -2 and 2.5 becomes 3
#[must_use]
pub fn display_round(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Inputs of the activity-impact heuristic, as displayed to the user
#[derive(Debug, Clone, Copy)]
pub struct ImpactInputs<'a> {
    /// Rounded temperature in Celsius
    pub temperature: f64,
    /// Condition category, any case
    pub condition: &'a str,
    /// Rounded wind speed in km/h
    pub wind_kmh: f64,
    /// Relative humidity in percent
    pub humidity: f64,
}

/// One-sentence advice on outdoor activities.
///
/// Condition messages replace temperature messages; wind and humidity
/// clauses are appended to whichever message won.
#[must_use]
pub fn activity_impact(inputs: ImpactInputs<'_>) -> String {
    let mut impact = if inputs.temperature < 10.0 {
        COLD
    } else if inputs.temperature > 30.0 {
        HOT
    } else {
        GREAT_DAY
    }
    .to_string();

    let condition = inputs.condition.to_lowercase();
    if condition.contains("rain") || condition.contains("thunderstorm") {
        impact = RAINY.to_string();
    } else if condition.contains("snow") {
        impact = SNOWY.to_string();
    }

    if inputs.wind_kmh > 30.0 {
        impact.push_str(WINDY);
    }
    if inputs.humidity > 70.0 {
        impact.push_str(HUMID);
    }

    impact
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn inputs(temperature: f64, condition: &str, wind_kmh: f64, humidity: f64) -> ImpactInputs<'_> {
        ImpactInputs {
            temperature,
            condition,
            wind_kmh,
            humidity,
        }
    }

    #[test]
    fn test_dew_point_reference_value() {
        let dew = dew_point(20.0, 50.0);
        assert!((dew - 9.3).abs() < 0.1, "got {dew}");
    }

    #[test]
    fn test_dew_point_equals_temperature_when_saturated() {
        assert!((dew_point(15.0, 100.0) - 15.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(2.5, 3)]
    #[case(2.4, 2)]
    #[case(-2.5, -2)]
    #[case(-2.6, -3)]
    #[case(0.0, 0)]
    fn test_display_round(#[case] value: f64, #[case] expected: i64) {
        assert_eq!(display_round(value), expected);
    }

    #[rstest]
    #[case(20.0, "Clear", GREAT_DAY)]
    #[case(5.0, "Clear", COLD)]
    #[case(35.0, "Clouds", HOT)]
    #[case(35.0, "Rain", RAINY)]
    #[case(5.0, "Thunderstorm", RAINY)]
    #[case(-3.0, "Snow", SNOWY)]
    #[case(10.0, "Mist", GREAT_DAY)]
    #[case(30.0, "Drizzle", GREAT_DAY)]
    fn test_base_message(
        #[case] temperature: f64,
        #[case] condition: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(activity_impact(inputs(temperature, condition, 10.0, 40.0)), expected);
    }

    #[test]
    fn test_wind_and_humidity_append() {
        let impact = activity_impact(inputs(5.0, "Rain", 31.0, 71.0));
        assert_eq!(impact, format!("{RAINY}{WINDY}{HUMID}"));

        let impact = activity_impact(inputs(20.0, "Clear", 30.0, 70.0));
        assert_eq!(impact, GREAT_DAY);
    }
}
