//! Weather-condition category lookups
//!
//! The provider reports a coarse category ("Clear", "Rain", ...) for every
//! observation. Icons, colors and emoji are looked up by that exact string;
//! anything outside the table falls back to a neutral value.

/// Icon name used when the category is not in the table
pub const FALLBACK_ICON: &str = "question";
/// Color used when the category is not in the table
pub const FALLBACK_COLOR: &str = "#000000";
/// Emoji used when the category is not in the table
pub const FALLBACK_EMOJI: &str = "🌈";

const ICONS: [(&str, &str); 7] = [
    ("Clear", "sun"),
    ("Clouds", "cloud"),
    ("Rain", "cloud-rain"),
    ("Snow", "snowflake"),
    ("Thunderstorm", "bolt"),
    ("Drizzle", "cloud-rain"),
    ("Mist", "smog"),
];

const COLORS: [(&str, &str); 7] = [
    ("Clear", "#FFD700"),
    ("Clouds", "#A9A9A9"),
    ("Rain", "#4682B4"),
    ("Snow", "#FFFAFA"),
    ("Thunderstorm", "#4B0082"),
    ("Drizzle", "#B0E0E6"),
    ("Mist", "#D3D3D3"),
];

const EMOJI: [(&str, &str); 7] = [
    ("Clear", "☀️"),
    ("Clouds", "☁️"),
    ("Rain", "🌧️"),
    ("Drizzle", "🌦️"),
    ("Thunderstorm", "⛈️"),
    ("Snow", "❄️"),
    ("Mist", "🌫️"),
];

fn lookup(table: &[(&str, &'static str)], category: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| *key == category)
        .map(|(_, value)| *value)
}

/// Icon name for a weather category
#[must_use]
pub fn weather_icon(category: &str) -> &'static str {
    lookup(&ICONS, category).unwrap_or(FALLBACK_ICON)
}

/// Display color for a weather category
#[must_use]
pub fn weather_color(category: &str) -> &'static str {
    lookup(&COLORS, category).unwrap_or(FALLBACK_COLOR)
}

/// Emoji for a weather category
#[must_use]
pub fn weather_emoji(category: &str) -> &'static str {
    lookup(&EMOJI, category).unwrap_or(FALLBACK_EMOJI)
}
