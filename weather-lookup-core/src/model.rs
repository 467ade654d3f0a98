use serde::{Deserialize, Serialize};

/// Normalized current conditions, ready to be rendered.
///
/// Serialized in camelCase so JSON output keeps the display names
/// (`feelsLike`, `windSpeed`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayWeather {
    pub city: String,
    /// ISO 3166 two-letter country code.
    pub country: String,
    /// Whole degrees Celsius.
    pub temperature: i32,
    /// Whole degrees Celsius.
    pub feels_like: i32,
    /// Coarse category token, e.g. "Clouds" or "Rain".
    pub condition: String,
    /// Free-text detail, lower-case as the provider sends it.
    pub description: String,
    /// Relative humidity, 0-100.
    pub humidity: u8,
    /// Kilometers per hour.
    pub wind_speed: u32,
    /// Opaque provider icon code, e.g. "03d".
    pub icon: String,
}

/// Round to the nearest integer, exact halves going toward +infinity
/// (`2.5 -> 3`, `-2.5 -> -2`).
pub fn round_to_int(value: f64) -> i64 {
    // `round` is exact but sends negative halves away from zero.
    let rounded = value.round();
    if value - rounded == 0.5 {
        (rounded + 1.0) as i64
    } else {
        rounded as i64
    }
}

/// Convert a wind speed in meters/second to whole kilometers/hour.
pub fn mps_to_kmh(speed_mps: f64) -> u32 {
    round_to_int(speed_mps * 3.6).clamp(0, i64::from(u32::MAX)) as u32
}

/// Coarse grouping of the provider's condition token, used to pick a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
}

impl ConditionKind {
    /// Classify a condition token case-insensitively. Unknown tokens
    /// (mist, haze, smoke, ...) are shown as clouds.
    pub fn from_condition(condition: &str) -> Self {
        match condition.to_lowercase().as_str() {
            "clear" => ConditionKind::Clear,
            "rain" | "drizzle" => ConditionKind::Rain,
            "snow" => ConditionKind::Snow,
            "thunderstorm" => ConditionKind::Thunderstorm,
            _ => ConditionKind::Clouds,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            ConditionKind::Clear => "☀",
            ConditionKind::Clouds => "☁",
            ConditionKind::Rain => "🌧",
            ConditionKind::Snow => "🌨",
            ConditionKind::Thunderstorm => "⛈",
        }
    }
}

impl DisplayWeather {
    pub fn condition_kind(&self) -> ConditionKind {
        ConditionKind::from_condition(&self.condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wind_speed_is_converted_to_kmh() {
        assert_eq!(mps_to_kmh(5.0), 18);
        assert_eq!(mps_to_kmh(10.0), 36);
        assert_eq!(mps_to_kmh(0.0), 0);
        // 3.2 m/s = 11.52 km/h
        assert_eq!(mps_to_kmh(3.2), 12);
    }

    #[test]
    fn temperatures_round_to_nearest() {
        assert_eq!(round_to_int(15.2), 15);
        assert_eq!(round_to_int(13.4), 13);
        assert_eq!(round_to_int(13.6), 14);
        assert_eq!(round_to_int(-0.4), 0);
        assert_eq!(round_to_int(-7.8), -8);
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(round_to_int(2.5), 3);
        assert_eq!(round_to_int(-2.5), -2);
        assert_eq!(round_to_int(-0.5), 0);
    }

    #[test]
    fn value_just_below_half_rounds_down() {
        assert_eq!(round_to_int(0.49999999999999994), 0);
        assert_eq!(round_to_int(-0.49999999999999994), 0);
    }

    #[test]
    fn condition_kind_is_case_insensitive() {
        assert_eq!(ConditionKind::from_condition("Clear"), ConditionKind::Clear);
        assert_eq!(ConditionKind::from_condition("CLOUDS"), ConditionKind::Clouds);
        assert_eq!(ConditionKind::from_condition("drizzle"), ConditionKind::Rain);
        assert_eq!(ConditionKind::from_condition("Rain"), ConditionKind::Rain);
        assert_eq!(ConditionKind::from_condition("Snow"), ConditionKind::Snow);
        assert_eq!(
            ConditionKind::from_condition("Thunderstorm"),
            ConditionKind::Thunderstorm
        );
    }

    #[test]
    fn unknown_condition_falls_back_to_clouds() {
        assert_eq!(ConditionKind::from_condition("Mist"), ConditionKind::Clouds);
        assert_eq!(ConditionKind::from_condition(""), ConditionKind::Clouds);
    }

    #[test]
    fn serializes_with_display_field_names() {
        let weather = DisplayWeather {
            city: "London".into(),
            country: "GB".into(),
            temperature: 15,
            feels_like: 13,
            condition: "Clouds".into(),
            description: "scattered clouds".into(),
            humidity: 72,
            wind_speed: 18,
            icon: "03d".into(),
        };

        let json = serde_json::to_value(&weather).expect("serialize");
        assert_eq!(json["feelsLike"], 13);
        assert_eq!(json["windSpeed"], 18);
        assert_eq!(json["country"], "GB");
    }
}
