/// OpenWeatherMap current weather API client.
///
/// Handles URL construction and normalization for:
///   http://api.openweathermap.org/data/2.5/weather
///
/// Requested in imperial units, so `main.temp` is already °F and
/// `wind.speed` is mph.

use crate::model::{NormalizeError, Observation};
use chrono::{DateTime, Local, TimeZone};
use std::fmt;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct OwmObservation {
    main: OwmMain,
    wind: OwmWind,
    weather: Vec<OwmWeather>,
    sys: OwmSys,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
    // Omitted by OWM when the wind is calm.
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    icon: String,
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    sunrise: i64,
    sunset: i64,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

const WEATHER_PATH: &str = "/data/2.5/weather";
const ICON_BASE_URL: &str = "http://openweathermap.org/img/w/";

/// Builds the current-weather URL for the given coordinates and API key.
pub fn build_weather_url(base_url: &str, lat: f64, lon: f64, app_id: &str) -> String {
    format!(
        "{}{}?lat={}&lon={}&appid={}&units=imperial",
        base_url,
        WEATHER_PATH,
        lat,
        lon,
        urlencoding::encode(app_id)
    )
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE",
    "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
];

/// Maps a wind bearing in degrees to a 16-point compass label.
///
/// Each label covers a 22.5° sector centred on its bearing, so 348.75° up
/// to (but excluding) 11.25° is "N". Bearings outside 0..360 wrap.
pub fn compass_direction(degrees: f64) -> &'static str {
    let sector = (degrees.rem_euclid(360.0) / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[sector]
}

const TIMESTAMP_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Renders epoch seconds as a local-time string such as
/// `Tue Nov 14 2023 16:13:20 GMT-0600`.
pub fn format_local_timestamp(epoch: i64) -> Result<String, NormalizeError> {
    format_timestamp_in(epoch, &Local)
}

fn format_timestamp_in<Tz>(epoch: i64, tz: &Tz) -> Result<String, NormalizeError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let utc = DateTime::from_timestamp(epoch, 0).ok_or(NormalizeError::InvalidTimestamp(epoch))?;
    Ok(utc.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string())
}

/// Turns an OWM observation into the current-conditions fields it owns.
pub fn normalize_observation(obs: &OwmObservation) -> Result<Observation, NormalizeError> {
    let weather = obs.weather.first().ok_or(NormalizeError::MissingWeather)?;

    Ok(Observation {
        temp_f: obs.main.temp,
        pressure: obs.main.pressure,
        humidity: obs.main.humidity,
        wind_speed: obs.wind.speed,
        wind_dir: compass_direction(obs.wind.deg).to_string(),
        cur_icon: format!("{}{}.png", ICON_BASE_URL, weather.icon),
        cur_desc: weather.main.clone(),
        sunrise: format_local_timestamp(obs.sys.sunrise)?,
        sunset: format_local_timestamp(obs.sys.sunset)?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_build_weather_url() {
        let url = build_weather_url("http://api.openweathermap.org", 40.6936, -89.589, "abc123");
        assert_eq!(
            url,
            "http://api.openweathermap.org/data/2.5/weather?lat=40.6936&lon=-89.589&appid=abc123&units=imperial"
        );
    }

    #[test]
    fn test_build_weather_url_encodes_key() {
        let url = build_weather_url("http://localhost", 0.0, 0.0, "a b&c");
        assert!(url.contains("appid=a%20b%26c&"));
    }

    #[test]
    fn test_cardinal_directions() {
        assert_eq!(compass_direction(0.0), "N");
        assert_eq!(compass_direction(90.0), "E");
        assert_eq!(compass_direction(180.0), "S");
        assert_eq!(compass_direction(270.0), "W");
        assert_eq!(compass_direction(360.0), "N");
    }

    #[test]
    fn test_intercardinal_directions() {
        assert_eq!(compass_direction(22.5), "NNE");
        assert_eq!(compass_direction(45.0), "NE");
        assert_eq!(compass_direction(225.0), "SW");
        assert_eq!(compass_direction(337.5), "NNW");
    }

    #[test]
    fn test_same_sector_same_label() {
        // The W sector spans 258.75..281.25
        for deg in [259.0, 265.5, 270.0, 275.0, 281.0] {
            assert_eq!(compass_direction(deg), "W", "{} should be W", deg);
        }
        assert_eq!(compass_direction(258.0), "WSW");
        assert_eq!(compass_direction(282.0), "WNW");
    }

    #[test]
    fn test_out_of_range_degrees_wrap() {
        assert_eq!(compass_direction(-90.0), "W");
        assert_eq!(compass_direction(450.0), "E");
        assert_eq!(compass_direction(355.0), "N");
    }

    #[test]
    fn test_direction_is_deterministic() {
        for tenth in 0..3600 {
            let deg = tenth as f64 / 10.0;
            assert_eq!(compass_direction(deg), compass_direction(deg));
            assert_eq!(compass_direction(deg), compass_direction(deg + 360.0));
        }
    }

    #[test]
    fn test_format_timestamp_in_fixed_offsets() {
        let central = FixedOffset::west_opt(6 * 3600).unwrap();
        assert_eq!(
            format_timestamp_in(1700000000, &central).unwrap(),
            "Tue Nov 14 2023 16:13:20 GMT-0600"
        );

        let india = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(
            format_timestamp_in(1700000000, &india).unwrap(),
            "Wed Nov 15 2023 03:43:20 GMT+0530"
        );

        assert_eq!(
            format_timestamp_in(0, &Utc).unwrap(),
            "Thu Jan 01 1970 00:00:00 GMT+0000"
        );
    }

    #[test]
    fn test_format_local_timestamp_uses_same_layout() {
        let rendered = format_local_timestamp(1700000000).unwrap();
        let parsed = DateTime::parse_from_str(&rendered, "%a %b %d %Y %H:%M:%S GMT%z").unwrap();
        assert_eq!(parsed.timestamp(), 1700000000);
    }

    #[test]
    fn test_format_local_timestamp_rejects_out_of_range() {
        assert_eq!(
            format_local_timestamp(i64::MAX),
            Err(NormalizeError::InvalidTimestamp(i64::MAX))
        );
    }

    #[test]
    fn test_normalize_observation() {
        let obs: OwmObservation = serde_json::from_str(fixture_owm_observation_json()).unwrap();
        let normalized = normalize_observation(&obs).unwrap();

        assert_eq!(normalized.temp_f, 51.3);
        assert_eq!(normalized.pressure, 1018.0);
        assert_eq!(normalized.humidity, 62.0);
        assert_eq!(normalized.wind_speed, 9.22);
        assert_eq!(normalized.wind_dir, "W");
        assert_eq!(normalized.cur_icon, "http://openweathermap.org/img/w/04d.png");
        assert_eq!(normalized.cur_desc, "Clouds");
        assert_eq!(normalized.sunrise, format_local_timestamp(1700000000).unwrap());
        assert_eq!(normalized.sunset, format_local_timestamp(1700040000).unwrap());
    }

    #[test]
    fn test_normalize_observation_without_weather_entry() {
        let obs: OwmObservation = serde_json::from_str(fixture_owm_no_weather_json()).unwrap();
        assert_eq!(normalize_observation(&obs), Err(NormalizeError::MissingWeather));
    }

    #[test]
    fn test_missing_fields_fail_to_decode() {
        let result = serde_json::from_str::<OwmObservation>(fixture_owm_missing_main_json());
        assert!(result.is_err());
    }
}
