/// USNO (US Naval Observatory) one-day rise/set/transit API client.
///
///   http://api.usno.navy.mil/rstt/oneday?date=now&coords={lat},{lon}
///
/// Only the current moon phase (`curphase`) is used.

use crate::ingest::http::coords;
use crate::model::ConditionsUpdate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UsnoOneDay {
    curphase: String,
}

const ONEDAY_PATH: &str = "/rstt/oneday";

pub fn build_oneday_url(base_url: &str, lat: f64, lon: f64) -> String {
    format!("{}{}?date=now&coords={}", base_url, ONEDAY_PATH, coords(lat, lon))
}

/// Moon phase is the only field this upstream contributes.
pub fn normalize_moon_phase(data: &UsnoOneDay) -> ConditionsUpdate {
    ConditionsUpdate::MoonPhase(data.curphase.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::fixture_usno_oneday_json;

    #[test]
    fn test_build_oneday_url() {
        assert_eq!(
            build_oneday_url("http://api.usno.navy.mil", 40.6936, -89.589),
            "http://api.usno.navy.mil/rstt/oneday?date=now&coords=40.6936,-89.589"
        );
    }

    #[test]
    fn test_normalize_moon_phase() {
        let data: UsnoOneDay = serde_json::from_str(fixture_usno_oneday_json()).unwrap();
        assert_eq!(
            normalize_moon_phase(&data),
            ConditionsUpdate::MoonPhase("Waxing Gibbous".to_string())
        );
    }

    #[test]
    fn test_missing_curphase_fails_to_decode() {
        assert!(serde_json::from_str::<UsnoOneDay>(r#"{"error": true}"#).is_err());
    }
}
