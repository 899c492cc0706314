/// Test fixtures: representative JSON payloads from the upstream APIs.
///
/// Trimmed to the fields the normalizers read plus a little surrounding
/// noise, so the serde structs are exercised against realistic envelopes.
///
/// OpenWeatherMap /data/2.5/weather shape:
///   .main.{temp,pressure,humidity}
///   .wind.{speed,deg}
///   .weather[0].{icon,main}
///   .sys.{sunrise,sunset}   — epoch seconds
///
/// USNO /rstt/oneday shape:
///   .curphase               — e.g. "Waxing Gibbous"
///
/// weather.gov shapes:
///   /points/{lat},{lon}     .properties.forecast — URL of the forecast
///   /gridpoints/.../forecast .properties.periods[].{name,temperature,shortForecast,icon}
///   /alerts/active          .features[].properties.{areaDesc,severity,headline,description}

/// Peoria, IL observation. Wind from due west, sunrise/sunset on 2023-11-14/15.
#[cfg(test)]
pub(crate) fn fixture_owm_observation_json() -> &'static str {
    r#"{
      "coord": { "lon": -89.589, "lat": 40.6936 },
      "weather": [
        { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }
      ],
      "base": "stations",
      "main": {
        "temp": 51.3, "feels_like": 49.1, "temp_min": 48.2, "temp_max": 53.6,
        "pressure": 1018, "humidity": 62
      },
      "visibility": 10000,
      "wind": { "speed": 9.22, "deg": 270, "gust": 15.01 },
      "clouds": { "all": 75 },
      "dt": 1700020000,
      "sys": { "type": 2, "id": 2004925, "country": "US", "sunrise": 1700000000, "sunset": 1700040000 },
      "timezone": -21600,
      "id": 4905687,
      "name": "Peoria",
      "cod": 200
    }"#
}

/// Observation with an empty `weather` array.
#[cfg(test)]
pub(crate) fn fixture_owm_no_weather_json() -> &'static str {
    r#"{
      "weather": [],
      "main": { "temp": 30.0, "pressure": 1020, "humidity": 80 },
      "wind": { "speed": 0, "deg": 0 },
      "sys": { "sunrise": 1700000000, "sunset": 1700040000 }
    }"#
}

/// Observation missing the `main` block entirely (OWM error-ish payload).
#[cfg(test)]
pub(crate) fn fixture_owm_missing_main_json() -> &'static str {
    r#"{ "cod": "401", "message": "Invalid API key." }"#
}

#[cfg(test)]
pub(crate) fn fixture_usno_oneday_json() -> &'static str {
    r#"{
      "error": false,
      "apiversion": "2.2.1",
      "year": 2023, "month": 11, "day": 21,
      "dayofweek": "Tuesday",
      "datechanged": false,
      "lon": -89.589, "lat": 40.6936,
      "tz": 0,
      "sundata": [ { "phen": "R", "time": "12:44" } ],
      "moondata": [ { "phen": "R", "time": "18:37" } ],
      "closestphase": { "phase": "First Quarter", "date": "November 20, 2023", "time": "10:50" },
      "fracillum": "63%",
      "curphase": "Waxing Gibbous"
    }"#
}

/// weather.gov points response whose forecast URL is `forecast_url`.
#[cfg(test)]
pub(crate) fn fixture_points_json(forecast_url: &str) -> String {
    format!(
        r#"{{
      "@context": [],
      "id": "https://api.weather.gov/points/40.6936,-89.589",
      "type": "Feature",
      "properties": {{
        "cwa": "ILX",
        "gridId": "ILX",
        "gridX": 33,
        "gridY": 71,
        "forecast": "{}",
        "forecastHourly": "https://api.weather.gov/gridpoints/ILX/33,71/forecast/hourly",
        "relativeLocation": {{ "properties": {{ "city": "Peoria", "state": "IL" }} }}
      }}
    }}"#,
        forecast_url
    )
}

/// weather.gov forecast with `count` periods. Period `i` is named
/// `"Period {i}"` with temperature `40 + i`.
#[cfg(test)]
pub(crate) fn fixture_forecast_json(count: usize) -> String {
    let periods: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{
          "number": {},
          "name": "Period {}",
          "startTime": "2023-11-14T06:00:00-06:00",
          "isDaytime": {},
          "temperature": {},
          "temperatureUnit": "F",
          "windSpeed": "5 to 10 mph",
          "windDirection": "SW",
          "icon": "https://api.weather.gov/icons/land/day/few?size=medium&p={}",
          "shortForecast": "Forecast {}",
          "detailedForecast": "Long text for period {}."
        }}"#,
                i + 1,
                i,
                i % 2 == 0,
                40 + i,
                i,
                i,
                i
            )
        })
        .collect();

    format!(
        r#"{{
      "type": "Feature",
      "properties": {{
        "updated": "2023-11-14T10:12:31+00:00",
        "units": "us",
        "periods": [{}]
      }}
    }}"#,
        periods.join(",")
    )
}

/// weather.gov active alerts: a flood warning and a fog advisory with a
/// null headline.
#[cfg(test)]
pub(crate) fn fixture_alerts_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "id": "urn:oid:2.49.0.1.840.0.1",
          "type": "Feature",
          "properties": {
            "areaDesc": "Peoria, IL; Tazewell, IL",
            "severity": "Severe",
            "event": "Flood Warning",
            "headline": "Flood Warning issued November 14 at 9:12AM CST by NWS Lincoln IL",
            "description": "The Illinois River at Peoria is above flood stage."
          }
        },
        {
          "id": "urn:oid:2.49.0.1.840.0.2",
          "type": "Feature",
          "properties": {
            "areaDesc": "Peoria, IL",
            "severity": "Minor",
            "event": "Dense Fog Advisory",
            "headline": null,
            "description": "Visibility one quarter mile or less."
          }
        }
      ],
      "title": "Current watches, warnings, and advisories",
      "updated": "2023-11-14T15:12:00+00:00"
    }"#
}

#[cfg(test)]
pub(crate) fn fixture_no_alerts_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "features": [],
      "title": "Current watches, warnings, and advisories",
      "updated": "2023-11-14T15:12:00+00:00"
    }"#
}
