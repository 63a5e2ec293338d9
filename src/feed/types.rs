use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::FeedError;

/// One entry of the `aircraft` array. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AircraftSample {
    #[serde(default)]
    pub hex: Option<String>,
    pub lat: f64,
    pub lon: f64,
    /// Geometric altitude, feet.
    #[serde(default)]
    pub alt_geom: Option<f64>,
    /// Ground speed, knots.
    pub gs: f64,
    /// Track over ground, degrees true.
    pub track: f64,
    #[serde(default)]
    pub true_heading: Option<f64>,
}

/// Body of `GET /data/aircraft.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Snapshot {
    /// Server clock, seconds since the Unix epoch.
    pub now: f64,
    #[serde(default)]
    pub aircraft: Vec<AircraftSample>,
}

impl Snapshot {
    pub fn first_aircraft(&self) -> Result<&AircraftSample, FeedError> {
        self.aircraft.first().ok_or(FeedError::NoAircraft)
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros((self.now * 1e6).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "now": 1700000000.5,
        "messages": 42,
        "aircraft": [
            {"hex": "7c6b2d", "lat": -34.95, "lon": 138.72, "alt_geom": 5025,
             "gs": 93.4, "track": 271.2, "true_heading": 270.9, "rssi": -12.1},
            {"hex": "7c6b2e", "lat": -34.90, "lon": 138.60, "gs": 120.0, "track": 10.0}
        ]
    }"#;

    #[test]
    fn decodes_first_aircraft_and_ignores_extra_fields() {
        let snapshot: Snapshot = serde_json::from_str(BODY).unwrap();
        let first = snapshot.first_aircraft().unwrap();
        assert_eq!(first.hex.as_deref(), Some("7c6b2d"));
        assert_eq!(first.alt_geom, Some(5025.0));
        assert_eq!(first.true_heading, Some(270.9));
        assert_eq!(snapshot.aircraft[1].alt_geom, None);
    }

    #[test]
    fn empty_aircraft_list_is_an_error() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"now": 1.0, "aircraft": []}"#).unwrap();
        assert!(matches!(
            snapshot.first_aircraft(),
            Err(FeedError::NoAircraft)
        ));
    }

    #[test]
    fn missing_ground_speed_fails_to_decode() {
        let body = r#"{"now": 1.0, "aircraft": [{"lat": 0.0, "lon": 0.0, "track": 0.0}]}"#;
        assert!(serde_json::from_str::<Snapshot>(body).is_err());
    }

    #[test]
    fn server_clock_as_utc() {
        let snapshot: Snapshot = serde_json::from_str(BODY).unwrap();
        let ts = snapshot.timestamp().unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(ts.timestamp_subsec_millis(), 500);
    }
}
