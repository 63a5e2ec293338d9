use std::fmt;

use strum_macros::Display;

use crate::config::Config;
use crate::feed::{SampleSource, Snapshot};
use crate::geo::{angular_difference, bearing_to, normalize_degrees, Site};

use super::{comparison, verdict, CheckError, CheckKind, CheckResult, Report};

/// Sense of rotation around the centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Rotation {
    #[strum(to_string = "CW")]
    Clockwise,
    #[strum(to_string = "CCW")]
    CounterClockwise,
}

#[derive(Debug, Clone)]
pub struct TrackReport {
    pub lat: f64,
    pub lon: f64,
    pub radius_bearing_deg: f64,
    pub expected_cw_deg: f64,
    pub expected_ccw_deg: f64,
    pub actual_track_deg: f64,
    pub error_cw_deg: f64,
    pub error_ccw_deg: f64,
    pub rotation: Rotation,
    pub error_deg: f64,
    pub tolerance_deg: f64,
    pub passed: bool,
}

/// On a circle the track is perpendicular to the radius, in either sense of
/// rotation.
pub fn evaluate(
    snapshot: &Snapshot,
    center: &Site,
    tolerance_deg: f64,
) -> Result<CheckResult, CheckError> {
    let aircraft = snapshot.first_aircraft()?;

    let radius_bearing = bearing_to(
        center.latitude_deg,
        center.longitude_deg,
        aircraft.lat,
        aircraft.lon,
    );
    let expected_cw = normalize_degrees(radius_bearing + 90.0);
    let expected_ccw = normalize_degrees(radius_bearing - 90.0);

    let error_cw = angular_difference(aircraft.track, expected_cw);
    let error_ccw = angular_difference(aircraft.track, expected_ccw);

    let (rotation, error_deg) = if error_cw < error_ccw {
        (Rotation::Clockwise, error_cw)
    } else {
        (Rotation::CounterClockwise, error_ccw)
    };
    let passed = error_deg < tolerance_deg;

    Ok(CheckResult {
        kind: CheckKind::Track,
        passed,
        error: error_deg,
        report: Report::Track(TrackReport {
            lat: aircraft.lat,
            lon: aircraft.lon,
            radius_bearing_deg: radius_bearing,
            expected_cw_deg: expected_cw,
            expected_ccw_deg: expected_ccw,
            actual_track_deg: aircraft.track,
            error_cw_deg: error_cw,
            error_ccw_deg: error_ccw,
            rotation,
            error_deg,
            tolerance_deg,
            passed,
        }),
    })
}

pub async fn run<S: SampleSource>(source: &S, config: &Config) -> Result<CheckResult, CheckError> {
    let snapshot = source.fetch().await?;
    evaluate(&snapshot, &config.transmitter, config.tolerance.track_deg)
}

impl fmt::Display for TrackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Aircraft position: ({}, {})", self.lat, self.lon)?;
        writeln!(f, "Radius bearing from center: {:.2}°", self.radius_bearing_deg)?;
        writeln!(f, "Expected track (CW): {:.2}°", self.expected_cw_deg)?;
        writeln!(f, "Expected track (CCW): {:.2}°", self.expected_ccw_deg)?;
        writeln!(f, "Actual track: {}°", self.actual_track_deg)?;
        writeln!(f)?;
        writeln!(
            f,
            "Track error ({}): {:.2}° [CW {:.2}°, CCW {:.2}°]",
            self.rotation, self.error_deg, self.error_cw_deg, self.error_ccw_deg
        )?;
        writeln!(f)?;
        write!(
            f,
            "{}: Track direction error {:.2}° {} {}°",
            verdict(self.passed),
            self.error_deg,
            comparison(self.passed),
            self.tolerance_deg
        )
    }
}
