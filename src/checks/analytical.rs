use std::fmt;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::feed::{SampleSource, Snapshot};
use crate::model::{CircularOrbit, ExpectedState};

use super::{
    comparison, relative_error_percent, verdict, CheckError, CheckKind, CheckResult, Report,
};

#[derive(Debug, Clone)]
pub struct AnalyticalReport {
    pub orbit: CircularOrbit,
    pub server_time: Option<DateTime<Utc>>,
    pub expected: ExpectedState,
    pub reported_gs_kts: f64,
    pub reported_track_deg: f64,
    pub reported_true_heading_deg: Option<f64>,
    pub error_percent: f64,
    pub tolerance_percent: f64,
    pub passed: bool,
}

/// Compares the reported ground speed with the model evaluated at the
/// server's own clock.
pub fn evaluate(
    snapshot: &Snapshot,
    orbit: &CircularOrbit,
    tolerance_percent: f64,
) -> Result<CheckResult, CheckError> {
    let aircraft = snapshot.first_aircraft()?;
    let expected = orbit.state_at(snapshot.now);

    let error_percent = relative_error_percent(
        aircraft.gs,
        expected.ground_speed_kts,
        "expected ground speed",
    )?;
    let passed = error_percent < tolerance_percent;

    Ok(CheckResult {
        kind: CheckKind::Analytical,
        passed,
        error: error_percent,
        report: Report::Analytical(AnalyticalReport {
            orbit: *orbit,
            server_time: snapshot.timestamp(),
            expected,
            reported_gs_kts: aircraft.gs,
            reported_track_deg: aircraft.track,
            reported_true_heading_deg: aircraft.true_heading,
            error_percent,
            tolerance_percent,
            passed,
        }),
    })
}

pub async fn run<S: SampleSource>(source: &S, config: &Config) -> Result<CheckResult, CheckError> {
    let snapshot = source.fetch().await?;
    evaluate(&snapshot, &config.orbit(), config.tolerance.speed_percent)
}

impl fmt::Display for AnalyticalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  RADIUS_DEG: {}", self.orbit.radius_deg)?;
        writeln!(f, "  ANGULAR_SPEED: {} rad/s", self.orbit.angular_speed_rad_s)?;
        writeln!(f, "  TX_LAT: {}", self.orbit.center_lat_deg)?;
        writeln!(f)?;
        if let Some(ts) = self.server_time {
            writeln!(f, "Server time: {}", ts)?;
            writeln!(f)?;
        }
        writeln!(f, "Expected values:")?;
        writeln!(f, "  Speed: {:.2} m/s", self.expected.speed_m_s)?;
        writeln!(f, "  Ground speed: {:.1} knots", self.expected.ground_speed_kts)?;
        writeln!(f, "  Track: {:.2}°", self.expected.track_deg)?;
        writeln!(f, "  Max tangential speed: {:.2} m/s", self.orbit.max_speed_m_s())?;
        writeln!(f)?;
        writeln!(f, "Actual values from API:")?;
        writeln!(f, "  Ground speed: {} knots", self.reported_gs_kts)?;
        writeln!(f, "  Track: {}°", self.reported_track_deg)?;
        match self.reported_true_heading_deg {
            Some(h) => writeln!(f, "  True heading: {}°", h)?,
            None => writeln!(f, "  True heading: n/a")?,
        }
        writeln!(f)?;
        write!(
            f,
            "{}: Ground speed error {:.2}% {} {}%",
            verdict(self.passed),
            self.error_percent,
            comparison(self.passed),
            self.tolerance_percent
        )
    }
}
