use std::fmt;

use crate::config::Config;
use crate::feed::{SampleSource, Snapshot};
use crate::geo::{haversine_distance, MS_TO_KNOTS};

use super::{
    comparison, relative_error_percent, verdict, CheckError, CheckKind, CheckResult, Report,
};

#[derive(Debug, Clone)]
pub struct SampleSummary {
    pub index: usize,
    pub now: f64,
    pub lat: f64,
    pub lon: f64,
    pub gs_kts: f64,
}

impl SampleSummary {
    fn from_snapshot(index: usize, snapshot: &Snapshot) -> Result<Self, CheckError> {
        let aircraft = snapshot.first_aircraft()?;
        Ok(Self {
            index,
            now: snapshot.now,
            lat: aircraft.lat,
            lon: aircraft.lon,
            gs_kts: aircraft.gs,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ConsistencyReport {
    pub first: SampleSummary,
    pub second: SampleSummary,
    pub delta_t_s: f64,
    pub distance_m: f64,
    pub calculated_kts: f64,
    /// Mean of the two reported ground speeds.
    pub reported_kts: f64,
    pub error_percent: f64,
    pub tolerance_percent: f64,
    pub passed: bool,
}

/// Speed implied by the displacement between two snapshots, measured on the
/// server clock, against the mean of the two reported ground speeds.
pub fn evaluate(
    first: &Snapshot,
    second: &Snapshot,
    tolerance_percent: f64,
) -> Result<CheckResult, CheckError> {
    let a = SampleSummary::from_snapshot(1, first)?;
    let b = SampleSummary::from_snapshot(2, second)?;

    let delta_t = b.now - a.now;
    if delta_t.is_nan() || delta_t <= 0.0 {
        return Err(CheckError::NonPositiveElapsed(delta_t));
    }

    let distance_m = haversine_distance(a.lat, a.lon, b.lat, b.lon);
    let calculated_kts = distance_m / delta_t * MS_TO_KNOTS;
    let reported_kts = (a.gs_kts + b.gs_kts) / 2.0;

    let error_percent =
        relative_error_percent(calculated_kts, reported_kts, "mean reported ground speed")?;
    let passed = error_percent < tolerance_percent;

    Ok(CheckResult {
        kind: CheckKind::Consistency,
        passed,
        error: error_percent,
        report: Report::Consistency(ConsistencyReport {
            first: a,
            second: b,
            delta_t_s: delta_t,
            distance_m,
            calculated_kts,
            reported_kts,
            error_percent,
            tolerance_percent,
            passed,
        }),
    })
}

pub async fn run<S: SampleSource>(source: &S, config: &Config) -> Result<CheckResult, CheckError> {
    let first = source.fetch().await?;
    println!("{}", SampleSummary::from_snapshot(1, &first)?);
    println!();
    println!(
        "Waiting {}...",
        humantime::format_duration(config.sample_interval)
    );
    tokio::time::sleep(config.sample_interval).await;
    let second = source.fetch().await?;

    evaluate(&first, &second, config.tolerance.speed_percent)
}

impl fmt::Display for SampleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sample {} at t={:.2}:", self.index, self.now)?;
        writeln!(f, "  Position: ({}, {})", self.lat, self.lon)?;
        write!(f, "  Ground speed: {} knots", self.gs_kts)
    }
}

/// The first sample is printed by [`run`] before the wait, so only the
/// second one is rendered here.
impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.second)?;
        writeln!(f)?;
        writeln!(f, "Analysis:")?;
        writeln!(
            f,
            "  Time delta: {:.2} s (t={:.2} -> t={:.2})",
            self.delta_t_s, self.first.now, self.second.now
        )?;
        writeln!(f, "  Distance traveled: {:.2} m", self.distance_m)?;
        writeln!(f, "  Calculated speed: {:.1} knots", self.calculated_kts)?;
        writeln!(f, "  Reported speed (avg): {:.1} knots", self.reported_kts)?;
        writeln!(f)?;
        write!(
            f,
            "{}: Speed consistency error {:.2}% {} {}%",
            verdict(self.passed),
            self.error_percent,
            comparison(self.passed),
            self.tolerance_percent
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::feed::fixtures::{aircraft, snapshot, FixtureSource};
    use crate::geo::EARTH_RADIUS_M;

    /// Latitude offset covering `meters` along a meridian.
    fn north_of(lat: f64, meters: f64) -> f64 {
        lat + (meters / EARTH_RADIUS_M).to_degrees()
    }

    #[test]
    fn fast_displacement_with_slow_reports_fails() {
        // 500 m in 5 s is ~194 kt; the feed claims ~97 kt.
        let lat2 = north_of(-34.95, 500.0);
        let first = snapshot(1000.0, aircraft(-34.95, 138.70, 97.0, 0.0));
        let second = snapshot(1005.0, aircraft(lat2, 138.70, 97.2, 0.0));

        let result = evaluate(&first, &second, 10.0).unwrap();
        let Report::Consistency(report) = &result.report else {
            panic!("wrong report");
        };
        assert!((report.distance_m - 500.0).abs() < 1e-6);
        assert!((report.calculated_kts - 194.384).abs() < 1e-3);
        assert!(!result.passed);
        assert!(result.error >= 10.0);
    }

    #[test]
    fn matching_displacement_passes() {
        let lat2 = north_of(-34.95, 250.0);
        let first = snapshot(1000.0, aircraft(-34.95, 138.70, 96.0, 0.0));
        let second = snapshot(1005.0, aircraft(lat2, 138.70, 98.0, 0.0));

        let result = evaluate(&first, &second, 10.0).unwrap();
        // 50 m/s = 97.192 kt against a 97 kt mean
        assert!(result.passed, "{}", result.report);
        assert!(result.error < 1.0);
    }

    /// Two samples 5 s apart whose displacement implies `kts` knots, each
    /// reporting 100 kt.
    fn displaced_at(kts: f64) -> (Snapshot, Snapshot) {
        let meters = kts / MS_TO_KNOTS * 5.0;
        (
            snapshot(1000.0, aircraft(-34.95, 138.70, 100.0, 0.0)),
            snapshot(1005.0, aircraft(north_of(-34.95, meters), 138.70, 100.0, 0.0)),
        )
    }

    #[test]
    fn error_equal_to_tolerance_fails() {
        let (first, second) = displaced_at(110.0);
        let error = evaluate(&first, &second, 100.0).unwrap().error;
        assert!((error - 10.0).abs() < 1e-6, "{error}");

        let at_boundary = evaluate(&first, &second, error).unwrap();
        assert_eq!(at_boundary.error, error);
        assert!(!at_boundary.passed);
        assert!(at_boundary.report.to_string().contains(">="));
    }

    #[test]
    fn error_just_under_tolerance_passes() {
        let (first, second) = displaced_at(110.0);
        let error = evaluate(&first, &second, 100.0).unwrap().error;

        let result = evaluate(&first, &second, error + 1e-9).unwrap();
        assert!(result.passed);
    }

    #[test]
    fn ten_percent_boundary_against_100_kt() {
        let (first, second) = displaced_at(110.001);
        assert!(!evaluate(&first, &second, 10.0).unwrap().passed);

        let (first, second) = displaced_at(109.999);
        assert!(evaluate(&first, &second, 10.0).unwrap().passed);
    }

    #[test]
    fn report_renders_second_sample_and_both_times() {
        let (first, second) = displaced_at(100.0);
        let text = evaluate(&first, &second, 10.0).unwrap().report.to_string();
        assert!(text.contains("Sample 2 at t=1005.00:"));
        assert!(text.contains("t=1000.00 -> t=1005.00"));
        assert!(!text.contains("Sample 1"));
    }

    #[test]
    fn out_of_order_samples_are_rejected() {
        let first = snapshot(1005.0, aircraft(0.0, 0.0, 90.0, 0.0));
        let second = snapshot(1005.0, aircraft(0.0, 0.001, 90.0, 0.0));
        assert!(matches!(
            evaluate(&first, &second, 10.0),
            Err(CheckError::NonPositiveElapsed(_))
        ));
    }

    #[test]
    fn stationary_reports_are_degenerate() {
        let first = snapshot(1000.0, aircraft(0.0, 0.0, 0.0, 0.0));
        let second = snapshot(1005.0, aircraft(0.0, 0.0, 0.0, 0.0));
        assert!(matches!(
            evaluate(&first, &second, 10.0),
            Err(CheckError::DegenerateReference { .. })
        ));
    }

    #[tokio::test]
    async fn run_takes_two_samples() {
        let config = Config {
            sample_interval: Duration::ZERO,
            ..Config::default()
        };
        let lat2 = north_of(-34.95, 250.0);
        let source = FixtureSource::new([
            snapshot(1000.0, aircraft(-34.95, 138.70, 97.0, 0.0)),
            snapshot(1005.0, aircraft(lat2, 138.70, 97.0, 0.0)),
        ]);

        let result = run(&source, &config).await.unwrap();
        assert!(result.passed);
        assert_eq!(source.remaining(), 0);
    }
}
