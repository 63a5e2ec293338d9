//! Kinematic consistency checks.
//!
//! Every check is split in two: an `evaluate` function that is pure over
//! already-fetched snapshots, and a `run` driver that pulls those snapshots
//! from a [`SampleSource`].

pub mod analytical;
pub mod consistency;
pub mod doppler;
mod error;
pub mod track;

use std::fmt;

use clap::ValueEnum;
use strum_macros::Display;

use crate::config::Config;
use crate::feed::SampleSource;

pub use error::CheckError;

/// Below this a reference value is treated as zero.
const MIN_REFERENCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, ValueEnum)]
pub enum CheckKind {
    #[strum(to_string = "Analytical Validation")]
    Analytical,
    #[strum(to_string = "Position-Velocity Consistency")]
    Consistency,
    #[strum(to_string = "Track Direction Validation")]
    Track,
    #[strum(to_string = "Expected Doppler Calculation")]
    Doppler,
}

impl CheckKind {
    pub const ALL: [CheckKind; 4] = [
        CheckKind::Analytical,
        CheckKind::Consistency,
        CheckKind::Track,
        CheckKind::Doppler,
    ];

    pub fn number(&self) -> usize {
        match self {
            CheckKind::Analytical => 1,
            CheckKind::Consistency => 2,
            CheckKind::Track => 3,
            CheckKind::Doppler => 4,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Report {
    Analytical(analytical::AnalyticalReport),
    Consistency(consistency::ConsistencyReport),
    Track(track::TrackReport),
    Doppler(doppler::DopplerReport),
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Analytical(r) => r.fmt(f),
            Report::Consistency(r) => r.fmt(f),
            Report::Track(r) => r.fmt(f),
            Report::Doppler(r) => r.fmt(f),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub kind: CheckKind,
    pub passed: bool,
    /// Percent for speed checks, degrees for the track check, zero for
    /// reference-only checks. Never negative.
    pub error: f64,
    pub report: Report,
}

pub async fn run_check<S: SampleSource>(
    kind: CheckKind,
    source: &S,
    config: &Config,
) -> Result<CheckResult, CheckError> {
    match kind {
        CheckKind::Analytical => analytical::run(source, config).await,
        CheckKind::Consistency => consistency::run(source, config).await,
        CheckKind::Track => track::run(source, config).await,
        CheckKind::Doppler => doppler::run(source, config).await,
    }
}

/// `|measured - reference| / |reference|` as a percentage.
pub fn relative_error_percent(
    measured: f64,
    reference: f64,
    what: &'static str,
) -> Result<f64, CheckError> {
    if reference.is_nan() || reference.abs() < MIN_REFERENCE {
        return Err(CheckError::DegenerateReference {
            what,
            value: reference,
        });
    }
    Ok((measured - reference).abs() / reference.abs() * 100.0)
}

pub(crate) fn verdict(passed: bool) -> &'static str {
    if passed {
        "✓ PASS"
    } else {
        "✗ FAIL"
    }
}

pub(crate) fn comparison(passed: bool) -> &'static str {
    if passed {
        "<"
    } else {
        ">="
    }
}
