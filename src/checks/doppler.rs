use std::fmt;

use crate::config::Config;
use crate::feed::{SampleSource, Snapshot};
use crate::geo::{
    ecef_to_enu, enu_to_ecef, lla_to_ecef, normalize_degrees, Site, FEET_TO_M, KNOTS_TO_MS,
    SPEED_OF_LIGHT_M_S,
};

use super::{CheckError, CheckKind, CheckResult, Report};

/// Passive-radar geometry for the current aircraft state. Reference only.
#[derive(Debug, Clone)]
pub struct DopplerReport {
    pub gs_m_s: f64,
    pub track_deg: f64,
    pub velocity_ecef_m_s: [f64; 3],
    pub rx_distance_m: f64,
    pub tx_distance_m: f64,
    pub rx_azimuth_deg: f64,
    pub rx_elevation_deg: f64,
    /// Rate of change of the tx -> aircraft -> rx path length.
    pub bistatic_range_rate_m_s: f64,
    pub fc_mhz: f64,
    pub wavelength_m: f64,
    pub doppler_hz: f64,
}

pub fn evaluate(
    snapshot: &Snapshot,
    transmitter: &Site,
    receiver: &Site,
    fc_mhz: f64,
) -> Result<CheckResult, CheckError> {
    let aircraft = snapshot.first_aircraft()?;
    let alt_m = aircraft
        .alt_geom
        .ok_or(CheckError::MissingField("alt_geom"))?
        * FEET_TO_M;

    let gs_m_s = aircraft.gs * KNOTS_TO_MS;
    let track_rad = aircraft.track.to_radians();
    let east = gs_m_s * track_rad.sin();
    let north = gs_m_s * track_rad.cos();
    let velocity = enu_to_ecef(
        east,
        north,
        0.0,
        aircraft.lat.to_radians(),
        aircraft.lon.to_radians(),
    );

    let ac = lla_to_ecef(aircraft.lat, aircraft.lon, alt_m);
    let (rx_distance_m, rx_rate) = range_and_rate(ac, velocity, receiver.position_ecef_m());
    let (tx_distance_m, tx_rate) = range_and_rate(ac, velocity, transmitter.position_ecef_m());

    let (rx_azimuth_deg, rx_elevation_deg) = look_angles(receiver, ac, rx_distance_m);

    let wavelength_m = SPEED_OF_LIGHT_M_S / (fc_mhz * 1e6);
    let bistatic_range_rate_m_s = rx_rate + tx_rate;

    Ok(CheckResult {
        kind: CheckKind::Doppler,
        passed: true,
        error: 0.0,
        report: Report::Doppler(DopplerReport {
            gs_m_s,
            track_deg: aircraft.track,
            velocity_ecef_m_s: velocity,
            rx_distance_m,
            tx_distance_m,
            rx_azimuth_deg,
            rx_elevation_deg,
            bistatic_range_rate_m_s,
            fc_mhz,
            wavelength_m,
            doppler_hz: -bistatic_range_rate_m_s / wavelength_m,
        }),
    })
}

pub async fn run<S: SampleSource>(source: &S, config: &Config) -> Result<CheckResult, CheckError> {
    let snapshot = source.fetch().await?;
    evaluate(
        &snapshot,
        &config.transmitter,
        &config.receiver,
        config.fc_mhz,
    )
}

/// Distance from `site` to the aircraft and its rate of change for a
/// stationary site.
fn range_and_rate(aircraft: [f64; 3], velocity: [f64; 3], site: [f64; 3]) -> (f64, f64) {
    let dr = [
        aircraft[0] - site[0],
        aircraft[1] - site[1],
        aircraft[2] - site[2],
    ];
    let range = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();
    if range <= 0.0 {
        return (0.0, 0.0);
    }
    let rate = (dr[0] * velocity[0] + dr[1] * velocity[1] + dr[2] * velocity[2]) / range;
    (range, rate)
}

/// Azimuth and elevation of the aircraft seen from `site`, degrees.
fn look_angles(site: &Site, aircraft: [f64; 3], range_m: f64) -> (f64, f64) {
    let sta = site.position_ecef_m();
    let dr = [
        aircraft[0] - sta[0],
        aircraft[1] - sta[1],
        aircraft[2] - sta[2],
    ];
    let (east, north, up) = ecef_to_enu(
        dr,
        site.latitude_deg.to_radians(),
        site.longitude_deg.to_radians(),
    );
    let azimuth = normalize_degrees(east.atan2(north).to_degrees());
    let elevation = if range_m > 0.0 {
        (up / range_m).asin().to_degrees()
    } else {
        0.0
    };
    (azimuth, elevation)
}

impl fmt::Display for DopplerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Geometry:")?;
        writeln!(
            f,
            "  Aircraft velocity: {:.2} m/s at {:.2}°",
            self.gs_m_s, self.track_deg
        )?;
        let v = self.velocity_ecef_m_s;
        writeln!(
            f,
            "  Velocity (ECEF): [{:.2}, {:.2}, {:.2}] m/s",
            v[0], v[1], v[2]
        )?;
        writeln!(f, "  Distance to RX: {:.2} km", self.rx_distance_m / 1000.0)?;
        writeln!(
            f,
            "  Seen from RX: az {:.2}°, el {:.2}°",
            self.rx_azimuth_deg, self.rx_elevation_deg
        )?;
        writeln!(f, "  Distance to TX: {:.2} km", self.tx_distance_m / 1000.0)?;
        writeln!(
            f,
            "  Bistatic range rate: {:.2} m/s",
            self.bistatic_range_rate_m_s
        )?;
        writeln!(f)?;
        writeln!(f, "  Frequency: {} MHz", self.fc_mhz)?;
        writeln!(f, "  Wavelength: {:.3} m", self.wavelength_m)?;
        writeln!(f, "  Expected bistatic Doppler: {:.2} Hz", self.doppler_hz)?;
        writeln!(f)?;
        write!(f, "✓ Reference calculation complete")
    }
}
