//! Closed-form reproduction of the synthetic feed's circular flight path.

use std::f64::consts::TAU;

use serde::Serialize;

use crate::geo::{normalize_degrees, METERS_PER_DEGREE, MS_TO_KNOTS};

/// A point circling `(center_lat_deg, center_lon_deg)` at a fixed angular
/// radius and angular speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularOrbit {
    pub center_lat_deg: f64,
    pub center_lon_deg: f64,
    pub radius_deg: f64,
    pub angular_speed_rad_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedState {
    pub elapsed_s: f64,
    pub theta_rad: f64,
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub dlat_dt_deg_s: f64,
    pub dlon_dt_deg_s: f64,
    pub north_m_s: f64,
    pub east_m_s: f64,
    pub speed_m_s: f64,
    pub ground_speed_kts: f64,
    pub track_deg: f64,
}

impl CircularOrbit {
    pub fn state_at(&self, elapsed_s: f64) -> ExpectedState {
        let theta = (elapsed_s * self.angular_speed_rad_s).rem_euclid(TAU);
        let (sin_t, cos_t) = theta.sin_cos();

        let lat = self.center_lat_deg + self.radius_deg * cos_t;
        let lon = self.center_lon_deg + self.radius_deg * sin_t;

        let dlat_dt = -self.radius_deg * self.angular_speed_rad_s * sin_t;
        let dlon_dt = self.radius_deg * self.angular_speed_rad_s * cos_t;

        let north = dlat_dt * METERS_PER_DEGREE;
        // Meridians converge towards the poles.
        let east = dlon_dt * METERS_PER_DEGREE * lat.to_radians().cos();

        let speed = north.hypot(east);

        ExpectedState {
            elapsed_s,
            theta_rad: theta,
            lat_deg: lat,
            lon_deg: lon,
            dlat_dt_deg_s: dlat_dt,
            dlon_dt_deg_s: dlon_dt,
            north_m_s: north,
            east_m_s: east,
            speed_m_s: speed,
            ground_speed_kts: speed * MS_TO_KNOTS,
            track_deg: normalize_degrees(east.atan2(north).to_degrees()),
        }
    }

    /// Upper bound on [`ExpectedState::speed_m_s`] for any time.
    pub fn max_speed_m_s(&self) -> f64 {
        (self.radius_deg * self.angular_speed_rad_s).abs() * METERS_PER_DEGREE
    }
}
