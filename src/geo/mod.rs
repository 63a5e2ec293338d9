mod frames;
mod great_circle;
mod site;

pub use frames::{ecef_to_enu, enu_to_ecef, lla_to_ecef};
pub use great_circle::{angular_difference, bearing_to, haversine_distance, normalize_degrees};

#[cfg(test)]
pub use great_circle::EARTH_RADIUS_M;
pub use site::Site;

/// Metres per degree of latitude used by the synthetic feed.
pub const METERS_PER_DEGREE: f64 = 111_320.0;
pub const MS_TO_KNOTS: f64 = 1.94384;
pub const KNOTS_TO_MS: f64 = 0.514444;
pub const FEET_TO_M: f64 = 0.3048;
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;
