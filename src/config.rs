use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::geo::Site;
use crate::model::CircularOrbit;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{key}: '{value}' is not a number")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key}: {message}")]
    InvalidDuration { key: &'static str, message: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub transmitter: Site,
    pub receiver: Site,
    pub orbit: OrbitConfig,
    pub fc_mhz: f64,
    pub tolerance: ToleranceConfig,
    #[serde(deserialize_with = "deserialize_duration")]
    pub sample_interval: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub connect_timeout: Duration,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrbitConfig {
    pub radius_deg: f64,
    pub angular_speed_rad_s: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ToleranceConfig {
    #[serde(default = "default_speed_percent")]
    pub speed_percent: f64,
    #[serde(default = "default_track_deg")]
    pub track_deg: f64,
}

fn default_speed_percent() -> f64 {
    10.0
}

fn default_track_deg() -> f64 {
    10.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".to_string(),
            transmitter: Site::new(-34.9810, 138.7081, 750.0),
            receiver: Site::new(-34.9192, 138.6027, 110.0),
            orbit: OrbitConfig {
                radius_deg: 0.05,
                angular_speed_rad_s: 0.01,
            },
            fc_mhz: 204.64,
            tolerance: ToleranceConfig {
                speed_percent: default_speed_percent(),
                track_deg: default_track_deg(),
            },
            sample_interval: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// File (if any) first, then process environment on top.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &'static str, target: &mut f64| -> Result<(), ConfigError> {
            if let Some(raw) = lookup(key) {
                *target = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber { key, value: raw })?;
            }
            Ok(())
        };

        number("TX_LAT", &mut self.transmitter.latitude_deg)?;
        number("TX_LON", &mut self.transmitter.longitude_deg)?;
        number("TX_ALT", &mut self.transmitter.altitude_m)?;
        number("RX_LAT", &mut self.receiver.latitude_deg)?;
        number("RX_LON", &mut self.receiver.longitude_deg)?;
        number("RX_ALT", &mut self.receiver.altitude_m)?;
        number("RADIUS_DEG", &mut self.orbit.radius_deg)?;
        number("ANGULAR_SPEED", &mut self.orbit.angular_speed_rad_s)?;
        number("FC_MHZ", &mut self.fc_mhz)?;

        if let Some(url) = lookup("BASE_URL") {
            self.base_url = url;
        }
        if let Some(raw) = lookup("SAMPLE_INTERVAL") {
            self.sample_interval =
                parse_duration(&raw).map_err(|message| ConfigError::InvalidDuration {
                    key: "SAMPLE_INTERVAL",
                    message,
                })?;
        }

        Ok(())
    }

    pub fn orbit(&self) -> CircularOrbit {
        CircularOrbit {
            center_lat_deg: self.transmitter.latitude_deg,
            center_lon_deg: self.transmitter.longitude_deg,
            radius_deg: self.orbit.radius_deg,
            angular_speed_rad_s: self.orbit.angular_speed_rad_s,
        }
    }
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim()).map_err(|e| e.to_string())
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}
