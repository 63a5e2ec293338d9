use serde::Deserialize;

use super::lla_to_ecef;

/// A fixed antenna position (transmitter or receiver).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "SiteConfig")]
pub struct Site {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

/// Accepted YAML shapes: `"lat, lon"`, `{coordinates, altitude_m}` or
/// explicit `{latitude_deg, longitude_deg, altitude_m}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SiteConfig {
    Coordinates(String),
    Station {
        coordinates: String,
        #[serde(default)]
        altitude_m: f64,
    },
    Explicit {
        latitude_deg: f64,
        longitude_deg: f64,
        #[serde(default)]
        altitude_m: f64,
    },
}

impl TryFrom<SiteConfig> for Site {
    type Error = String;

    fn try_from(config: SiteConfig) -> Result<Self, Self::Error> {
        let invalid = |c: &str| format!("invalid coordinates '{}', expected \"lat, lon\"", c);
        match config {
            SiteConfig::Coordinates(c) => {
                Site::from_coordinates(&c, None).ok_or_else(|| invalid(&c))
            }
            SiteConfig::Station {
                coordinates,
                altitude_m,
            } => Site::from_coordinates(&coordinates, Some(altitude_m))
                .ok_or_else(|| invalid(&coordinates)),
            SiteConfig::Explicit {
                latitude_deg,
                longitude_deg,
                altitude_m,
            } => Ok(Site::new(latitude_deg, longitude_deg, altitude_m)),
        }
    }
}

impl Site {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }

    /// Parses `"lat, lon"` in degrees.
    pub fn from_coordinates(coordinates: &str, altitude_m: Option<f64>) -> Option<Self> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return None;
        }
        let lat = parts[0].parse().ok()?;
        let lon = parts[1].parse().ok()?;
        Some(Self::new(lat, lon, altitude_m.unwrap_or(0.0)))
    }

    pub fn position_ecef_m(&self) -> [f64; 3] {
        lla_to_ecef(self.latitude_deg, self.longitude_deg, self.altitude_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinate_pair() {
        let site = Site::from_coordinates(" -34.9192, 138.6027 ", Some(110.0)).unwrap();
        assert_eq!(site, Site::new(-34.9192, 138.6027, 110.0));

        let ground = Site::from_coordinates("-34.9810,138.7081", None).unwrap();
        assert_eq!(ground.altitude_m, 0.0);
    }

    #[test]
    fn single_value_is_rejected() {
        assert!(Site::from_coordinates("-34.9192", None).is_none());
        assert!(Site::from_coordinates("", None).is_none());
    }

    #[test]
    fn non_numeric_parts_are_rejected() {
        assert!(Site::from_coordinates("north, east", None).is_none());
        assert!(Site::from_coordinates("-34.9, east", None).is_none());
        assert!(Site::from_coordinates("1, 2, 3", None).is_none());
    }

    #[test]
    fn yaml_accepts_every_shape() {
        let plain: Site = serde_yaml::from_str("\"-34.9192, 138.6027\"").unwrap();
        assert_eq!(plain, Site::new(-34.9192, 138.6027, 0.0));

        let station: Site =
            serde_yaml::from_str("coordinates: \"-34.9810, 138.7081\"\naltitude_m: 750").unwrap();
        assert_eq!(station, Site::new(-34.9810, 138.7081, 750.0));

        let explicit: Site =
            serde_yaml::from_str("latitude_deg: -35.0\nlongitude_deg: 138.5").unwrap();
        assert_eq!(explicit, Site::new(-35.0, 138.5, 0.0));
    }

    #[test]
    fn yaml_rejects_bad_coordinates() {
        assert!(serde_yaml::from_str::<Site>("\"somewhere\"").is_err());
        assert!(serde_yaml::from_str::<Site>("coordinates: \"1\"").is_err());
    }
}
