use crate::utils::calculate_distance;
use serde::{Deserialize, Serialize};

/// WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        calculate_distance(
            (self.latitude, self.longitude),
            (other.latitude, other.longitude),
        )
    }

    pub fn is_within(&self, other: &Coordinate, radius_km: f64) -> bool {
        self.distance_km(other) <= radius_km
    }
}
