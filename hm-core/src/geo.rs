//! Geographic coordinates and great-circle distance.

use ::geo::{
    Distance,
    Haversine,
    Point,
};
use serde::{
    Deserialize,
    Serialize,
};

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in metres.
    ///
    /// On a road network this never exceeds the length of any road path between the two points,
    /// so it is safe to use as an A* lower bound.
    pub fn great_circle_distance(&self, other: &Location) -> f64 {
        Haversine.distance(self.to_point(), other.to_point())
    }

    fn to_point(self) -> Point<f64> {
        // geo points are (x, y) = (lon, lat)
        Point::new(self.lon, self.lat)
    }
}
