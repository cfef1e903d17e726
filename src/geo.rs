//! Coordinates and great-circle distance.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the globe in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Distance to `other` in kilometers.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * (PI / 180.0)
}

/// Haversine distance in kilometers between two points given in degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = degrees_to_radians(lat2 - lat1);
    let d_lon = degrees_to_radians(lon2 - lon1);
    let a = (d_lat / 2.0).sin().powi(2)
        + degrees_to_radians(lat1).cos()
            * degrees_to_radians(lat2).cos()
            * (d_lon / 2.0).sin().powi(2);
    // rounding can push `a` a hair past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANGALORE: Coordinate = Coordinate {
        latitude: 12.9716,
        longitude: 77.5946,
    };

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(BANGALORE.distance_to(&BANGALORE), 0.0);
        assert_eq!(haversine_distance(-33.9, 151.2, -33.9, 151.2), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (BANGALORE, Coordinate::new(13.0827, 80.2707)),
            (Coordinate::new(51.5074, -0.1278), Coordinate::new(40.7128, -74.006)),
            (Coordinate::new(-89.9, 10.0), Coordinate::new(89.9, -170.0)),
        ];
        for (a, b) in pairs {
            assert_eq!(a.distance_to(&b), b.distance_to(&a));
        }
    }

    #[test]
    fn bangalore_to_chennai_is_about_290_km() {
        let chennai = Coordinate::new(13.0827, 80.2707);
        let distance = BANGALORE.distance_to(&chennai);
        assert!(distance > 280.0 && distance < 300.0, "got {distance}");
    }

    #[test]
    fn quarter_meridian_matches_radius() {
        let equator = Coordinate::new(0.0, 0.0);
        let pole = Coordinate::new(90.0, 0.0);
        let expected = EARTH_RADIUS_KM * PI / 2.0;
        assert!((equator.distance_to(&pole) - expected).abs() < 1e-9);
    }

    #[test]
    fn distances_add_up_along_a_meridian() {
        let a = Coordinate::new(10.0, 77.0);
        let b = Coordinate::new(12.5, 77.0);
        let c = Coordinate::new(15.0, 77.0);
        let whole = a.distance_to(&c);
        let parts = a.distance_to(&b) + b.distance_to(&c);
        assert!((whole - parts).abs() < 1e-6);
    }

    #[test]
    fn grows_with_separation() {
        let mut previous = 0.0;
        for step in 1..=20 {
            let other = Coordinate::new(
                BANGALORE.latitude + step as f64 * 0.001,
                BANGALORE.longitude,
            );
            let distance = BANGALORE.distance_to(&other);
            assert!(distance > previous);
            previous = distance;
        }
    }

    #[test]
    fn serializes_with_short_keys() {
        let json = serde_json::to_string(&Coordinate::new(1.5, -2.0)).unwrap();
        assert_eq!(json, r#"{"lat":1.5,"lng":-2.0}"#);
    }
}
