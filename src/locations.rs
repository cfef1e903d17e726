//! Synthetic ATM locations scattered around a center coordinate.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Number of ATMs generated per batch.
pub const LOCATION_COUNT: usize = 10;

/// Upper bound (exclusive) of the per-axis offset from the center, in degrees.
pub const MAX_OFFSET_DEGREES: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Position in generation order, before sorting.
    pub id: u32,
    pub coord: Coordinate,
    pub label: String,
    pub distance_text: String,
    pub cash_available: bool,
}

/// Draws a value in [0, 10) and negates `value` when the draw is below 5.
pub fn randomize_sign<R: Rng + ?Sized>(value: f64, rng: &mut R) -> f64 {
    if rng.gen::<f64>() * 10.0 < 5.0 {
        -value
    } else {
        value
    }
}

pub fn format_distance(km: f64) -> String {
    format!("{km:.2} Km")
}

/// Builds a batch of [`LOCATION_COUNT`] ATMs around `center`, nearest first.
pub fn generate_locations<R: Rng + ?Sized>(center: Coordinate, rng: &mut R) -> Vec<Location> {
    let mut locations = Vec::with_capacity(LOCATION_COUNT);
    for index in 0..LOCATION_COUNT {
        let lat_offset = randomize_sign(rng.gen::<f64>() * MAX_OFFSET_DEGREES, rng);
        let lng_offset = randomize_sign(rng.gen::<f64>() * MAX_OFFSET_DEGREES, rng);
        let coord = Coordinate::new(center.latitude + lat_offset, center.longitude + lng_offset);
        let distance = center.distance_to(&coord);
        locations.push(Location {
            id: index as u32,
            coord,
            label: format!("ATM {}", index + 1),
            distance_text: format_distance(distance),
            cash_available: rng.gen::<f64>() * 10.0 < 5.0,
        });
    }
    sort_by_proximity(&mut locations, center);
    locations
}

/// Stable ascending sort by distance from `reference`.
pub fn sort_by_proximity(locations: &mut [Location], reference: Coordinate) {
    locations.sort_by(|a, b| {
        reference
            .distance_to(&a.coord)
            .total_cmp(&reference.distance_to(&b.coord))
    });
}
