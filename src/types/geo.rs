//! Geographical primitives shared by the map and detail flows.

use serde::{Deserialize, Serialize};

/// Half the edge length, in degrees, of the area the map is allowed to pan within.
const MAX_BOUNDS_HALF_SIZE: f64 = 4.5;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Note that GeoJSON stores coordinates the other way around (`[lon, lat]`); use
/// [`LatLon::from_geojson`] when reading feature geometry.
///
/// # Examples
///
/// ```
/// use oneobs::LatLon;
///
/// let reading = LatLon(51.25, 0.25);
/// assert_eq!(reading.0, 51.25); // Latitude
/// assert_eq!(reading.1, 0.25); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    /// Builds a coordinate from a GeoJSON `[lon, lat, ...]` position.
    ///
    /// Returns `None` when the position has fewer than two elements.
    pub fn from_geojson(position: &[f64]) -> Option<Self> {
        match position {
            [lon, lat, ..] => Some(LatLon(*lat, *lon)),
            _ => None,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }
}

/// A lat/lon rectangle, usually the visible map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// The rectangle the map may be panned within when centered on `center`.
    ///
    /// The box extends 4.5 degrees in every direction and is clamped to the valid
    /// latitude/longitude ranges.
    ///
    /// ```
    /// use oneobs::{BoundingBox, LatLon};
    ///
    /// let bounds = BoundingBox::max_bounds_around(LatLon(88.0, 10.0));
    /// assert_eq!(bounds.max_lat, 90.0);
    /// assert_eq!(bounds.min_lon, 5.5);
    /// ```
    pub fn max_bounds_around(center: LatLon) -> Self {
        Self {
            min_lat: (center.0 - MAX_BOUNDS_HALF_SIZE).max(-90.0),
            max_lat: (center.0 + MAX_BOUNDS_HALF_SIZE).min(90.0),
            min_lon: (center.1 - MAX_BOUNDS_HALF_SIZE).max(-180.0),
            max_lon: (center.1 + MAX_BOUNDS_HALF_SIZE).min(180.0),
        }
    }

    pub fn contains(&self, point: LatLon) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.0)
            && (self.min_lon..=self.max_lon).contains(&point.1)
    }
}
