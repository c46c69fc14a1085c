//! Geographic primitives: coordinates, bounding boxes, distance and
//! short-range point projection.
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in kilometers, as used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of latitude in the flat-earth offset used by
/// [`project_point`].
pub const KM_PER_DEGREE: f64 = 111.0;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        debug_assert!(lat.is_finite() && lon.is_finite(), "coordinates must be finite");
        Self { lat, lon }
    }

    /// Creates a coordinate, rejecting non-finite components.
    pub fn try_new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(Error::InvalidCoordinate { lat, lon });
        }
        Ok(Self { lat, lon })
    }
}

/// An axis-aligned geographic bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Builds a square box extending `half_extent_deg` degrees from the
    /// center in every direction.
    pub fn around(center: LatLon, half_extent_deg: f64) -> Self {
        Self {
            south: center.lat - half_extent_deg,
            west: center.lon - half_extent_deg,
            north: center.lat + half_extent_deg,
            east: center.lon + half_extent_deg,
        }
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    /// The larger of the two spans, used for region-size guards.
    pub fn max_span(&self) -> f64 {
        self.lat_span().max(self.lon_span())
    }

    pub fn contains(&self, point: LatLon) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lon >= self.west
            && point.lon <= self.east
    }
}

/// Great-circle distance between two coordinates in kilometers.
pub fn haversine_km(a: LatLon, b: LatLon) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Formats a distance for display: below one kilometer the nearest meter
/// (`"450m"`), otherwise two decimals (`"1.60km"`).
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{}m", (km * 1000.0).round())
    } else {
        format!("{km:.2}km")
    }
}

/// Offsets `origin` by `distance_km` along `bearing_deg` (clockwise from
/// north) using a planar approximation.
///
/// This is a flat-earth offset: latitude moves by `d/111 * cos(bearing)`
/// degrees and longitude by `d/111 * sin(bearing) / cos(lat)`. It is only
/// valid for short distances (up to a few kilometers) away from the poles;
/// callers needing long-range projection want a true great-circle formula,
/// which would produce different coordinates than this one.
pub fn project_point(origin: LatLon, bearing_deg: f64, distance_km: f64) -> LatLon {
    let bearing = bearing_deg.to_radians();
    let d_lat = distance_km / KM_PER_DEGREE * bearing.cos();
    let d_lon = distance_km / KM_PER_DEGREE * bearing.sin() / origin.lat.to_radians().cos();
    LatLon::new(origin.lat + d_lat, origin.lon + d_lon)
}
