//! External collaborator traits.
//!
//! The pipeline only ever talks to its collaborators through these traits,
//! so tests and offline demos can swap in fixtures. All collaborators are
//! best-effort: callers must expect empty, malformed, and failed
//! responses.
use crate::error::Result;
use crate::geo::{format_distance, BoundingBox, LatLon};
use crate::normalize::FeatureCollection;

/// Source of raw tagged geographic elements for a region.
#[allow(async_fn_in_trait)]
pub trait FeatureSource {
    /// Fetches all candidate elements inside `region`.
    async fn fetch(&self, region: BoundingBox) -> Result<FeatureCollection>;
}

/// Source of terrain elevation for a coordinate.
#[allow(async_fn_in_trait)]
pub trait ElevationSource {
    /// Elevation in meters, or `Ok(None)` when the source has no data for
    /// this coordinate.
    async fn elevation_m(&self, at: LatLon) -> Result<Option<f64>>;
}

/// Walking-route collaborator.
#[allow(async_fn_in_trait)]
pub trait RoutingSource {
    /// Summary of a walking route, or `Ok(None)` when no route exists.
    async fn walking_route(&self, origin: LatLon, destination: LatLon)
        -> Result<Option<RouteSummary>>;
}

/// Free-text search collaborator; consumed only to obtain a reference
/// point.
#[allow(async_fn_in_trait)]
pub trait GeocodingSource {
    async fn search(&self, query: &str) -> Result<Vec<GeocodedPlace>>;
}

/// Distance and duration of a walking route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    pub distance_m: f64,
    pub duration_s: f64,
}

impl RouteSummary {
    pub fn distance_label(&self) -> String {
        format_distance(self.distance_m / 1000.0)
    }

    /// Duration rounded to whole minutes.
    pub fn duration_minutes(&self) -> u64 {
        (self.duration_s / 60.0).round() as u64
    }
}

/// One geocoding candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub label: String,
    pub coords: LatLon,
}
