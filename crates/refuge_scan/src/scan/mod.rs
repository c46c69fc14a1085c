//! The scan pipeline: request and result types, collaborator traits,
//! reference resolution, session state, events, and the orchestrator.
use serde::Serialize;

use crate::geo::{BoundingBox, LatLon};
use crate::place::Place;

pub mod config;
pub mod events;
pub mod orchestrator;
pub mod reference;
pub mod session;
pub mod sources;

/// What a scan is anchored to. Immutable per scan invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanRequest {
    /// Scan a fixed walkable box around a reference point.
    Around(LatLon),
    /// Scan the current viewport; no reference point, so no distance
    /// filtering applies.
    Viewport(BoundingBox),
}

impl ScanRequest {
    /// The reference point, when this request has one.
    pub fn reference_point(&self) -> Option<LatLon> {
        match self {
            ScanRequest::Around(point) => Some(*point),
            ScanRequest::Viewport(_) => None,
        }
    }

    /// The query region for this request.
    pub fn region(&self, half_extent_deg: f64) -> BoundingBox {
        match self {
            ScanRequest::Around(point) => BoundingBox::around(*point, half_extent_deg),
            ScanRequest::Viewport(bounds) => *bounds,
        }
    }
}

/// Pipeline state, advanced once per scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
    /// Real structures were found and ranked.
    Populated,
    /// No usable structures; synthesized zones were returned instead.
    EmptyFallback,
    /// Neither structures nor fallback zones could be produced.
    Failed,
}

/// Ranked output of one scan. Rank order is array order. Created fresh per
/// scan and replaced wholesale, never mutated after being handed out.
#[non_exhaustive]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    pub places: Vec<Place>,
    /// Count before truncation to the result cap.
    pub total_found: usize,
    /// True when the places are synthesized terrain zones.
    pub fallback: bool,
    /// True when the top-ranked place is close and safe enough that the
    /// user needs no navigation. Informational only.
    pub already_safe: bool,
}

impl ScanResult {
    /// Creates a new empty [`ScanResult`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the places (and the pre-truncation count) and returns a new
    /// instance.
    pub fn with_places(mut self, places: Vec<Place>) -> Self {
        self.total_found = places.len();
        self.places = places;
        self
    }

    /// Marks the result as synthesized fallback zones.
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }
}
