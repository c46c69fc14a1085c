//! Reference-point resolution.
//!
//! A scan can be anchored by a search selection, a dropped pin, or a
//! geolocation fix. The precedence between them is a named constant so it
//! can be audited and tested instead of living in conditional fallthrough.
use crate::geo::LatLon;

/// Where a reference point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceOrigin {
    Search,
    Pin,
    Gps,
}

/// Resolution order: search selection beats a dropped pin beats the
/// geolocation fix.
pub const REFERENCE_PRIORITY: [ReferenceOrigin; 3] = [
    ReferenceOrigin::Search,
    ReferenceOrigin::Pin,
    ReferenceOrigin::Gps,
];

/// The currently known candidate reference points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReferenceSources {
    pub search: Option<LatLon>,
    pub pin: Option<LatLon>,
    pub gps: Option<LatLon>,
}

impl ReferenceSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, origin: ReferenceOrigin) -> Option<LatLon> {
        match origin {
            ReferenceOrigin::Search => self.search,
            ReferenceOrigin::Pin => self.pin,
            ReferenceOrigin::Gps => self.gps,
        }
    }

    /// The first present source in [`REFERENCE_PRIORITY`] order.
    pub fn resolve(&self) -> Option<(ReferenceOrigin, LatLon)> {
        REFERENCE_PRIORITY
            .iter()
            .find_map(|&origin| self.get(origin).map(|point| (origin, point)))
    }
}
