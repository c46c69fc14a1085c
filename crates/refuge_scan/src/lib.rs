#![forbid(unsafe_code)]
//! refuge_scan: safe-place discovery and scoring for flood-prone hill
//! regions.
//!
//! Modules:
//! - geo: coordinates, bounding boxes, haversine distance, short-range projection
//! - place: the uniform place model (kinds, flood risk, badges)
//! - normalize: raw tagged elements into places
//! - score: structure-and-elevation safety scoring
//! - fallback: synthesized high-ground zones for feature-less areas
//! - scan: the orchestrated pipeline, collaborator traits, sessions, events
//! - providers: HTTP implementations of the collaborators (feature `http`)
pub mod error;
pub mod fallback;
pub mod geo;
pub mod normalize;
pub mod place;
#[cfg(feature = "http")]
pub mod providers;
pub mod scan;
pub mod score;

/// Convenient re-exports for common types. Import with `use refuge_scan::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::fallback::generate_zones;
    pub use crate::geo::{format_distance, haversine_km, project_point, BoundingBox, LatLon};
    pub use crate::normalize::{normalize, FeatureCollection};
    pub use crate::place::{Badge, FloodRisk, Place, PlaceId, PlaceKind};
    #[cfg(feature = "http")]
    pub use crate::providers::{
        DirectionsRoutingSource, ForwardGeocodingSource, OverpassFeatureSource,
        TilequeryElevationSource,
    };
    pub use crate::scan::config::ScanConfig;
    pub use crate::scan::events::{EventSink, FnSink, ScanEvent, VecSink};
    pub use crate::scan::orchestrator::{RouteRequest, ScanOrchestrator};
    pub use crate::scan::reference::{ReferenceOrigin, ReferenceSources, REFERENCE_PRIORITY};
    pub use crate::scan::session::ScanSession;
    pub use crate::scan::sources::{
        ElevationSource, FeatureSource, GeocodedPlace, GeocodingSource, RouteSummary,
        RoutingSource,
    };
    pub use crate::scan::{ScanRequest, ScanResult, ScanState};
    pub use crate::score::{apply as apply_score, assess, Assessment};
}
