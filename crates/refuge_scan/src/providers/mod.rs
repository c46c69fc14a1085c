//! HTTP implementations of the collaborator traits.
//!
//! Every provider is thin: build a request, await the response, parse the
//! payload. All pipeline logic lives in [`crate::scan`]; swapping any of
//! these for a fixture changes nothing upstream.
pub mod directions;
pub mod elevation;
pub mod geocoding;
pub mod overpass;

pub use directions::DirectionsRoutingSource;
pub use elevation::TilequeryElevationSource;
pub use geocoding::ForwardGeocodingSource;
pub use overpass::OverpassFeatureSource;

/// Default base URL for the tilequery, directions, and geocoding
/// providers.
pub const DEFAULT_API_BASE: &str = "https://api.mapbox.com";
