//! Per-scan session state.
use crate::geo::LatLon;
use crate::scan::{ScanResult, ScanState};

/// Snapshot of the orchestrator's state after the most recent scan.
///
/// A session is a value: each completed scan builds a fresh one and the
/// orchestrator swaps it in whole. Sub-steps read it by reference; nothing
/// updates it field-by-field mid-scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    /// Reference point the results are ranked against, if any.
    pub reference: Option<LatLon>,
    /// Elevation at the reference point, when the elevation source
    /// answered in time.
    pub reference_elevation_m: Option<f64>,
    pub state: ScanState,
    /// Results of the last completed scan.
    pub result: Option<ScanResult>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }
}
