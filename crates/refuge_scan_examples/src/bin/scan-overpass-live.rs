use refuge_scan::prelude::*;
use refuge_scan_examples::{init_tracing, print_ranked};

/// A real elevation source is token-gated; this demo scores on structure
/// alone, which is exactly the pipeline's graceful-degradation path.
struct NoElevation;

impl ElevationSource for NoElevation {
    async fn elevation_m(&self, _at: LatLon) -> Result<Option<f64>> {
        Ok(None)
    }
}

/// Scans live Overpass data around a reference point.
///
/// Usage: `scan-overpass-live [lat] [lon]`, defaulting to central Shimla.
/// Set `MAPBOX_ACCESS_TOKEN` to also resolve the reference elevation and
/// get flood-risk scoring.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let lat: f64 = match args.next() {
        Some(raw) => raw.parse()?,
        None => 31.1048,
    };
    let lon: f64 = match args.next() {
        Some(raw) => raw.parse()?,
        None => 77.1734,
    };
    let reference = LatLon::try_new(lat, lon)?;

    let features = OverpassFeatureSource::new();
    let result = match std::env::var("MAPBOX_ACCESS_TOKEN") {
        Ok(token) => {
            let orchestrator =
                ScanOrchestrator::new(features, TilequeryElevationSource::new(token));
            orchestrator.scan(&ScanRequest::Around(reference)).await?
        }
        Err(_) => {
            let orchestrator = ScanOrchestrator::new(features, NoElevation);
            orchestrator.scan(&ScanRequest::Around(reference)).await?
        }
    };

    print_ranked(&result);
    Ok(())
}
