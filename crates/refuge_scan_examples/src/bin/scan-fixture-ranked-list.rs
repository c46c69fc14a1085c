use refuge_scan::prelude::*;
use refuge_scan_examples::{init_tracing, print_ranked};

/// A small Shimla-like neighborhood: a hospital, a shelter, parks, and a
/// spread of buildings with mixed level/height tagging.
const FIXTURE: &str = r#"{
    "elements": [
        {"type": "node", "id": 101, "lat": 31.1068, "lon": 77.1734,
         "tags": {"amenity": "hospital", "name": "Indira Gandhi Medical College"}},
        {"type": "node", "id": 102, "lat": 31.1020, "lon": 77.1700,
         "tags": {"amenity": "shelter"}},
        {"type": "node", "id": 103, "lat": 31.1100, "lon": 77.1800,
         "tags": {"leisure": "park", "name": "Ridge Gardens"}},
        {"type": "way", "id": 201,
         "geometry": [{"lat": 31.1052, "lon": 77.1740},
                      {"lat": 31.1054, "lon": 77.1744},
                      {"lat": 31.1050, "lon": 77.1742}],
         "tags": {"building": "apartments", "building:levels": "5",
                  "addr:street": "Mall Road", "addr:housenumber": "18"}},
        {"type": "way", "id": 202,
         "geometry": [{"lat": 31.1080, "lon": 77.1690},
                      {"lat": 31.1082, "lon": 77.1694}],
         "tags": {"building": "residential", "building:levels": "2"}},
        {"type": "node", "id": 104, "lat": 31.1040, "lon": 77.1760,
         "tags": {"building": "yes", "height": "4 m"}},
        {"type": "node", "id": 105, "lat": 31.1500, "lon": 77.2200,
         "tags": {"amenity": "hospital", "name": "Too Far Hospital"}},
        {"type": "way", "id": 203, "tags": {"building": "yes"}},
        {"type": "node", "id": 106, "lat": 31.1090, "lon": 77.1770,
         "tags": {"natural": "peak", "name": "Jakhu Hill"}}
    ]
}"#;

struct FixtureFeatures;

impl FeatureSource for FixtureFeatures {
    async fn fetch(&self, _region: BoundingBox) -> Result<FeatureCollection> {
        FeatureCollection::from_json(FIXTURE)
    }
}

struct FixtureElevation;

impl ElevationSource for FixtureElevation {
    async fn elevation_m(&self, _at: LatLon) -> Result<Option<f64>> {
        // Shimla ridge sits around 2200 m, comfortably in the Low band.
        Ok(Some(2200.0))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // A pinned location and a GPS fix are both known; the pin wins because
    // no search selection outranks it.
    let sources = ReferenceSources {
        search: None,
        pin: Some(LatLon::new(31.1048, 77.1734)),
        gps: Some(LatLon::new(31.0900, 77.1500)),
    };
    let (origin, reference) = sources.resolve().expect("a reference point is set");
    println!("Scanning around {reference:?} (from {origin:?})\n");

    let orchestrator = ScanOrchestrator::new(FixtureFeatures, FixtureElevation);

    let result = orchestrator.scan(&ScanRequest::Around(reference)).await?;
    print_ranked(&result);

    // Pick the top-ranked place the way a presenter would on click.
    if let Some(route) = orchestrator.select_ranked(0) {
        println!(
            "\nNavigate: ({:.4}, {:.4}) -> ({:.4}, {:.4})",
            route.origin.lat, route.origin.lon, route.destination.lat, route.destination.lon
        );
    }

    Ok(())
}
