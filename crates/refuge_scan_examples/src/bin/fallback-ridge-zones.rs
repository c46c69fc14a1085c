use refuge_scan::fallback::generate_zones;
use refuge_scan::prelude::*;
use refuge_scan_examples::{init_tracing, print_ranked};

/// Shows the synthesized high-ground recommendations for a valley
/// reference with no mapped structures, at a few baseline elevations.
fn main() {
    init_tracing();

    let reference = LatLon::new(31.0900, 77.1500);

    for baseline in [None, Some(1600.0), Some(1760.0)] {
        match baseline {
            Some(elevation) => println!("--- baseline elevation {elevation} m ---"),
            None => println!("--- baseline elevation unknown ---"),
        }

        let zones = generate_zones(reference, baseline);
        let result = ScanResult::new().with_places(zones).with_fallback(true);
        print_ranked(&result);
        println!();
    }
}
