#![forbid(unsafe_code)]

use refuge_scan::prelude::*;

/// Installs a subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Prints a scan result the way a presenter would list it.
pub fn print_ranked(result: &ScanResult) {
    if result.fallback {
        println!("No structures found; recommending high ground instead:");
    }
    println!("{} found", result.total_found);
    if result.already_safe {
        println!("You appear to already be at a safe place.");
    }

    for (rank, place) in result.places.iter().enumerate() {
        let mut stats = Vec::new();
        if let Some(levels) = place.levels {
            stats.push(format!("{levels} fl"));
        }
        if let Some(height) = place.estimated_height_m() {
            stats.push(format!("~{height:.0}m tall"));
        }
        if let Some(elevation) = place.elevation_m {
            stats.push(format!("{elevation:.0}m elevation"));
        }
        if let Some(risk) = place.flood_risk {
            stats.push(format!("{} flood risk", risk.label()));
        }
        if let Some(distance) = place.distance_label() {
            stats.push(distance);
        }

        println!(
            "#{:<2} [{:>8}] {:<32} {} | score {:>3} | {}",
            rank + 1,
            place.badge().label(),
            place.display_name(),
            place.category,
            place.safety_score,
            stats.join(", "),
        );
    }
}
