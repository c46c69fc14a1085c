//! Synthesized high-ground recommendations for feature-less areas.
//!
//! When a scan finds no usable structures (or the feature source fails),
//! the pipeline falls back to a fixed lattice of candidate zones around
//! the reference point: eight compass bearings crossed with five walkable
//! radii. Each candidate gets a synthetic elevation that rises with
//! distance from the valley reference, and only candidates whose flood
//! risk improves on the baseline survive.
use tracing::debug;

use crate::geo::{project_point, LatLon};
use crate::place::{FloodRisk, Place, PlaceKind};

/// Compass bearings (degrees clockwise from north) with their display
/// labels.
pub const COMPASS_BEARINGS: [(f64, &str); 8] = [
    (0.0, "N"),
    (45.0, "NE"),
    (90.0, "E"),
    (135.0, "SE"),
    (180.0, "S"),
    (225.0, "SW"),
    (270.0, "W"),
    (315.0, "NW"),
];

/// Candidate radii in kilometers, all within the 20-minute walk limit.
pub const ZONE_RADII_KM: [f64; 5] = [0.3, 0.6, 0.9, 1.2, 1.5];

/// Baseline elevation assumed when the reference elevation is unknown.
pub const DEFAULT_REFERENCE_ELEVATION_M: f64 = 1500.0;

/// Synthetic elevation gain per kilometer of distance from the reference.
pub const ELEVATION_GAIN_PER_KM: f64 = 50.0;

/// Zones ranked at most this many apart in score count as tied and are
/// ordered by distance instead.
pub const SCORE_TIE_MARGIN: u8 = 5;

/// Maximum number of zones returned.
pub const MAX_ZONES: usize = 12;

const ZONE_BASE_SCORE: u8 = 75;
const ZONE_CATEGORY: &str = "High Ground Zone";
const ZONE_ICON: &str = "fa-mountain";

/// Generates ranked terrain zones around `reference`.
///
/// Candidates in the Critical or High flood bands are discarded: the
/// generator only proposes zones safer than the valley baseline. The
/// survivors are sorted by descending score, near-ties broken by ascending
/// distance, and truncated to [`MAX_ZONES`].
pub fn generate_zones(reference: LatLon, reference_elevation_m: Option<f64>) -> Vec<Place> {
    let base = reference_elevation_m.unwrap_or(DEFAULT_REFERENCE_ELEVATION_M);

    let mut zones = Vec::with_capacity(COMPASS_BEARINGS.len() * ZONE_RADII_KM.len());
    for (bearing, direction) in COMPASS_BEARINGS {
        for radius_km in ZONE_RADII_KM {
            let elevation = base + radius_km * ELEVATION_GAIN_PER_KM;
            let risk = FloodRisk::from_elevation_m(elevation);
            if matches!(risk, FloodRisk::Critical | FloodRisk::High) {
                continue;
            }

            let mut zone = Place::new(PlaceKind::TerrainZone, project_point(reference, bearing, radius_km))
                .with_name(format!("{direction} High Ground"))
                .with_elevation_m(elevation);
            zone.distance_km = Some(radius_km);
            zone.flood_risk = Some(risk);
            zone.safety_score = ZONE_BASE_SCORE - risk.risk_score() / 4;
            zone.category = ZONE_CATEGORY;
            zone.icon = ZONE_ICON;
            zones.push(zone);
        }
    }

    zones.sort_by(|a, b| {
        if a.safety_score.abs_diff(b.safety_score) <= SCORE_TIE_MARGIN {
            a.distance_km.partial_cmp(&b.distance_km).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            b.safety_score.cmp(&a.safety_score)
        }
    });
    zones.truncate(MAX_ZONES);

    debug!(zones = zones.len(), base_elevation_m = base, "generated fallback zones");
    zones
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: LatLon = LatLon {
        lat: 31.1048,
        lon: 77.1734,
    };

    #[test]
    fn unknown_reference_elevation_yields_moderate_zones() {
        let zones = generate_zones(REFERENCE, None);
        assert_eq!(zones.len(), MAX_ZONES);
        for zone in &zones {
            assert_eq!(zone.kind, PlaceKind::TerrainZone);
            assert!(zone.elevation_m.is_some());
            assert!(matches!(
                zone.flood_risk,
                Some(FloodRisk::Low | FloodRisk::Moderate)
            ));
        }
    }

    #[test]
    fn zones_sort_by_score_then_distance() {
        let zones = generate_zones(REFERENCE, Some(1600.0));
        for pair in zones.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.safety_score.abs_diff(b.safety_score) <= SCORE_TIE_MARGIN {
                assert!(a.distance_km <= b.distance_km);
            } else {
                assert!(a.safety_score > b.safety_score);
            }
        }
    }

    #[test]
    fn high_reference_elevation_prefers_low_risk_rings() {
        // At 1760 m the 0.9 km ring crosses into the Low band (>= 1800 m),
        // so distant rings outscore the near Moderate ones.
        let zones = generate_zones(REFERENCE, Some(1760.0));
        let top = &zones[0];
        assert_eq!(top.flood_risk, Some(FloodRisk::Low));
        assert_eq!(top.safety_score, ZONE_BASE_SCORE - FloodRisk::Low.risk_score() / 4);
    }

    #[test]
    fn critical_valley_produces_no_zones() {
        // 1000 m base + at most 75 m of gain never leaves the Critical band.
        let zones = generate_zones(REFERENCE, Some(1000.0));
        assert!(zones.is_empty());
    }

    #[test]
    fn zone_distances_stay_within_walk_radius() {
        for zone in generate_zones(REFERENCE, None) {
            assert!(zone.distance_km.unwrap() <= 1.6);
        }
    }

    #[test]
    fn zone_names_carry_compass_directions() {
        let zones = generate_zones(REFERENCE, None);
        assert!(zones
            .iter()
            .any(|z| z.name.as_deref() == Some("N High Ground")));
    }
}
