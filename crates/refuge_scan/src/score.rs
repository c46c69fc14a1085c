//! Safety scoring for normalized places.
//!
//! Scoring is a pure precedence cascade over [`PlaceKind`], with building
//! scores graded by floor count or height, followed by a flood-risk
//! adjustment that only applies when the place's elevation is known.
use crate::place::{FloodRisk, Place, PlaceKind};

/// Outcome of assessing a place: base score plus the derived display
/// strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub score: u8,
    pub category: &'static str,
    pub icon: &'static str,
}

impl Assessment {
    const fn new(score: u8, category: &'static str, icon: &'static str) -> Self {
        Self {
            score,
            category,
            icon,
        }
    }
}

/// Assigns the base score, category, and icon for a place.
///
/// Precedence: hospital > shelter/assembly point > peak > park >
/// synthesized zone (keeps its precomputed values) > building by
/// levels/height.
pub fn assess(place: &Place) -> Assessment {
    match place.kind {
        PlaceKind::Hospital => Assessment::new(100, "Hospital", "fa-hospital"),
        PlaceKind::Shelter | PlaceKind::AssemblyPoint => {
            Assessment::new(95, "Emergency Shelter", "fa-house-circle-check")
        }
        PlaceKind::Peak => Assessment::new(90, "High Ground", "fa-mountain"),
        PlaceKind::Park => Assessment::new(70, "Open Space", "fa-tree"),
        // Zones arrive pre-scored by the fallback generator.
        PlaceKind::TerrainZone => Assessment::new(place.safety_score, place.category, place.icon),
        PlaceKind::Building => assess_building(place.levels, place.height_m),
    }
}

/// Grades a building by floor count, falling back to height when no floor
/// count is tagged. Levels take precedence when both are present.
fn assess_building(levels: Option<u32>, height_m: Option<f64>) -> Assessment {
    const VERY_SAFE: Assessment = Assessment::new(85, "Very Safe Building", "fa-building");
    const SAFE: Assessment = Assessment::new(65, "Safe Building", "fa-building");
    const GROUND_PLUS_ONE: Assessment = Assessment::new(45, "Ground+1 Building", "fa-building");
    const GROUND: Assessment = Assessment::new(25, "Ground Level", "fa-building");

    match (levels, height_m) {
        (Some(l), _) if l >= 3 => VERY_SAFE,
        (Some(2), _) => SAFE,
        (Some(1), _) => GROUND_PLUS_ONE,
        (Some(_), _) => GROUND,
        (None, Some(h)) if h >= 9.0 => VERY_SAFE,
        (None, Some(h)) if h >= 6.0 => SAFE,
        (None, Some(h)) if h >= 3.0 => GROUND_PLUS_ONE,
        _ => GROUND,
    }
}

/// Stamps a place with its final score, category, icon, and flood risk.
///
/// The flood adjustment requires a known elevation; places without one are
/// scored on structure alone and keep `flood_risk = None`.
pub fn apply(place: &mut Place) {
    let assessment = assess(place);
    let mut score = assessment.score;

    if place.kind != PlaceKind::TerrainZone {
        if let Some(elevation) = place.elevation_m {
            let risk = FloodRisk::from_elevation_m(elevation);
            score = risk.adjust(score);
            place.flood_risk = Some(risk);
        }
    }

    place.safety_score = score.min(100);
    place.category = assessment.category;
    place.icon = assessment.icon;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLon;

    fn place(kind: PlaceKind) -> Place {
        Place::new(kind, LatLon::new(31.1048, 77.1734))
    }

    #[test]
    fn hospital_outranks_everything() {
        let mut p = place(PlaceKind::Hospital);
        apply(&mut p);
        assert_eq!(p.safety_score, 100);
        assert_eq!(p.category, "Hospital");
        assert_eq!(p.icon, "fa-hospital");
    }

    #[test]
    fn shelter_and_assembly_point_share_a_category() {
        for kind in [PlaceKind::Shelter, PlaceKind::AssemblyPoint] {
            let mut p = place(kind);
            apply(&mut p);
            assert_eq!(p.safety_score, 95);
            assert_eq!(p.category, "Emergency Shelter");
        }
    }

    #[test]
    fn building_grades_by_levels() {
        let cases = [(5, 85), (3, 85), (2, 65), (1, 45), (0, 25)];
        for (levels, expected) in cases {
            let mut p = place(PlaceKind::Building).with_levels(levels);
            apply(&mut p);
            assert_eq!(p.safety_score, expected, "levels = {levels}");
        }
    }

    #[test]
    fn building_grades_by_height_when_levels_missing() {
        let cases = [(12.0, 85), (9.0, 85), (7.5, 65), (4.0, 45), (2.5, 25)];
        for (height, expected) in cases {
            let mut p = place(PlaceKind::Building).with_height_m(height);
            apply(&mut p);
            assert_eq!(p.safety_score, expected, "height = {height}");
        }
    }

    #[test]
    fn levels_take_precedence_over_height() {
        let mut p = place(PlaceKind::Building).with_levels(1).with_height_m(20.0);
        apply(&mut p);
        assert_eq!(p.safety_score, 45);
    }

    #[test]
    fn hospital_without_elevation_keeps_full_score() {
        // Reference point may sit in a Critical band, but the penalty only
        // applies to places whose own elevation is known.
        let mut p = place(PlaceKind::Hospital);
        apply(&mut p);
        assert_eq!(p.safety_score, 100);
        assert_eq!(p.flood_risk, None);
    }

    #[test]
    fn critical_elevation_penalizes_tall_building() {
        let mut p = place(PlaceKind::Building)
            .with_levels(3)
            .with_elevation_m(1100.0);
        apply(&mut p);
        assert_eq!(p.safety_score, 45);
        assert_eq!(p.flood_risk, Some(FloodRisk::Critical));
    }

    #[test]
    fn low_elevation_band_leaves_score_unchanged() {
        let mut p = place(PlaceKind::Park).with_elevation_m(2100.0);
        apply(&mut p);
        assert_eq!(p.safety_score, 70);
        assert_eq!(p.flood_risk, Some(FloodRisk::Low));
    }

    #[test]
    fn terrain_zone_keeps_precomputed_score() {
        let mut p = place(PlaceKind::TerrainZone).with_elevation_m(1650.0);
        p.safety_score = 63;
        p.category = "High Ground Zone";
        p.icon = "fa-mountain";
        p.flood_risk = Some(FloodRisk::Moderate);
        apply(&mut p);
        assert_eq!(p.safety_score, 63);
        assert_eq!(p.category, "High Ground Zone");
    }
}
