//! The uniform place model shared by the whole pipeline.
//!
//! A [`Place`] is one candidate safe location: a normalized geographic
//! feature, or a synthesized terrain zone. Scores, categories, and flood
//! risk are stamped by [`crate::score`]; presenters consume places through
//! [`crate::scan::ScanResult`] and derive all display strings from the
//! numeric fields.
use serde::Serialize;

use crate::geo::{format_distance, LatLon};

/// Opaque source identifier, e.g. `"way/123456"`. Synthesized zones have
/// none.
pub type PlaceId = String;

/// Structural category of a candidate safe location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaceKind {
    Hospital,
    Shelter,
    AssemblyPoint,
    Park,
    Peak,
    Building,
    /// Synthesized high-ground recommendation; always carries elevation
    /// and flood risk.
    TerrainZone,
}

/// Flood-risk band derived from elevation.
///
/// Ordering is by severity: `Low < Moderate < High < Critical`. Risk is
/// monotonic in falling elevation, so a higher elevation never yields a
/// higher band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum FloodRisk {
    Low,
    Moderate,
    High,
    Critical,
}

/// Elevation band boundaries in meters: below the first is Critical,
/// below the second High, below the third Moderate, else Low.
pub const ELEVATION_BANDS_M: (f64, f64, f64) = (1200.0, 1500.0, 1800.0);

impl FloodRisk {
    /// Classifies an elevation into its risk band.
    pub fn from_elevation_m(elevation_m: f64) -> Self {
        let (critical, high, moderate) = ELEVATION_BANDS_M;
        if elevation_m < critical {
            FloodRisk::Critical
        } else if elevation_m < high {
            FloodRisk::High
        } else if elevation_m < moderate {
            FloodRisk::Moderate
        } else {
            FloodRisk::Low
        }
    }

    /// Applies this band's penalty to a safety score, clamped to the
    /// band's floor.
    pub fn adjust(self, score: u8) -> u8 {
        match self {
            FloodRisk::Critical => score.saturating_sub(40).max(20),
            FloodRisk::High => score.saturating_sub(25).max(30),
            FloodRisk::Moderate => score.saturating_sub(15).max(40),
            FloodRisk::Low => score,
        }
    }

    /// Numeric risk magnitude used by the fallback-zone score formula.
    pub fn risk_score(self) -> u8 {
        match self {
            FloodRisk::Critical => 100,
            FloodRisk::High => 75,
            FloodRisk::Moderate => 50,
            FloodRisk::Low => 25,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FloodRisk::Critical => "Critical",
            FloodRisk::High => "High",
            FloodRisk::Moderate => "Moderate",
            FloodRisk::Low => "Low",
        }
    }
}

/// Presenter badge derived from the final safety score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Badge {
    Priority,
    Safe,
    Caution,
    Unsafe,
}

impl Badge {
    pub fn for_score(score: u8) -> Self {
        if score >= 90 {
            Badge::Priority
        } else if score >= 65 {
            Badge::Safe
        } else if score >= 40 {
            Badge::Caution
        } else {
            Badge::Unsafe
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Badge::Priority => "PRIORITY",
            Badge::Safe => "SAFE",
            Badge::Caution => "CAUTION",
            Badge::Unsafe => "UNSAFE",
        }
    }
}

/// A candidate safe location.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize)]
pub struct Place {
    /// Source identifier; `None` for synthesized zones. Dedup key.
    pub id: Option<PlaceId>,
    /// Display label, if the source provides a usable one.
    pub name: Option<String>,
    pub kind: PlaceKind,
    pub coords: LatLon,
    /// Floor count, when tagged.
    pub levels: Option<u32>,
    /// Structure height in meters, when tagged.
    pub height_m: Option<f64>,
    /// Terrain elevation in meters; known for synthesized zones and some
    /// sources only.
    pub elevation_m: Option<f64>,
    /// Distance from the active reference point; set by the orchestrator.
    pub distance_km: Option<f64>,
    /// Set only when elevation is known.
    pub flood_risk: Option<FloodRisk>,
    /// Final safety score in [0, 100]; always computed, never source data.
    pub safety_score: u8,
    /// Display category derived from kind and score.
    pub category: &'static str,
    /// Display icon name derived alongside the category.
    pub icon: &'static str,
}

impl Place {
    pub fn new(kind: PlaceKind, coords: LatLon) -> Self {
        Self {
            id: None,
            name: None,
            kind,
            coords,
            levels: None,
            height_m: None,
            elevation_m: None,
            distance_km: None,
            flood_risk: None,
            safety_score: 0,
            category: "",
            icon: "",
        }
    }

    pub fn with_id(mut self, id: impl Into<PlaceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_levels(mut self, levels: u32) -> Self {
        self.levels = Some(levels);
        self
    }

    pub fn with_height_m(mut self, height_m: f64) -> Self {
        self.height_m = Some(height_m);
        self
    }

    pub fn with_elevation_m(mut self, elevation_m: f64) -> Self {
        self.elevation_m = Some(elevation_m);
        self
    }

    /// Formatted distance from the reference point, derived from
    /// [`Place::distance_km`].
    pub fn distance_label(&self) -> Option<String> {
        self.distance_km.map(format_distance)
    }

    /// Label shown to the user: the source name, or a distance-based
    /// substitute when the source has none.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match self.distance_label() {
            Some(distance) => format!("Building {distance} away"),
            None => self.category.to_string(),
        }
    }

    /// Height when tagged, otherwise an estimate of 3.5 m per floor.
    pub fn estimated_height_m(&self) -> Option<f64> {
        self.height_m
            .or_else(|| self.levels.map(|l| f64::from(l) * 3.5))
    }

    pub fn badge(&self) -> Badge {
        Badge::for_score(self.safety_score)
    }
}
