//! Configuration for running scans.
use std::time::Duration;

use crate::error::{Error, Result};

/// Tunable parameters of the scan pipeline.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum walkable distance from the reference point; places further
    /// away are dropped. 1.6 km is a 20-minute walk at 5 km/h.
    pub walk_radius_km: f64,
    /// Half-extent of the square query box around a reference point, in
    /// degrees. 0.014 degrees is roughly the walk radius.
    pub region_half_extent_deg: f64,
    /// Result cap after ranking.
    pub max_results: usize,
    /// Distance within which the top result triggers the already-safe
    /// notice.
    pub already_safe_radius_km: f64,
    /// Minimum score for the already-safe notice.
    pub already_safe_min_score: u8,
    /// Budget for the optional elevation query; on expiry the scan
    /// proceeds without flood-risk data.
    pub elevation_timeout: Duration,
    /// Viewport spans larger than this are rejected before querying.
    pub max_region_span_deg: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            walk_radius_km: 1.6,
            region_half_extent_deg: 0.014,
            max_results: 15,
            already_safe_radius_km: 0.05,
            already_safe_min_score: 65,
            elevation_timeout: Duration::from_secs(5),
            max_region_span_deg: 0.25,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the walkable distance cap.
    pub fn with_walk_radius_km(mut self, walk_radius_km: f64) -> Self {
        self.walk_radius_km = walk_radius_km;
        self
    }

    /// Sets the query box half-extent in degrees.
    pub fn with_region_half_extent_deg(mut self, half_extent_deg: f64) -> Self {
        self.region_half_extent_deg = half_extent_deg;
        self
    }

    /// Sets the result cap.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Sets the elevation query budget.
    pub fn with_elevation_timeout(mut self, timeout: Duration) -> Self {
        self.elevation_timeout = timeout;
        self
    }

    /// Sets the viewport span cap in degrees.
    pub fn with_max_region_span_deg(mut self, max_span_deg: f64) -> Self {
        self.max_region_span_deg = max_span_deg;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.walk_radius_km <= 0.0 {
            return Err(Error::InvalidConfig("walk_radius_km must be > 0".into()));
        }
        if self.region_half_extent_deg <= 0.0 {
            return Err(Error::InvalidConfig(
                "region_half_extent_deg must be > 0".into(),
            ));
        }
        if self.max_results == 0 {
            return Err(Error::InvalidConfig("max_results must be > 0".into()));
        }
        if self.max_region_span_deg <= 0.0 {
            return Err(Error::InvalidConfig(
                "max_region_span_deg must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ScanConfig::default().validate().is_ok());
    }

    #[test]
    fn builder_overrides_and_validation() {
        let config = ScanConfig::new()
            .with_walk_radius_km(2.5)
            .with_max_results(30);
        assert_eq!(config.walk_radius_km, 2.5);
        assert_eq!(config.max_results, 30);
        assert!(config.validate().is_ok());

        let broken = ScanConfig::new().with_walk_radius_km(0.0);
        assert!(broken.validate().is_err());
    }
}
