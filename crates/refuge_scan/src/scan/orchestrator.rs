//! The scan orchestrator: one asynchronous pipeline run per trigger.
//!
//! A scan computes the query region, asks the feature and elevation
//! collaborators concurrently, normalizes and ranks what comes back, and
//! falls back to synthesized terrain zones when the real-structure path
//! produces nothing. A monotonic sequence token makes triggers
//! last-wins: completions belonging to a superseded scan are discarded
//! instead of overwriting newer results.
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::fallback;
use crate::geo::{haversine_km, LatLon};
use crate::normalize;
use crate::place::Place;
use crate::scan::config::ScanConfig;
use crate::scan::events::{EventSink, ScanEvent};
use crate::scan::session::ScanSession;
use crate::scan::sources::{ElevationSource, FeatureSource};
use crate::scan::{ScanRequest, ScanResult, ScanState};
use crate::score;

/// A navigation request for the routing collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub origin: LatLon,
    pub destination: LatLon,
}

/// Pipeline controller owning the scan session and the collaborators.
pub struct ScanOrchestrator<F, E> {
    config: ScanConfig,
    features: F,
    elevation: E,
    sequence: AtomicU64,
    session: Mutex<ScanSession>,
}

impl<F, E> ScanOrchestrator<F, E>
where
    F: FeatureSource,
    E: ElevationSource,
{
    pub fn new(features: F, elevation: E) -> Self {
        Self {
            config: ScanConfig::default(),
            features,
            elevation,
            sequence: AtomicU64::new(0),
            session: Mutex::new(ScanSession::new()),
        }
    }

    pub fn try_new(config: ScanConfig, features: F, elevation: E) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            features,
            elevation,
            sequence: AtomicU64::new(0),
            session: Mutex::new(ScanSession::new()),
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> ScanSession {
        self.lock_session().clone()
    }

    pub fn state(&self) -> ScanState {
        self.lock_session().state
    }

    /// Runs one scan, returning the ranked result.
    pub async fn scan(&self, request: &ScanRequest) -> Result<ScanResult> {
        self.scan_with_events(request, &mut ()).await
    }

    /// Runs one scan, emitting progress events to `sink`.
    pub async fn scan_with_events(
        &self,
        request: &ScanRequest,
        sink: &mut dyn EventSink,
    ) -> Result<ScanResult> {
        let token = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let region = request.region(self.config.region_half_extent_deg);
        if region.max_span() > self.config.max_region_span_deg {
            return Err(Error::RegionTooLarge {
                span_deg: region.max_span(),
                max_deg: self.config.max_region_span_deg,
            });
        }

        let reference = request.reference_point();
        let previous = self.session();
        self.store_session(ScanSession {
            state: ScanState::Scanning,
            ..previous
        });
        info!(token, ?region, "scan started");
        sink.send(ScanEvent::ScanStarted { token, region });

        // The two suspension points of the pipeline. Both queries are
        // independent, so they run concurrently; the elevation answer is
        // optional and bounded by its timeout.
        let (features_res, reference_elevation_m) = tokio::join!(
            self.features.fetch(region),
            self.reference_elevation(reference),
        );
        self.ensure_current(token)?;

        let outcome = match features_res {
            Ok(collection) => {
                sink.send(ScanEvent::FeaturesFetched {
                    token,
                    element_count: collection.elements.len(),
                });
                let in_range =
                    self.filter_by_walk_distance(normalize::normalize(&collection), reference);
                if in_range.is_empty() {
                    self.fallback_result(
                        token,
                        reference,
                        reference_elevation_m,
                        "no usable structures within walking distance",
                        sink,
                    )
                } else {
                    Ok(self.rank(in_range))
                }
            }
            Err(error) => {
                warn!(token, %error, "feature query failed; engaging fallback");
                sink.send(ScanEvent::Warning {
                    context: "feature-source".into(),
                    message: error.to_string(),
                });
                self.fallback_result(token, reference, reference_elevation_m, &error.to_string(), sink)
            }
        };

        match &outcome {
            Ok(result) => {
                let state = if result.fallback {
                    ScanState::EmptyFallback
                } else {
                    ScanState::Populated
                };
                self.store_session(ScanSession {
                    reference,
                    reference_elevation_m,
                    state,
                    result: Some(result.clone()),
                });
                info!(
                    token,
                    places = result.len(),
                    fallback = result.fallback,
                    "scan finished"
                );
                sink.send(ScanEvent::ScanFinished {
                    token,
                    result: result.clone(),
                });
            }
            Err(Error::NoResults) => {
                self.store_session(ScanSession {
                    reference,
                    reference_elevation_m,
                    state: ScanState::Failed,
                    result: None,
                });
                warn!(token, "scan failed: no structures and no fallback zones");
            }
            Err(_) => {}
        }
        outcome
    }

    /// Routing request for a ranked place by source id. Synthesized zones
    /// carry no id; address those by rank instead.
    pub fn select_place(&self, place_id: &str) -> Option<RouteRequest> {
        let session = self.lock_session();
        let origin = session.reference?;
        let destination = session
            .result
            .as_ref()?
            .places
            .iter()
            .find(|p| p.id.as_deref() == Some(place_id))?
            .coords;
        Some(RouteRequest {
            origin,
            destination,
        })
    }

    /// Routing request for the place at `rank` (zero-based) in the current
    /// result.
    pub fn select_ranked(&self, rank: usize) -> Option<RouteRequest> {
        let session = self.lock_session();
        let origin = session.reference?;
        let destination = session.result.as_ref()?.places.get(rank)?.coords;
        Some(RouteRequest {
            origin,
            destination,
        })
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, ScanSession> {
        self.session.lock().expect("scan session lock poisoned")
    }

    fn store_session(&self, session: ScanSession) {
        *self.lock_session() = session;
    }

    fn ensure_current(&self, token: u64) -> Result<()> {
        if self.sequence.load(Ordering::SeqCst) != token {
            return Err(Error::Superseded { token });
        }
        Ok(())
    }

    /// Elevation at the reference point; failures and timeouts degrade to
    /// `None` so scoring proceeds without flood risk.
    async fn reference_elevation(&self, reference: Option<LatLon>) -> Option<f64> {
        let origin = reference?;
        match tokio::time::timeout(
            self.config.elevation_timeout,
            self.elevation.elevation_m(origin),
        )
        .await
        {
            Ok(Ok(elevation)) => elevation,
            Ok(Err(error)) => {
                warn!(%error, "elevation query failed; scoring without flood risk");
                None
            }
            Err(_) => {
                warn!("elevation query timed out; scoring without flood risk");
                None
            }
        }
    }

    /// Stamps distances and drops places beyond the walk radius. Without a
    /// reference point there is nothing to measure against, so everything
    /// is kept.
    fn filter_by_walk_distance(
        &self,
        mut places: Vec<Place>,
        reference: Option<LatLon>,
    ) -> Vec<Place> {
        let Some(origin) = reference else {
            return places;
        };
        for place in &mut places {
            place.distance_km = Some(haversine_km(origin, place.coords));
        }
        places.retain(|p| p.distance_km.is_some_and(|d| d <= self.config.walk_radius_km));
        places
    }

    /// Scores, deduplicates, sorts, and truncates the surviving places.
    fn rank(&self, mut places: Vec<Place>) -> ScanResult {
        for place in &mut places {
            score::apply(place);
        }
        dedupe_by_id(&mut places);
        sort_by_distance(&mut places);
        let total_found = places.len();
        places.truncate(self.config.max_results);
        let already_safe = self.is_already_safe(&places);
        ScanResult {
            places,
            total_found,
            fallback: false,
            already_safe,
        }
    }

    fn fallback_result(
        &self,
        token: u64,
        reference: Option<LatLon>,
        reference_elevation_m: Option<f64>,
        reason: &str,
        sink: &mut dyn EventSink,
    ) -> Result<ScanResult> {
        sink.send(ScanEvent::FallbackEngaged {
            token,
            reason: reason.to_owned(),
        });
        let zones = match reference {
            Some(origin) => fallback::generate_zones(origin, reference_elevation_m),
            None => Vec::new(),
        };
        if zones.is_empty() {
            return Err(Error::NoResults);
        }
        let total_found = zones.len();
        let already_safe = self.is_already_safe(&zones);
        Ok(ScanResult {
            places: zones,
            total_found,
            fallback: true,
            already_safe,
        })
    }

    fn is_already_safe(&self, places: &[Place]) -> bool {
        places.first().is_some_and(|top| {
            top.distance_km
                .is_some_and(|d| d <= self.config.already_safe_radius_km)
                && top.safety_score >= self.config.already_safe_min_score
        })
    }
}

/// Removes later occurrences of a repeated source id; the first ranked
/// occurrence wins. Synthesized places without an id are always kept.
pub fn dedupe_by_id(places: &mut Vec<Place>) {
    let mut seen: HashSet<String> = HashSet::with_capacity(places.len());
    places.retain(|place| match &place.id {
        Some(id) => seen.insert(id.clone()),
        None => true,
    });
}

/// Sorts ascending by distance; places with unknown distance sort last.
/// The sort is stable, so ties keep their input order.
pub fn sort_by_distance(places: &mut [Place]) {
    places.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::geo::BoundingBox;
    use crate::normalize::FeatureCollection;
    use crate::place::{FloodRisk, PlaceKind};
    use crate::scan::events::VecSink;

    const REFERENCE: LatLon = LatLon {
        lat: 31.1048,
        lon: 77.1734,
    };

    struct StaticFeatures(&'static str);

    impl FeatureSource for StaticFeatures {
        async fn fetch(&self, _region: BoundingBox) -> Result<FeatureCollection> {
            tokio::task::yield_now().await;
            FeatureCollection::from_json(self.0)
        }
    }

    struct FailingFeatures;

    impl FeatureSource for FailingFeatures {
        async fn fetch(&self, _region: BoundingBox) -> Result<FeatureCollection> {
            Err(Error::SourceUnavailable {
                source_name: "feature",
                reason: "connection refused".into(),
            })
        }
    }

    struct NoElevation;

    impl ElevationSource for NoElevation {
        async fn elevation_m(&self, _at: LatLon) -> Result<Option<f64>> {
            Ok(None)
        }
    }

    struct FixedElevation(f64);

    impl ElevationSource for FixedElevation {
        async fn elevation_m(&self, _at: LatLon) -> Result<Option<f64>> {
            Ok(Some(self.0))
        }
    }

    struct StalledElevation;

    impl ElevationSource for StalledElevation {
        async fn elevation_m(&self, _at: LatLon) -> Result<Option<f64>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Some(0.0))
        }
    }

    // Hospital ~220 m north, 3-story building ~1.1 km north, another
    // building well outside the 1.6 km walk radius.
    const MIXED_PAYLOAD: &str = r#"{
        "elements": [
            {"type": "node", "id": 30, "lat": 31.1248, "lon": 77.1734,
             "tags": {"building": "apartments", "building:levels": "5"}},
            {"type": "node", "id": 20, "lat": 31.1148, "lon": 77.1734,
             "tags": {"building": "residential", "building:levels": "3"}},
            {"type": "node", "id": 10, "lat": 31.1068, "lon": 77.1734,
             "tags": {"amenity": "hospital", "name": "Civil Hospital"}}
        ]
    }"#;

    fn place_at(id: &str, distance_km: Option<f64>) -> Place {
        let mut place = Place::new(PlaceKind::Building, REFERENCE).with_id(id);
        place.distance_km = distance_km;
        place
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let mut first = place_at("way/1", Some(0.2));
        first.name = Some("first".into());
        let mut dup = place_at("way/1", Some(0.9));
        dup.name = Some("second".into());
        let mut places = vec![first, dup, place_at("way/2", Some(0.5))];

        dedupe_by_id(&mut places);
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name.as_deref(), Some("first"));
    }

    #[test]
    fn dedupe_keeps_all_unidentified_places() {
        let mut places = vec![place_at("way/1", None), {
            let mut z = Place::new(PlaceKind::TerrainZone, REFERENCE);
            z.distance_km = Some(0.3);
            z
        }];
        places.push(Place::new(PlaceKind::TerrainZone, REFERENCE));
        dedupe_by_id(&mut places);
        assert_eq!(places.len(), 3);
    }

    #[test]
    fn sort_puts_unknown_distance_last_and_is_stable() {
        let mut places = vec![
            place_at("a", None),
            place_at("b", Some(1.2)),
            place_at("c", Some(0.4)),
            place_at("d", Some(0.4)),
            place_at("e", None),
        ];
        sort_by_distance(&mut places);
        let order: Vec<_> = places.iter().map(|p| p.id.clone().unwrap()).collect();
        assert_eq!(order, ["c", "d", "b", "a", "e"]);
    }

    #[tokio::test]
    async fn scan_ranks_real_places_by_distance() {
        let orchestrator = ScanOrchestrator::new(StaticFeatures(MIXED_PAYLOAD), NoElevation);
        let result = orchestrator
            .scan(&ScanRequest::Around(REFERENCE))
            .await
            .unwrap();

        assert!(!result.fallback);
        assert_eq!(result.len(), 2, "place beyond 1.6 km must be dropped");
        assert_eq!(result.places[0].id.as_deref(), Some("node/10"));
        assert_eq!(result.places[0].safety_score, 100);
        assert_eq!(result.places[1].id.as_deref(), Some("node/20"));
        assert_eq!(result.places[1].safety_score, 85);
        assert_eq!(orchestrator.state(), ScanState::Populated);
    }

    #[tokio::test]
    async fn places_without_own_elevation_take_no_flood_penalty() {
        // The reference sits in the Critical band, but flood risk applies
        // per place, and real structures here carry no elevation.
        let orchestrator = ScanOrchestrator::new(StaticFeatures(MIXED_PAYLOAD), FixedElevation(1000.0));
        let result = orchestrator
            .scan(&ScanRequest::Around(REFERENCE))
            .await
            .unwrap();

        let hospital = &result.places[0];
        assert_eq!(hospital.category, "Hospital");
        assert_eq!(hospital.safety_score, 100);
        assert_eq!(hospital.flood_risk, None);
        assert_eq!(orchestrator.session().reference_elevation_m, Some(1000.0));
    }

    #[tokio::test]
    async fn empty_feature_set_engages_fallback() {
        let orchestrator =
            ScanOrchestrator::new(StaticFeatures(r#"{"elements": []}"#), FixedElevation(1600.0));
        let mut sink = VecSink::new();
        let result = orchestrator
            .scan_with_events(&ScanRequest::Around(REFERENCE), &mut sink)
            .await
            .unwrap();

        assert!(result.fallback);
        assert!(result.len() <= fallback::MAX_ZONES);
        for place in &result.places {
            assert_eq!(place.kind, PlaceKind::TerrainZone);
            assert!(matches!(
                place.flood_risk,
                Some(FloodRisk::Low | FloodRisk::Moderate)
            ));
        }
        assert_eq!(orchestrator.state(), ScanState::EmptyFallback);
        assert!(sink
            .as_slice()
            .iter()
            .any(|e| matches!(e, ScanEvent::FallbackEngaged { .. })));
    }

    #[tokio::test]
    async fn feature_failure_still_populates_via_fallback() {
        let orchestrator = ScanOrchestrator::new(FailingFeatures, FixedElevation(1600.0));
        let result = orchestrator
            .scan(&ScanRequest::Around(REFERENCE))
            .await
            .unwrap();
        assert!(result.fallback);
        assert!(!result.is_empty());
    }

    #[tokio::test]
    async fn failure_in_critical_valley_reports_no_results() {
        // 1000 m base elevation keeps every synthetic zone in the Critical
        // band, so the fallback has nothing to offer either.
        let orchestrator = ScanOrchestrator::new(FailingFeatures, FixedElevation(1000.0));
        let err = orchestrator
            .scan(&ScanRequest::Around(REFERENCE))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoResults));
        assert_eq!(orchestrator.state(), ScanState::Failed);
    }

    #[tokio::test]
    async fn viewport_scan_keeps_places_without_distances() {
        let bounds = BoundingBox::around(REFERENCE, 0.05);
        let orchestrator = ScanOrchestrator::new(StaticFeatures(MIXED_PAYLOAD), NoElevation);
        let result = orchestrator
            .scan(&ScanRequest::Viewport(bounds))
            .await
            .unwrap();
        // No reference point: nothing is filtered and no distance is set.
        assert_eq!(result.len(), 3);
        assert!(result.places.iter().all(|p| p.distance_km.is_none()));
    }

    #[tokio::test]
    async fn oversized_viewport_is_rejected() {
        let orchestrator = ScanOrchestrator::new(StaticFeatures(MIXED_PAYLOAD), NoElevation);
        let bounds = BoundingBox::new(30.0, 76.0, 32.0, 78.0);
        let err = orchestrator
            .scan(&ScanRequest::Viewport(bounds))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RegionTooLarge { .. }));
    }

    #[tokio::test]
    async fn newer_trigger_supersedes_in_flight_scan() {
        let orchestrator = ScanOrchestrator::new(StaticFeatures(MIXED_PAYLOAD), NoElevation);
        let request = ScanRequest::Around(REFERENCE);
        let (first, second) = tokio::join!(orchestrator.scan(&request), orchestrator.scan(&request));

        assert!(matches!(first.unwrap_err(), Error::Superseded { token: 1 }));
        let result = second.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(orchestrator.state(), ScanState::Populated);
    }

    #[tokio::test]
    async fn stalled_elevation_degrades_to_structure_only_scoring() {
        let config = ScanConfig::new().with_elevation_timeout(Duration::from_millis(5));
        let orchestrator =
            ScanOrchestrator::try_new(config, StaticFeatures(MIXED_PAYLOAD), StalledElevation)
                .unwrap();
        let result = orchestrator
            .scan(&ScanRequest::Around(REFERENCE))
            .await
            .unwrap();
        assert_eq!(result.places[0].safety_score, 100);
        assert_eq!(orchestrator.session().reference_elevation_m, None);
    }

    #[tokio::test]
    async fn already_safe_flag_set_when_top_place_is_at_hand() {
        let payload = r#"{
            "elements": [
                {"type": "node", "id": 1, "lat": 31.1048, "lon": 77.1734,
                 "tags": {"amenity": "shelter", "name": "Ridge Shelter"}}
            ]
        }"#;
        let orchestrator = ScanOrchestrator::new(StaticFeatures(payload), NoElevation);
        let result = orchestrator
            .scan(&ScanRequest::Around(REFERENCE))
            .await
            .unwrap();
        assert!(result.already_safe);
    }

    #[tokio::test]
    async fn select_place_builds_route_request() {
        let orchestrator = ScanOrchestrator::new(StaticFeatures(MIXED_PAYLOAD), NoElevation);
        orchestrator
            .scan(&ScanRequest::Around(REFERENCE))
            .await
            .unwrap();

        let route = orchestrator.select_place("node/10").unwrap();
        assert_eq!(route.origin, REFERENCE);
        assert!((route.destination.lat - 31.1068).abs() < 1e-9);

        assert!(orchestrator.select_place("node/999").is_none());
        assert!(orchestrator.select_ranked(0).is_some());
        assert!(orchestrator.select_ranked(99).is_none());
    }
}
