//! Walking-directions routing source.
use serde::Deserialize;

use crate::error::Result;
use crate::geo::LatLon;
use crate::providers::DEFAULT_API_BASE;
use crate::scan::sources::{RouteSummary, RoutingSource};

/// Routing source backed by a walking-profile directions endpoint.
#[derive(Debug, Clone)]
pub struct DirectionsRoutingSource {
    client: reqwest::Client,
    api_base: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    distance: f64,
    duration: f64,
}

impl DirectionsRoutingSource {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_owned(),
            access_token: access_token.into(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn url(&self, origin: LatLon, destination: LatLon) -> String {
        format!(
            "{}/directions/v5/mapbox/walking/{},{};{},{}?access_token={}&geometries=geojson",
            self.api_base,
            origin.lon,
            origin.lat,
            destination.lon,
            destination.lat,
            self.access_token
        )
    }
}

impl RoutingSource for DirectionsRoutingSource {
    async fn walking_route(
        &self,
        origin: LatLon,
        destination: LatLon,
    ) -> Result<Option<RouteSummary>> {
        let response: DirectionsResponse = self
            .client
            .get(self.url(origin, destination))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.routes.first().map(|route| RouteSummary {
            distance_m: route.distance,
            duration_s: route.duration,
        }))
    }
}
