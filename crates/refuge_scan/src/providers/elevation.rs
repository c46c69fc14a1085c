//! Terrain tilequery elevation source.
use serde::Deserialize;

use crate::error::Result;
use crate::geo::LatLon;
use crate::providers::DEFAULT_API_BASE;
use crate::scan::sources::ElevationSource;

/// Elevation source backed by a terrain-contour tilequery endpoint.
///
/// The query returns the contour features nearest the coordinate; the
/// first feature's `ele` property is the elevation in meters. No contour
/// nearby means no data, which the pipeline treats as "skip flood risk".
#[derive(Debug, Clone)]
pub struct TilequeryElevationSource {
    client: reqwest::Client,
    api_base: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TilequeryResponse {
    #[serde(default)]
    features: Vec<TilequeryFeature>,
}

#[derive(Debug, Deserialize)]
struct TilequeryFeature {
    properties: TilequeryProperties,
}

#[derive(Debug, Deserialize)]
struct TilequeryProperties {
    #[serde(default)]
    ele: Option<f64>,
}

impl TilequeryElevationSource {
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

    fn url(&self, at: LatLon) -> String {
        format!(
            "{}/v4/mapbox.mapbox-terrain-v2/tilequery/{},{}.json?layers=contour&access_token={}",
            self.api_base, at.lon, at.lat, self.access_token
        )
    }
}

impl ElevationSource for TilequeryElevationSource {
    async fn elevation_m(&self, at: LatLon) -> Result<Option<f64>> {
        let response: TilequeryResponse = self
            .client
            .get(self.url(at))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.features.first().and_then(|f| f.properties.ele))
    }
}
