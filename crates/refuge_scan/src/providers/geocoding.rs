//! Forward geocoding source.
use serde::Deserialize;

use crate::error::Result;
use crate::geo::LatLon;
use crate::providers::DEFAULT_API_BASE;
use crate::scan::sources::{GeocodedPlace, GeocodingSource};

/// Free-text search backed by a forward-geocoding endpoint. Only consumed
/// to obtain a reference point for scans.
#[derive(Debug, Clone)]
pub struct ForwardGeocodingSource {
    client: reqwest::Client,
    api_base: String,
    access_token: String,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    features: Vec<GeocodingFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodingFeature {
    /// `[lon, lat]`.
    center: [f64; 2],
    place_name: String,
}

impl ForwardGeocodingSource {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_owned(),
            access_token: access_token.into(),
            limit: 5,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    fn url(&self, query: &str) -> String {
        format!(
            "{}/geocoding/v5/mapbox.places/{}.json?access_token={}&limit={}&types=address,poi,locality",
            self.api_base,
            urlencoding::encode(query),
            self.access_token,
            self.limit
        )
    }
}

impl GeocodingSource for ForwardGeocodingSource {
    async fn search(&self, query: &str) -> Result<Vec<GeocodedPlace>> {
        let response: GeocodingResponse = self
            .client
            .get(self.url(query))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response
            .features
            .into_iter()
            .filter_map(|feature| {
                let [lon, lat] = feature.center;
                let coords = LatLon::try_new(lat, lon).ok()?;
                Some(GeocodedPlace {
                    label: feature.place_name,
                    coords,
                })
            })
            .collect())
    }
}
