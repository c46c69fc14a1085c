//! Overpass API feature source.
use crate::error::Result;
use crate::geo::BoundingBox;
use crate::normalize::FeatureCollection;
use crate::scan::sources::FeatureSource;

/// Default public Overpass interpreter endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Feature source backed by an Overpass interpreter.
#[derive(Debug, Clone)]
pub struct OverpassFeatureSource {
    client: reqwest::Client,
    endpoint: String,
}

impl Default for OverpassFeatureSource {
    fn default() -> Self {
        Self::new()
    }
}

impl OverpassFeatureSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
        }
    }

    /// Points the source at a different interpreter, e.g. a self-hosted
    /// mirror.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Builds the tag-filtered query for `region`: buildings with at least
    /// one tagged level, hospitals, shelters, assembly points, parks, and
    /// peaks. `out geom` is requested so ways and relations come back with
    /// member coordinates for centroid computation.
    pub fn build_query(region: BoundingBox) -> String {
        format!(
            "[out:json][timeout:25][bbox:{:.7},{:.7},{:.7},{:.7}];\n\
             (\n\
             \x20 way[\"building\"][\"building:levels\"~\"^[1-9][0-9]*$\"];\n\
             \x20 relation[\"building\"][\"building:levels\"~\"^[1-9][0-9]*$\"];\n\
             \x20 node[\"amenity\"=\"hospital\"];\n\
             \x20 way[\"amenity\"=\"hospital\"];\n\
             \x20 node[\"amenity\"=\"shelter\"];\n\
             \x20 way[\"amenity\"=\"shelter\"];\n\
             \x20 node[\"emergency\"=\"assembly_point\"];\n\
             \x20 way[\"emergency\"=\"assembly_point\"];\n\
             \x20 node[\"leisure\"=\"park\"];\n\
             \x20 way[\"leisure\"=\"park\"];\n\
             \x20 node[\"natural\"=\"peak\"];\n\
             \x20 way[\"natural\"=\"peak\"];\n\
             );\n\
             out geom;",
            region.south, region.west, region.north, region.east
        )
    }
}

impl FeatureSource for OverpassFeatureSource {
    async fn fetch(&self, region: BoundingBox) -> Result<FeatureCollection> {
        let query = Self::build_query(region);
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("data", query.as_str())])
            .send()
            .await?
            .error_for_status()?;
        let payload = response.text().await?;
        FeatureCollection::from_json(&payload)
    }
}
