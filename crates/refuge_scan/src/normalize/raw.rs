//! Wire model for the raw feature payload.
//!
//! The feature source returns an Overpass-style JSON document: a flat
//! `elements` array of nodes, ways, and relations, each with an open-ended
//! tag map. Point elements carry `lat`/`lon` directly; ways and relations
//! carry member-node coordinate lists (the `out geom` form).
use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Open-ended key/value tags attached to an element.
pub type Tags = BTreeMap<String, String>;

/// A parsed feature payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub elements: Vec<RawElement>,
}

impl FeatureCollection {
    /// Parses a JSON payload. A payload that does not parse at all is a
    /// source failure, not a per-element defect.
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|e| Error::SourceUnavailable {
            source_name: "feature",
            reason: format!("malformed payload: {e}"),
        })
    }
}

/// One raw geographic element.
#[derive(Debug, Clone, Deserialize)]
pub struct RawElement {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub id: i64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Member-node coordinates for ways.
    #[serde(default)]
    pub geometry: Vec<RawPoint>,
    /// Relation members, each with its own coordinate list.
    #[serde(default)]
    pub members: Vec<RawMember>,
    #[serde(default)]
    pub tags: Tags,
}

impl RawElement {
    /// Source identifier in `"<type>/<id>"` form.
    pub fn source_id(&self) -> String {
        format!("{}/{}", self.element_type.as_str(), self.id)
    }

    /// All member coordinates this element resolves to. Empty for a point
    /// element (which uses `lat`/`lon` directly).
    pub fn member_points(&self) -> impl Iterator<Item = RawPoint> + '_ {
        self.geometry
            .iter()
            .copied()
            .chain(self.members.iter().flat_map(|m| m.geometry.iter().copied()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Node,
    Way,
    Relation,
}

impl ElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Node => "node",
            ElementType::Way => "way",
            ElementType::Relation => "relation",
        }
    }
}

/// A bare coordinate inside a geometry list.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawPoint {
    pub lat: f64,
    pub lon: f64,
}

/// A relation member; only its geometry matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMember {
    #[serde(default)]
    pub geometry: Vec<RawPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_node_and_way_elements() {
        let payload = r#"{
            "elements": [
                {"type": "node", "id": 1, "lat": 31.1, "lon": 77.2,
                 "tags": {"amenity": "hospital", "name": "Civil Hospital"}},
                {"type": "way", "id": 2,
                 "geometry": [{"lat": 31.0, "lon": 77.0}, {"lat": 31.2, "lon": 77.4}],
                 "tags": {"building": "residential"}}
            ]
        }"#;
        let collection = FeatureCollection::from_json(payload).unwrap();
        assert_eq!(collection.elements.len(), 2);

        let node = &collection.elements[0];
        assert_eq!(node.element_type, ElementType::Node);
        assert_eq!(node.source_id(), "node/1");
        assert_eq!(node.lat, Some(31.1));

        let way = &collection.elements[1];
        assert_eq!(way.source_id(), "way/2");
        assert_eq!(way.member_points().count(), 2);
    }

    #[test]
    fn relation_members_contribute_points() {
        let payload = r#"{
            "elements": [
                {"type": "relation", "id": 9,
                 "members": [
                    {"geometry": [{"lat": 1.0, "lon": 1.0}]},
                    {"geometry": [{"lat": 3.0, "lon": 3.0}]}
                 ],
                 "tags": {"building": "yes"}}
            ]
        }"#;
        let collection = FeatureCollection::from_json(payload).unwrap();
        assert_eq!(collection.elements[0].member_points().count(), 2);
    }

    #[test]
    fn malformed_payload_is_a_source_failure() {
        let err = FeatureCollection::from_json("<html>rate limited</html>").unwrap_err();
        assert!(matches!(
            err,
            Error::SourceUnavailable {
                source_name: "feature",
                ..
            }
        ));
    }

    #[test]
    fn empty_payload_parses_to_no_elements() {
        let collection = FeatureCollection::from_json("{}").unwrap();
        assert!(collection.elements.is_empty());
    }
}
