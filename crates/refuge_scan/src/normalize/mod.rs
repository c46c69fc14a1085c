//! Normalization of raw tagged elements into the uniform [`Place`] model.
//!
//! Geographic data sources routinely return incomplete geometry and junk
//! tag values, so normalization skips defective elements instead of
//! failing the scan: an element with no resolvable coordinates or no
//! recognized kind is dropped with a log line.
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::LatLon;
use crate::place::{Place, PlaceKind};

pub mod raw;

pub use raw::{ElementType, FeatureCollection, RawElement, Tags};

/// Ordered kind-derivation rules; the first matching predicate wins.
///
/// Keeping the precedence as a table makes it auditable and testable in
/// isolation, instead of burying it in a conditional cascade.
pub const KIND_RULES: &[(fn(&Tags) -> bool, PlaceKind)] = &[
    (|t| tag_is(t, "amenity", "hospital"), PlaceKind::Hospital),
    (|t| tag_is(t, "amenity", "shelter"), PlaceKind::Shelter),
    (
        |t| tag_is(t, "emergency", "assembly_point"),
        PlaceKind::AssemblyPoint,
    ),
    (|t| tag_is(t, "leisure", "park"), PlaceKind::Park),
    (|t| tag_is(t, "natural", "peak"), PlaceKind::Peak),
    (|t| t.contains_key("building"), PlaceKind::Building),
];

fn tag_is(tags: &Tags, key: &str, value: &str) -> bool {
    tags.get(key).is_some_and(|v| v == value)
}

/// Tag values that carry no information and must never be shown.
fn is_placeholder(value: &str) -> bool {
    value.eq_ignore_ascii_case("yes") || value.eq_ignore_ascii_case("unknown")
}

/// Normalizes a whole collection. Unrecognized and geometry-less elements
/// are skipped; malformed ones are logged and skipped. Nothing here fails
/// the scan.
pub fn normalize(collection: &FeatureCollection) -> Vec<Place> {
    let mut places = Vec::with_capacity(collection.elements.len());
    for element in &collection.elements {
        match normalize_element(element) {
            Ok(Some(place)) => places.push(place),
            Ok(None) => {}
            Err(error) => debug!(id = %element.source_id(), %error, "dropping element"),
        }
    }
    debug!(
        elements = collection.elements.len(),
        places = places.len(),
        "normalized feature collection"
    );
    places
}

/// Normalizes a single element. `Ok(None)` means the element is valid but
/// not a place (unrecognized tags, or a shape with no member geometry);
/// `Err` means the element itself is defective.
pub fn normalize_element(element: &RawElement) -> Result<Option<Place>> {
    let Some(coords) = resolve_coordinates(element)? else {
        return Ok(None);
    };
    let Some(kind) = derive_kind(&element.tags) else {
        return Ok(None);
    };

    let mut place = Place::new(kind, coords).with_id(element.source_id());
    place.name = derive_name(&element.tags, kind);
    place.levels = parse_levels(&element.tags);
    place.height_m = parse_height(&element.tags);
    Ok(Some(place))
}

/// Point elements use their own coordinate; ways and relations use the
/// arithmetic mean of their member coordinates. An element with zero
/// resolvable members resolves to `Ok(None)`: incomplete geometry is
/// routine for geographic sources, not an error.
fn resolve_coordinates(element: &RawElement) -> Result<Option<LatLon>> {
    if element.element_type == ElementType::Node {
        let (Some(lat), Some(lon)) = (element.lat, element.lon) else {
            return Err(Error::MalformedFeature(format!(
                "point element {} without coordinates",
                element.source_id()
            )));
        };
        return LatLon::try_new(lat, lon)
            .map(Some)
            .map_err(|e| Error::MalformedFeature(e.to_string()));
    }

    let mut lat_sum = 0.0;
    let mut lon_sum = 0.0;
    let mut count = 0usize;
    for point in element.member_points() {
        lat_sum += point.lat;
        lon_sum += point.lon;
        count += 1;
    }
    if count == 0 {
        return Ok(None);
    }
    LatLon::try_new(lat_sum / count as f64, lon_sum / count as f64)
        .map(Some)
        .map_err(|e| Error::MalformedFeature(e.to_string()))
}

/// Derives the place kind from the tag table, or `None` for unrecognized
/// elements.
pub fn derive_kind(tags: &Tags) -> Option<PlaceKind> {
    KIND_RULES
        .iter()
        .find(|(matches, _)| matches(tags))
        .map(|(_, kind)| *kind)
}

/// Display-name precedence: explicit name tag, role-specific label,
/// street + house number, street, capitalized building type, nothing.
/// Placeholder values are treated as absent.
pub fn derive_name(tags: &Tags, kind: PlaceKind) -> Option<String> {
    if let Some(name) = tags.get("name").filter(|n| !is_placeholder(n)) {
        return Some(name.clone());
    }

    let role = match kind {
        PlaceKind::Hospital => Some("Hospital"),
        PlaceKind::Shelter => Some("Emergency Shelter"),
        PlaceKind::AssemblyPoint => Some("Assembly Point"),
        PlaceKind::Park => Some("Park"),
        PlaceKind::Peak => Some("Peak"),
        PlaceKind::Building | PlaceKind::TerrainZone => None,
    };
    if let Some(role) = role {
        return Some(role.to_owned());
    }

    let street = tags.get("addr:street");
    let number = tags.get("addr:housenumber");
    match (street, number) {
        (Some(street), Some(number)) => return Some(format!("{street} {number}")),
        (Some(street), None) => return Some(street.clone()),
        _ => {}
    }

    tags.get("building")
        .filter(|v| !is_placeholder(v))
        .map(|v| capitalize(v))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Floor count from `building:levels` (or the bare `levels` some sources
/// emit); unparsable values are treated as untagged.
fn parse_levels(tags: &Tags) -> Option<u32> {
    tags.get("building:levels")
        .or_else(|| tags.get("levels"))
        .and_then(|v| v.trim().parse().ok())
}

/// Height in meters from the `height` tag, tolerating unit suffixes like
/// `"12 m"`.
fn parse_height(tags: &Tags) -> Option<f64> {
    let value = tags.get("height")?;
    let numeric: &str = value
        .trim()
        .split(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .next()?;
    numeric.parse().ok().filter(|h: &f64| h.is_finite())
}
