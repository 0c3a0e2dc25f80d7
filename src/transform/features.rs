//! GeoJSON output built on the `geojson` crate.

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeometryValue};
use serde_json::Value;

use crate::transform::types::{Record, TransformError};

/// A `Point` at `[longitude, latitude]`.
pub fn point(longitude: f64, latitude: f64) -> Geometry {
    Geometry::new(GeometryValue::Point(vec![longitude, latitude]))
}

/// GeoJSON id for an identifier field value. Strings and numbers are kept
/// as-is, other scalars are stringified, and null or a missing field leaves
/// the feature without an id.
pub fn feature_id(value: Option<&Value>) -> Option<Id> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(Id::String(s.clone())),
        Value::Number(n) => Some(Id::Number(n.clone())),
        other => Some(Id::String(other.to_string())),
    }
}

/// A located record with the record itself as `properties`.
pub fn located_feature(id: Option<Id>, properties: Record, geometry: Geometry) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Multi-line, two-space indented JSON.
pub fn to_pretty_json(collection: &FeatureCollection) -> Result<String, TransformError> {
    Ok(serde_json::to_string_pretty(collection)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feature_collection_shape() {
        let mut properties = Record::new();
        properties.insert("title".into(), json!("hello"));
        let features = collection(vec![located_feature(
            feature_id(Some(&json!("7"))),
            properties,
            point(-73.9, 40.7),
        )]);

        let value = serde_json::to_value(&features).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "id": "7",
                    "properties": {"title": "hello"},
                    "geometry": {"type": "Point", "coordinates": [-73.9, 40.7]}
                }]
            })
        );
    }

    #[test]
    fn test_feature_id_kinds() {
        assert_eq!(feature_id(Some(&json!("abc"))), Some(Id::String("abc".into())));
        assert_eq!(feature_id(Some(&json!(42))), Some(Id::Number(serde_json::Number::from(42u64))));
        assert_eq!(feature_id(Some(&json!(true))), Some(Id::String("true".into())));
        assert_eq!(feature_id(Some(&Value::Null)), None);
        assert_eq!(feature_id(None), None);
    }

    #[test]
    fn test_missing_id_is_omitted() {
        let feature = located_feature(None, Record::new(), point(0.0, 0.0));
        let value = serde_json::to_value(&feature).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["type"], "Feature");
    }

    #[test]
    fn test_pretty_json_is_indented() {
        let body = to_pretty_json(&collection(Vec::new())).unwrap();
        assert_eq!(body, "{\n  \"type\": \"FeatureCollection\",\n  \"features\": []\n}");
    }
}
