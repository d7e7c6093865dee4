use crate::error::WfstError;
use crate::gml::GeometryKind;
use serde::{Deserialize, Deserializer};

#[inline]
pub(crate) fn geometry_kind_to_str(kind: GeometryKind) -> &'static str {
    match kind {
        GeometryKind::Point => "Point",
        GeometryKind::LineString => "LineString",
        GeometryKind::LinearRing => "LinearRing",
        GeometryKind::Polygon => "Polygon",
        GeometryKind::MultiPoint => "MultiPoint",
        GeometryKind::MultiLineString => "MultiLineString",
        GeometryKind::MultiPolygon => "MultiPolygon",
        GeometryKind::GeometryCollection => "GeometryCollection",
    }
}

// GeoJSON type names are case sensitive.
#[inline]
pub(crate) fn geometry_kind_from_str(s: &str) -> Result<GeometryKind, WfstError> {
    match s {
        "Point" => Ok(GeometryKind::Point),
        "LineString" => Ok(GeometryKind::LineString),
        "LinearRing" => Ok(GeometryKind::LinearRing),
        "Polygon" => Ok(GeometryKind::Polygon),
        "MultiPoint" => Ok(GeometryKind::MultiPoint),
        "MultiLineString" => Ok(GeometryKind::MultiLineString),
        "MultiPolygon" => Ok(GeometryKind::MultiPolygon),
        "GeometryCollection" => Ok(GeometryKind::GeometryCollection),
        _ => Err(WfstError::UnsupportedGeometryType(s.to_string())),
    }
}

/// The GML element a geometry kind is written as.
#[inline]
pub(crate) fn geometry_kind_to_gml_name(kind: GeometryKind) -> &'static str {
    match kind {
        GeometryKind::Point => "Point",
        GeometryKind::LineString => "LineString",
        GeometryKind::LinearRing => "LinearRing",
        GeometryKind::Polygon => "Polygon",
        GeometryKind::MultiPoint => "MultiPoint",
        GeometryKind::MultiLineString => "MultiCurve",
        GeometryKind::MultiPolygon => "MultiSurface",
        GeometryKind::GeometryCollection => "MultiGeometry",
    }
}

/// Ids may be strings or numbers in GeoJSON; anything else is ignored.
#[inline]
pub(crate) fn json_id_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(json_id_to_string))
}

/// A layer is either its name or an object with the name as `id`.
pub(crate) fn deserialize_layer<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LayerRef {
        Name(String),
        Object { id: Option<serde_json::Value> },
    }

    Ok(match Option::<LayerRef>::deserialize(deserializer)? {
        Some(LayerRef::Name(name)) => Some(name),
        Some(LayerRef::Object { id }) => id.as_ref().and_then(json_id_to_string),
        None => None,
    })
}

/// A JSON object as ordered `(key, string value)` pairs.
pub(crate) fn deserialize_string_pairs<'de, D>(
    deserializer: D,
) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<serde_json::Map<String, serde_json::Value>>::deserialize(deserializer)?;
    Ok(map
        .into_iter()
        .flatten()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(s) => Some((key, s)),
            serde_json::Value::Null => None,
            other => Some((key, other.to_string())),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_kind_names_roundtrip() {
        for name in [
            "Point",
            "LineString",
            "LinearRing",
            "Polygon",
            "MultiPoint",
            "MultiLineString",
            "MultiPolygon",
            "GeometryCollection",
        ] {
            let kind = geometry_kind_from_str(name).expect("known geometry type");
            assert_eq!(geometry_kind_to_str(kind), name);
        }
    }

    #[test]
    fn unknown_geometry_kind_is_named_in_error() {
        let err = geometry_kind_from_str("point").expect_err("type names are case sensitive");
        assert!(matches!(err, WfstError::UnsupportedGeometryType(ty) if ty == "point"));
    }

    #[test]
    fn multi_kinds_map_to_gml_aggregates() {
        assert_eq!(geometry_kind_to_gml_name(GeometryKind::MultiLineString), "MultiCurve");
        assert_eq!(geometry_kind_to_gml_name(GeometryKind::MultiPolygon), "MultiSurface");
        assert_eq!(
            geometry_kind_to_gml_name(GeometryKind::GeometryCollection),
            "MultiGeometry"
        );
    }

    #[test]
    fn ids_from_strings_and_numbers() {
        assert_eq!(json_id_to_string(&serde_json::json!("a.1")), Some("a.1".to_string()));
        assert_eq!(json_id_to_string(&serde_json::json!(15)), Some("15".to_string()));
        assert_eq!(json_id_to_string(&serde_json::json!(null)), None);
    }
}
