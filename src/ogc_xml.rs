// cf. https://docs.ogc.org/is/09-025r2/09-025r2.html (WFS 2.0)
//      https://docs.ogc.org/is/09-026r2/09-026r2.html (FES 2.0)

use crate::error::{Result, WfstError};
use regex::Regex;
use std::sync::OnceLock;

pub(crate) const WFS_NAMESPACE_URI: &str = "http://www.opengis.net/wfs/2.0";
pub(crate) const GML_NAMESPACE_URI: &str = "http://www.opengis.net/gml/3.2";
pub(crate) const FES_NAMESPACE_URI: &str = "http://www.opengis.net/fes/2.0";
pub(crate) const XSI_NAMESPACE_URI: &str = "http://www.w3.org/2001/XMLSchema-instance";

// Always part of xsi:schemaLocation, whatever the caller passes.
pub(crate) const WFS_SCHEMA_LOCATION: &str = "http://schemas.opengis.net/wfs/2.0/wfs.xsd";

pub(crate) const DEFAULT_WFS_VERSION: &str = "2.0.0";

/// Matches a namespace prefix right after `<` or inside a `typeName="` value.
pub(crate) fn namespace_prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"(?:<|typeName=")(\w+):"#).expect("valid regex"))
}

fn wfs_version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^2\.0\.\d+$").expect("valid regex"))
}

/// The version attribute of a transaction: the given version if it is a
/// WFS 2.0.x version, `2.0.0` otherwise.
pub(crate) fn wfs_version(version: Option<&str>) -> &str {
    match version {
        Some(v) if wfs_version_pattern().is_match(v) => v,
        _ => DEFAULT_WFS_VERSION,
    }
}

/// `layer.id`, unless the id is already qualified with a layer name.
pub(crate) fn qualify_id(layer: &str, id: &str) -> String {
    if id.contains('.') {
        id.to_string()
    } else {
        format!("{layer}.{id}")
    }
}

/// The explicit `typeName` if given, `ns:layerType` otherwise.
pub(crate) fn type_name(ns: &str, layer: &str, type_name: &str) -> Result<String> {
    if !type_name.is_empty() {
        return Ok(type_name.to_string());
    }
    if ns.is_empty() || layer.is_empty() {
        return Err(WfstError::MissingTypeName {
            ns: ns.to_string(),
            layer: layer.to_string(),
        });
    }
    Ok(format!("{ns}:{layer}Type"))
}

/// The `xsi:schemaLocation` value: caller entries in order, then the WFS 2.0
/// schema (overwriting a caller-supplied WFS entry in place).
pub(crate) fn schema_location(schema_locations: &[(String, String)]) -> String {
    let mut entries: Vec<(&str, &str)> = schema_locations
        .iter()
        .map(|(uri, location)| (uri.as_str(), location.as_str()))
        .collect();
    match entries.iter_mut().find(|(uri, _)| *uri == WFS_NAMESPACE_URI) {
        Some((_, location)) => *location = WFS_SCHEMA_LOCATION,
        None => entries.push((WFS_NAMESPACE_URI, WFS_SCHEMA_LOCATION)),
    }

    entries
        .iter()
        .map(|(uri, location)| format!("{uri}\n{location}"))
        .collect::<Vec<String>>()
        .join("\n")
}
