//! WFS-T 2.0 actions and the transaction envelope.

mod actions;
mod transaction;

pub use actions::{delete, insert, replace, update};
pub use transaction::{ActionsBundle, ActionsInput, transaction};

use crate::error::{Result, WfstError};
use crate::geojson::Feature;
use crate::gml::geometry_to_gml;
use crate::ogc_xml::qualify_id;
use crate::params::{Params, resolve};
use crate::types::{Properties, Value};
use crate::xml::{Attributes, build_tag, escape_xml_text, id_filter};

/// Write each feature as a GML feature element:
/// `<ns:layer gml:id="layer.id"><ns:geometry_name>...</ns:geometry_name><ns:prop>value</ns:prop>...</ns:layer>`.
///
/// Only whitelisted properties are written (all of them without a
/// whitelist). `null` values are left out; `""`, `0` and `false` are written.
pub fn translate_features(features: &[Feature], params: &Params) -> Result<String> {
    let mut inner = String::new();
    for feature in features {
        let resolved = resolve(feature, params);
        let ns = resolved.ns();
        let layer = resolved.layer();
        let geometry_name = resolved.geometry_name();

        let mut fields = String::new();
        if let Some(geometry) = feature.geometry.as_ref().filter(|_| !geometry_name.is_empty()) {
            let gml = geometry_to_gml(geometry, "", &resolved.gml_options())?;
            fields += &build_tag(ns, geometry_name, &Attributes::new(), Some(gml.as_str()))?;
        }
        if let Some(properties) = resolved.properties() {
            for (name, value) in whitelisted(resolved.whitelist(), properties)? {
                if value.is_null() {
                    continue;
                }
                let text = value.to_string();
                let text = escape_xml_text(&text);
                fields += &build_tag(ns, name, &Attributes::new(), Some(text.as_ref()))?;
            }
        }

        let mut attrs = Attributes::new();
        let id = resolved.id();
        if !id.is_empty() {
            attrs.set("gml:id", qualify_id(layer, id));
        }
        inner += &build_tag(ns, layer, &attrs, Some(fields.as_str()))?;
    }
    Ok(inner)
}

/// The given filter if it is set, otherwise a `fes:Filter` selecting each
/// feature by id.
pub fn ensure_filter(filter: &str, features: &[Feature], params: &Params) -> String {
    selecting_filter(filter, features, params)
        .unwrap_or_else(|| "<fes:Filter></fes:Filter>".to_string())
}

/// Like [`ensure_filter`], but `None` when no filter is given and none of the
/// features has an id.
pub(crate) fn selecting_filter(
    filter: &str,
    features: &[Feature],
    params: &Params,
) -> Option<String> {
    if !filter.is_empty() {
        return Some(filter.to_string());
    }
    let ids: String = features
        .iter()
        .filter_map(|feature| {
            let id = feature.id.as_deref().filter(|id| !id.is_empty())?;
            Some(id_filter(resolve(feature, params).layer(), id))
        })
        .collect();
    (!ids.is_empty()).then(|| format!("<fes:Filter>{ids}</fes:Filter>"))
}

/// `(name, value)` pairs in whitelist order, or in property order without a
/// whitelist. Names missing from the properties are skipped.
pub(crate) fn whitelisted<'a>(
    whitelist: Option<&'a [String]>,
    properties: &'a Properties,
) -> Result<Vec<(&'a str, &'a Value)>> {
    let pairs: Vec<(&str, &Value)> = match whitelist {
        Some(names) => names
            .iter()
            .filter_map(|name| Some((name.as_str(), properties.get(name)?)))
            .collect(),
        None => properties.iter().collect(),
    };
    if let Some((name, _)) = pairs.iter().find(|(_, value)| value.is_nan()) {
        return Err(WfstError::NanProperty {
            property: name.to_string(),
        });
    }
    Ok(pairs)
}
