//! Caller overrides and the precedence rules between them and a feature.

use crate::conversions::{deserialize_id, deserialize_layer, deserialize_string_pairs};
use crate::error::Result;
use crate::geojson::Feature;
use crate::gml::{Geometry, GmlOptions};
use crate::types::{Properties, ReleaseAction, UpdateAction};
use serde::Deserialize;

/// Options shared by all actions and the transaction envelope.
///
/// Deserializes from the camelCase JSON names (`srsName`, `typeName`,
/// `nsAssignments`, ...); `geometry_name` keeps its snake_case name.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Params {
    pub ns: Option<String>,
    #[serde(deserialize_with = "deserialize_layer")]
    pub layer: Option<String>,
    #[serde(rename = "geometry_name")]
    pub geometry_name: Option<String>,
    /// Properties to set. For [`update`](crate::update), their presence
    /// switches to a single bulk update over all features.
    pub properties: Option<Properties>,
    pub geometry: Option<Geometry>,
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    pub whitelist: Option<Vec<String>>,
    pub input_format: Option<String>,
    pub srs_name: Option<String>,
    pub srs_dimension: Option<u32>,
    pub handle: Option<String>,
    /// A complete `fes:Filter`, used verbatim.
    pub filter: Option<String>,
    pub type_name: Option<String>,
    /// Namespace URI to schema location, in document order.
    #[serde(deserialize_with = "deserialize_string_pairs")]
    pub schema_locations: Vec<(String, String)>,
    /// Namespace prefix to URI, in document order.
    #[serde(deserialize_with = "deserialize_string_pairs")]
    pub ns_assignments: Vec<(String, String)>,
    pub lock_id: Option<String>,
    pub release_action: Option<ReleaseAction>,
    pub version: Option<String>,
    /// `action` attribute of every `wfs:ValueReference` written by an update.
    pub action: Option<UpdateAction>,
    /// Write positions as `y x [z]`.
    pub reorder_lat_lng: bool,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_ns(mut self, ns: impl Into<String>) -> Self {
        self.ns = Some(ns.into());
        self
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_ns_assignment(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.ns_assignments.push((prefix.into(), uri.into()));
        self
    }
}

/// The values of a feature and the params, combined by precedence.
///
/// - `layer`, `properties`, `geometry` and `id` come from the params first,
///   then from the feature.
/// - every other name comes from the feature first, then from the params.
///
/// Empty strings count as unset.
#[derive(Clone, Copy, Debug)]
pub struct Resolved<'a> {
    feature: &'a Feature,
    params: &'a Params,
}

/// Combine a feature with the params. See [`Resolved`] for the rules.
pub fn resolve<'a>(feature: &'a Feature, params: &'a Params) -> Resolved<'a> {
    Resolved { feature, params }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn params_first<'a>(param: &'a Option<String>, feature: &'a Option<String>) -> &'a str {
    non_empty(param).or(non_empty(feature)).unwrap_or("")
}

fn feature_first<'a>(feature: &'a Option<String>, param: &'a Option<String>) -> &'a str {
    non_empty(feature).or(non_empty(param)).unwrap_or("")
}

impl<'a> Resolved<'a> {
    pub fn layer(&self) -> &'a str {
        params_first(&self.params.layer, &self.feature.layer)
    }

    pub fn id(&self) -> &'a str {
        params_first(&self.params.id, &self.feature.id)
    }

    pub fn properties(&self) -> Option<&'a Properties> {
        self.params
            .properties
            .as_ref()
            .or(self.feature.properties.as_ref())
    }

    pub fn geometry(&self) -> Option<&'a Geometry> {
        self.params.geometry.as_ref().or(self.feature.geometry.as_ref())
    }

    pub fn ns(&self) -> &'a str {
        feature_first(&self.feature.ns, &self.params.ns)
    }

    pub fn geometry_name(&self) -> &'a str {
        feature_first(&self.feature.geometry_name, &self.params.geometry_name)
    }

    pub fn srs_name(&self) -> &'a str {
        feature_first(&self.feature.srs_name, &self.params.srs_name)
    }

    pub fn whitelist(&self) -> Option<&'a [String]> {
        self.feature
            .whitelist
            .as_deref()
            .or(self.params.whitelist.as_deref())
    }

    pub fn filter(&self) -> &'a str {
        feature_first(&self.feature.filter, &self.params.filter)
    }

    pub fn type_name(&self) -> &'a str {
        feature_first(&self.feature.type_name, &self.params.type_name)
    }

    pub fn input_format(&self) -> &'a str {
        feature_first(&self.feature.input_format, &self.params.input_format)
    }

    pub fn handle(&self) -> &'a str {
        feature_first(&self.feature.handle, &self.params.handle)
    }

    /// GML options for the geometry of this feature.
    pub fn gml_options(&self) -> GmlOptions {
        GmlOptions {
            srs_name: Some(self.srs_name().to_string()).filter(|s| !s.is_empty()),
            srs_dimension: self.params.srs_dimension,
            gml_ids: Vec::new(),
            reorder_lat_lng: self.params.reorder_lat_lng,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties;
    use crate::types::Value;

    #[test]
    fn params_from_wire_names() -> Result<()> {
        let params = Params::from_json(
            r#"{
                "ns": "topp",
                "layer": {"id": "roads"},
                "geometry_name": "the_geom",
                "srsName": "EPSG:4326",
                "srsDimension": 3,
                "typeName": "topp:roadsType",
                "nsAssignments": {"topp": "http://www.openplans.org/topp", "z": "urn:z"},
                "schemaLocations": {"http://www.openplans.org/topp": "topp.xsd"},
                "releaseAction": "SOME",
                "action": "insertAfter",
                "reorderLatLng": true,
                "unknown": 1
            }"#,
        )?;

        assert_eq!(params.layer.as_deref(), Some("roads"));
        assert_eq!(params.geometry_name.as_deref(), Some("the_geom"));
        assert_eq!(params.srs_dimension, Some(3));
        assert_eq!(params.ns_assignments[0].0, "topp");
        assert_eq!(params.ns_assignments[1], ("z".to_string(), "urn:z".to_string()));
        assert_eq!(params.release_action, Some(ReleaseAction::Some));
        assert_eq!(params.action, Some(UpdateAction::InsertAfter));
        assert!(params.reorder_lat_lng);
        Ok(())
    }

    #[test]
    fn invalid_release_action_is_rejected() {
        assert!(Params::from_json(r#"{"releaseAction": "NONE"}"#).is_err());
    }

    #[test]
    fn content_members_prefer_params() {
        let feature = Feature::new()
            .with_id("1")
            .with_layer("roads")
            .with_properties(properties! { "a" => 1 });
        let params = Params::new()
            .with_layer("rivers")
            .with_properties(properties! { "a" => 2 });

        let resolved = resolve(&feature, &params);
        assert_eq!(resolved.layer(), "rivers");
        assert_eq!(resolved.id(), "1");
        assert_eq!(
            resolved.properties().and_then(|p| p.get("a")),
            Some(&Value::Integer(2))
        );
    }

    #[test]
    fn addressing_members_prefer_feature() {
        let feature = Feature::new().with_ns("topp").with_srs_name("");
        let params = Params {
            ns: Some("other".to_string()),
            srs_name: Some("EPSG:3857".to_string()),
            handle: Some("h".to_string()),
            ..Default::default()
        };

        let resolved = resolve(&feature, &params);
        assert_eq!(resolved.ns(), "topp");
        // empty on the feature falls through to params
        assert_eq!(resolved.srs_name(), "EPSG:3857");
        assert_eq!(resolved.handle(), "h");
        assert_eq!(resolved.type_name(), "");
        assert_eq!(resolved.whitelist(), None);
    }
}
