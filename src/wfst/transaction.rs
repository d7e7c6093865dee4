use super::{delete, insert, update};
use crate::error::{Result, WfstError};
use crate::geojson::FeatureInput;
use crate::ogc_xml::{
    FES_NAMESPACE_URI, GML_NAMESPACE_URI, WFS_NAMESPACE_URI, XSI_NAMESPACE_URI,
    namespace_prefix_pattern, schema_location, wfs_version,
};
use crate::params::Params;
use crate::xml::{Attributes, wfs_tag};

/// Features for each of the actions of a transaction.
///
/// Present entries are run through [`insert`], [`update`] and [`delete`], in
/// that order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionsBundle {
    pub insert: Option<FeatureInput>,
    pub update: Option<FeatureInput>,
    pub delete: Option<FeatureInput>,
}

impl ActionsBundle {
    fn into_xml(self, params: &Params) -> Result<String> {
        if self.insert.is_none() && self.update.is_none() && self.delete.is_none() {
            return Err(WfstError::InvalidActions(
                "an actions bundle without insert, update or delete".to_string(),
            ));
        }
        let mut xml = String::new();
        if let Some(features) = self.insert {
            xml += &insert(features, params)?;
        }
        if let Some(features) = self.update {
            xml += &update(features, params)?;
        }
        if let Some(features) = self.delete {
            xml += &delete(features, params)?;
        }
        Ok(xml)
    }
}

/// The actions wrapped by [`transaction`].
#[derive(Clone, Debug, PartialEq)]
pub enum ActionsInput {
    /// Action XML strings, concatenated as they are.
    Fragments(Vec<String>),
    /// A single action XML string, used as it is.
    Fragment(String),
    Bundle(ActionsBundle),
}

impl ActionsInput {
    /// Classify a JSON document: a string, an array of strings, or an object
    /// with at least one of `insert`, `update` and `delete`.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;

        match value {
            Json::String(fragment) => Ok(ActionsInput::Fragment(fragment)),
            Json::Array(ref entries) if entries.iter().all(Json::is_string) => {
                let fragments = entries
                    .iter()
                    .filter_map(|entry| entry.as_str().map(str::to_string))
                    .collect();
                Ok(ActionsInput::Fragments(fragments))
            }
            Json::Object(mut object) => {
                let mut take = |key: &str| -> Result<Option<FeatureInput>> {
                    match object.remove(key) {
                        None | Some(Json::Null) => Ok(None),
                        Some(value) => FeatureInput::from_json(value).map(Some),
                    }
                };
                let bundle = ActionsBundle {
                    insert: take("insert")?,
                    update: take("update")?,
                    delete: take("delete")?,
                };
                if bundle == ActionsBundle::default() {
                    return Err(WfstError::InvalidActions(Json::Object(object).to_string()));
                }
                Ok(ActionsInput::Bundle(bundle))
            }
            other => Err(WfstError::InvalidActions(other.to_string())),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json(serde_json::from_str(json)?)
    }
}

impl From<String> for ActionsInput {
    fn from(fragment: String) -> Self {
        ActionsInput::Fragment(fragment)
    }
}

impl From<&str> for ActionsInput {
    fn from(fragment: &str) -> Self {
        ActionsInput::Fragment(fragment.to_string())
    }
}

impl From<Vec<String>> for ActionsInput {
    fn from(fragments: Vec<String>) -> Self {
        ActionsInput::Fragments(fragments)
    }
}

impl<const N: usize> From<[&str; N]> for ActionsInput {
    fn from(fragments: [&str; N]) -> Self {
        ActionsInput::Fragments(fragments.iter().map(|f| f.to_string()).collect())
    }
}

impl From<ActionsBundle> for ActionsInput {
    fn from(bundle: ActionsBundle) -> Self {
        ActionsInput::Bundle(bundle)
    }
}

/// Wrap actions in a `wfs:Transaction`.
///
/// Every namespace prefix used by the actions (as an element prefix or in a
/// `typeName` value) must have a URI: `wfs`, `gml`, `xsi` and `fes` are
/// built in, anything else has to come from `params.ns_assignments`.
///
/// Example:
/// ```
/// use geojson_wfst::{Feature, Params, delete, transaction};
///
/// let params = Params::new()
///     .with_ns("topp")
///     .with_layer("roads")
///     .with_ns_assignment("topp", "http://www.openplans.org/topp");
/// let action = delete(Feature::new().with_id("1"), &params)?;
/// let xml = transaction(vec![action], &params)?;
/// assert!(xml.starts_with(r#"<wfs:Transaction xmlns:topp="http://www.openplans.org/topp""#));
/// # Ok::<(), geojson_wfst::WfstError>(())
/// ```
pub fn transaction(actions: impl Into<ActionsInput>, params: &Params) -> Result<String> {
    let actions = match actions.into() {
        ActionsInput::Fragments(fragments) => fragments.concat(),
        ActionsInput::Fragment(fragment) => fragment,
        ActionsInput::Bundle(bundle) => bundle.into_xml(params)?,
    };

    let mut attrs = namespace_attributes(&params.ns_assignments, &actions)?;
    attrs.set("xsi:schemaLocation", schema_location(&params.schema_locations));
    attrs.set("service", "WFS");
    attrs.set("version", wfs_version(params.version.as_deref()));
    attrs.set("srsName", params.srs_name.as_deref().unwrap_or(""));
    attrs.set("lockId", params.lock_id.as_deref().unwrap_or(""));
    attrs.set(
        "releaseAction",
        params.release_action.map_or("", |action| action.as_str()),
    );
    attrs.set("handle", params.handle.as_deref().unwrap_or(""));

    wfs_tag("Transaction", &attrs, Some(&actions))
}

/// `xmlns:*` attributes for the caller's assignments and the built-in
/// namespaces, checked against the prefixes used in `xml`.
fn namespace_attributes(ns_assignments: &[(String, String)], xml: &str) -> Result<Attributes> {
    let mut used: Vec<&str> = Vec::new();
    for captures in namespace_prefix_pattern().captures_iter(xml) {
        if let Some(prefix) = captures.get(1).map(|m| m.as_str())
            && !used.contains(&prefix)
        {
            used.push(prefix);
        }
    }
    tracing::debug!(prefixes = ?used, "namespace prefixes used by the actions");

    let mut attrs: Attributes = ns_assignments
        .iter()
        .map(|(prefix, uri)| (format!("xmlns:{prefix}"), uri.as_str()))
        .collect();
    if used.contains(&"fes") {
        attrs.set("xmlns:fes", FES_NAMESPACE_URI);
    }
    attrs.set("xmlns:xsi", XSI_NAMESPACE_URI);
    attrs.set("xmlns:gml", GML_NAMESPACE_URI);
    attrs.set("xmlns:wfs", WFS_NAMESPACE_URI);

    if let Some(prefix) = used
        .iter()
        .find(|prefix| attrs.get(&format!("xmlns:{prefix}")).is_none_or(str::is_empty))
    {
        return Err(WfstError::UnassignedNamespace(prefix.to_string()));
    }
    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geojson::Feature;
    use crate::properties;
    use crate::types::ReleaseAction;

    const TOPP: &str = "http://www.openplans.org/topp";

    fn road(id: &str) -> Feature {
        Feature::new()
            .with_id(id)
            .with_ns("topp")
            .with_layer("roads")
            .with_properties(properties! { "TYPE" => "Rd" })
    }

    #[test]
    fn empty_fragment_still_has_an_envelope() -> Result<()> {
        assert_eq!(
            transaction([""], &Params::default())?,
            "<wfs:Transaction xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
             xmlns:gml=\"http://www.opengis.net/gml/3.2\" xmlns:wfs=\"http://www.opengis.net/wfs/2.0\" \
             xsi:schemaLocation=\"http://www.opengis.net/wfs/2.0\nhttp://schemas.opengis.net/wfs/2.0/wfs.xsd\" \
             service=\"WFS\" version=\"2.0.0\"></wfs:Transaction>"
        );
        Ok(())
    }

    #[test]
    fn custom_namespace_must_be_assigned() {
        let bundle = ActionsBundle {
            insert: Some(road("1").into()),
            ..Default::default()
        };
        let err = transaction(bundle, &Params::default()).expect_err("topp has no URI");
        assert!(matches!(err, WfstError::UnassignedNamespace(ns) if ns == "topp"));
    }

    #[test]
    fn bundle_runs_insert_update_delete_in_order() -> Result<()> {
        let params = Params::new().with_ns_assignment("topp", TOPP);
        let bundle = ActionsBundle {
            delete: Some(road("3").into()),
            insert: Some(road("1").into()),
            update: Some(road("2").into()),
        };
        let xml = transaction(bundle, &params)?;

        let insert_at = xml.find("<wfs:Insert>").expect("insert");
        let update_at = xml.find("<wfs:Update ").expect("update");
        let delete_at = xml.find("<wfs:Delete ").expect("delete");
        assert!(insert_at < update_at && update_at < delete_at);
        assert!(xml.contains(r#"xmlns:topp="http://www.openplans.org/topp""#));
        assert!(xml.contains(r#"xmlns:fes="http://www.opengis.net/fes/2.0""#));
        Ok(())
    }

    #[test]
    fn fes_is_declared_only_when_used() -> Result<()> {
        let params = Params::new().with_ns_assignment("topp", TOPP);
        let bundle = ActionsBundle {
            insert: Some(road("1").into()),
            ..Default::default()
        };
        let xml = transaction(bundle, &params)?;
        assert!(!xml.contains("xmlns:fes"));
        Ok(())
    }

    #[test]
    fn transaction_attributes_from_params() -> Result<()> {
        let params = Params {
            version: Some("2.0.2".to_string()),
            lock_id: Some("lock-1".to_string()),
            release_action: Some(ReleaseAction::All),
            handle: Some("tx".to_string()),
            schema_locations: vec![(TOPP.to_string(), "topp.xsd".to_string())],
            ..Default::default()
        };
        let xml = transaction("", &params)?;
        assert!(xml.contains(
            "xsi:schemaLocation=\"http://www.openplans.org/topp\ntopp.xsd\n\
             http://www.opengis.net/wfs/2.0\nhttp://schemas.opengis.net/wfs/2.0/wfs.xsd\""
        ));
        assert!(xml.contains(
            r#"service="WFS" version="2.0.2" lockId="lock-1" releaseAction="ALL" handle="tx">"#
        ));
        Ok(())
    }

    #[test]
    fn type_name_prefixes_are_checked() {
        let action = r#"<wfs:Delete typeName="topp:roadsType"></wfs:Delete>"#;
        let err = transaction(action, &Params::default()).expect_err("topp has no URI");
        assert!(matches!(err, WfstError::UnassignedNamespace(ns) if ns == "topp"));
    }

    #[test]
    fn actions_from_json() -> Result<()> {
        assert!(matches!(
            ActionsInput::from_json_str(r#"["<a/>", "<b/>"]"#)?,
            ActionsInput::Fragments(f) if f.len() == 2
        ));
        assert!(matches!(
            ActionsInput::from_json_str(r#"{"delete": {"id": "roads.1"}}"#)?,
            ActionsInput::Bundle(ActionsBundle { delete: Some(_), insert: None, update: None })
        ));
        for invalid in ["{}", "1", r#"[1, "<a/>"]"#, r#"{"upsert": []}"#] {
            let err = ActionsInput::from_json_str(invalid).expect_err(invalid);
            assert!(matches!(err, WfstError::InvalidActions(_)));
        }
        Ok(())
    }

    #[test]
    fn transaction_is_idempotent() -> Result<()> {
        let params = Params::new().with_ns_assignment("topp", TOPP);
        let bundle = ActionsBundle {
            insert: Some(road("1").into()),
            update: Some(road("2").into()),
            delete: Some(road("3").into()),
        };
        assert_eq!(
            transaction(bundle.clone(), &params)?,
            transaction(bundle, &params)?
        );
        Ok(())
    }

    #[test]
    fn empty_bundle_is_invalid() {
        let err = transaction(ActionsBundle::default(), &Params::default())
            .expect_err("nothing to do");
        assert!(matches!(err, WfstError::InvalidActions(_)));
    }
}
