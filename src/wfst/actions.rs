use super::{selecting_filter, translate_features, whitelisted};
use crate::error::Result;
use crate::geojson::{Feature, FeatureInput};
use crate::gml::geometry_to_gml;
use crate::ogc_xml::type_name;
use crate::params::{Params, resolve};
use crate::types::{Properties, UpdateAction, Value};
use crate::xml::{Attributes, build_tag, escape_xml_text, wfs_tag};
use std::slice;

/// A `wfs:Insert` wrapping the translated features.
///
/// Returns an empty string (and logs a warning) when there are no features.
///
/// Example:
/// ```
/// use geojson_wfst::{Feature, FeatureInput, Params, insert};
///
/// let features = FeatureInput::from_json_str(
///     r#"{"type": "Feature", "id": "1", "ns": "topp", "layer": "roads",
///         "properties": {"TYPE": "Rd"}}"#,
/// )?;
/// let xml = insert(features, &Params::default())?;
/// assert_eq!(
///     xml,
///     r#"<wfs:Insert><topp:roads gml:id="roads.1"><topp:TYPE>Rd</topp:TYPE></topp:roads></wfs:Insert>"#
/// );
/// # Ok::<(), geojson_wfst::WfstError>(())
/// ```
pub fn insert(features: impl Into<FeatureInput>, params: &Params) -> Result<String> {
    let features = features.into().into_features();
    if features.is_empty() {
        tracing::warn!("no features supplied to insert");
        return Ok(String::new());
    }

    let inner = translate_features(&features, params)?;
    let attrs = Attributes::new()
        .with("inputFormat", params.input_format.as_deref().unwrap_or(""))
        .with("srsName", params.srs_name.as_deref().unwrap_or(""))
        .with("handle", params.handle.as_deref().unwrap_or(""));
    wfs_tag("Insert", &attrs, Some(&inner))
}

/// One or more `wfs:Update` actions.
///
/// With `params.properties` set, this is a single update applying those
/// properties (and `params.geometry`, if a geometry name resolves) to every
/// feature matched by the filter. Otherwise each feature becomes its own
/// `wfs:Update` carrying the feature's properties.
///
/// A `null` property is written as `xsi:nil="true"`.
pub fn update(features: impl Into<FeatureInput>, params: &Params) -> Result<String> {
    let features = features.into().into_features();
    match &params.properties {
        Some(properties) => bulk_update(&features, params, properties),
        None => {
            if features.is_empty() {
                tracing::warn!("no features supplied to update");
            }
            let empty = Properties::new();
            let mut actions = String::new();
            for feature in &features {
                let properties = feature.properties.as_ref().unwrap_or(&empty);
                actions += &bulk_update(slice::from_ref(feature), params, properties)?;
            }
            Ok(actions)
        }
    }
}

fn bulk_update(features: &[Feature], params: &Params, properties: &Properties) -> Result<String> {
    let fallback = Feature::default();
    let first = features.first().unwrap_or(&fallback);
    let resolved = resolve(first, params);

    let filter = resolved.filter();
    if filter.is_empty() && features.is_empty() {
        tracing::warn!("neither features nor filter supplied to update");
        return Ok(String::new());
    }
    let ns = resolved.ns();
    let type_name = type_name(ns, resolved.layer(), resolved.type_name())?;
    let Some(filter) = selecting_filter(filter, features, params) else {
        tracing::warn!("no filter and no feature ids supplied to update");
        return Ok(String::new());
    };

    let mut fields = String::new();
    for (name, value) in whitelisted(resolved.whitelist(), properties)? {
        let value_xml = match value {
            Value::Null => {
                let nil = Attributes::new().with("xsi:nil", "true");
                wfs_tag("Value", &nil, Some(""))?
            }
            value => {
                let text = value.to_string();
                wfs_tag("Value", &Attributes::new(), Some(escape_xml_text(&text).as_ref()))?
            }
        };
        fields += &update_property(name, &value_xml, params.action)?;
    }

    let geometry_name = resolved.geometry_name();
    if let Some(geometry) = resolved.geometry().filter(|_| !geometry_name.is_empty()) {
        let gml = geometry_to_gml(geometry, "", &resolved.gml_options())?;
        let wrapped = build_tag(ns, geometry_name, &Attributes::new(), Some(&gml))?;
        let value_xml = wfs_tag("Value", &Attributes::new(), Some(&wrapped))?;
        fields += &update_property(geometry_name, &value_xml, params.action)?;
    }

    let attrs = Attributes::new()
        .with("inputFormat", resolved.input_format())
        .with("srsName", resolved.srs_name())
        .with("typeName", type_name);
    wfs_tag("Update", &attrs, Some(&(fields + &filter)))
}

fn update_property(name: &str, value_xml: &str, action: Option<UpdateAction>) -> Result<String> {
    let attrs = Attributes::new().with("action", action.map_or("", |a| a.as_str()));
    let reference = wfs_tag("ValueReference", &attrs, Some(escape_xml_text(name).as_ref()))?;
    wfs_tag("Property", &Attributes::new(), Some(&(reference + value_xml)))
}

/// A `wfs:Delete` of the features, by id unless a filter is given.
///
/// Fails when no `typeName` can be resolved. Returns an empty string (and
/// logs a warning) when there is neither a filter nor a feature id.
pub fn delete(features: impl Into<FeatureInput>, params: &Params) -> Result<String> {
    let features = features.into().into_features();
    let fallback = Feature::default();
    let resolved = resolve(features.first().unwrap_or(&fallback), params);

    let type_name = type_name(resolved.ns(), resolved.layer(), resolved.type_name())?;
    let Some(filter) = selecting_filter(resolved.filter(), &features, params) else {
        tracing::warn!("no filter and no feature ids supplied to delete");
        return Ok(String::new());
    };
    wfs_tag(
        "Delete",
        &Attributes::new().with("typeName", type_name),
        Some(&filter),
    )
}

/// A `wfs:Replace` of the first feature. The filter covers all features.
pub fn replace(features: impl Into<FeatureInput>, params: &Params) -> Result<String> {
    let features = features.into().into_features();
    let Some(first) = features.first() else {
        tracing::warn!("no features supplied to replace");
        return Ok(String::new());
    };
    let resolved = resolve(first, params);

    let Some(filter) = selecting_filter(resolved.filter(), &features, params) else {
        tracing::warn!("no filter and no feature ids supplied to replace");
        return Ok(String::new());
    };
    let replacement = translate_features(slice::from_ref(first), params)?;
    let attrs = Attributes::new()
        .with("inputFormat", resolved.input_format())
        .with("srsName", resolved.srs_name());
    wfs_tag("Replace", &attrs, Some(&(replacement + &filter)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WfstError;
    use crate::gml::Geometry;
    use crate::properties;

    fn road() -> Feature {
        Feature::new()
            .with_id("1")
            .with_ns("topp")
            .with_layer("roads")
            .with_geometry_name("the_geom")
            .with_geometry(Geometry::Point(vec![1.0, 2.0]))
            .with_properties(properties! { "TYPE" => "Rd" })
    }

    #[test]
    fn insert_single_feature() -> Result<()> {
        assert_eq!(
            insert(road(), &Params::default())?,
            "<wfs:Insert><topp:roads gml:id=\"roads.1\"><topp:the_geom><gml:Point><gml:pos>1 2</gml:pos>\
             </gml:Point></topp:the_geom><topp:TYPE>Rd</topp:TYPE></topp:roads></wfs:Insert>"
        );
        Ok(())
    }

    #[test]
    fn insert_attributes_come_from_params() -> Result<()> {
        let params = Params {
            handle: Some("h1".to_string()),
            srs_name: Some("EPSG:4326".to_string()),
            ..Default::default()
        };
        let xml = insert(vec![road()], &params)?;
        assert!(xml.starts_with(r#"<wfs:Insert srsName="EPSG:4326" handle="h1">"#));
        Ok(())
    }

    #[test]
    fn insert_nothing_is_empty() -> Result<()> {
        assert_eq!(insert(Vec::<Feature>::new(), &Params::default())?, "");
        Ok(())
    }

    #[test]
    fn delete_by_qualified_id() -> Result<()> {
        let params = Params::new().with_ns("topp").with_layer("roads");
        assert_eq!(
            delete(Feature::new().with_id("roads.1"), &params)?,
            r#"<wfs:Delete typeName="topp:roadsType"><fes:Filter><fes:ResourceId rid="roads.1"/></fes:Filter></wfs:Delete>"#
        );
        Ok(())
    }

    #[test]
    fn delete_needs_a_type_name() {
        let err = delete(Feature::new().with_id("1"), &Params::new().with_ns("topp"))
            .expect_err("no layer");
        assert!(matches!(err, WfstError::MissingTypeName { .. }));
    }

    #[test]
    fn bulk_update_with_nil_and_falsy_values() -> Result<()> {
        let params = Params::new()
            .with_ns("topp")
            .with_layer("roads")
            .with_properties(properties! {
                "TYPE" => Value::Null,
                "lanes" => 0,
                "paved" => false,
                "name" => "",
            });
        let features = vec![road(), road().with_id("2")];

        assert_eq!(
            update(features, &params)?,
            "<wfs:Update typeName=\"topp:roadsType\">\
             <wfs:Property><wfs:ValueReference>TYPE</wfs:ValueReference><wfs:Value xsi:nil=\"true\"></wfs:Value></wfs:Property>\
             <wfs:Property><wfs:ValueReference>lanes</wfs:ValueReference><wfs:Value>0</wfs:Value></wfs:Property>\
             <wfs:Property><wfs:ValueReference>paved</wfs:ValueReference><wfs:Value>false</wfs:Value></wfs:Property>\
             <wfs:Property><wfs:ValueReference>name</wfs:ValueReference><wfs:Value></wfs:Value></wfs:Property>\
             <wfs:Property><wfs:ValueReference>the_geom</wfs:ValueReference><wfs:Value><topp:the_geom>\
             <gml:Point><gml:pos>1 2</gml:pos></gml:Point></topp:the_geom></wfs:Value></wfs:Property>\
             <fes:Filter><fes:ResourceId rid=\"roads.1\"/><fes:ResourceId rid=\"roads.2\"/></fes:Filter>\
             </wfs:Update>"
        );
        Ok(())
    }

    #[test]
    fn update_per_feature() -> Result<()> {
        let second = road()
            .with_id("2")
            .with_properties(properties! { "TYPE" => "Hwy" });
        let xml = update(vec![road(), second], &Params::default())?;

        assert_eq!(xml.matches("<wfs:Update ").count(), 2);
        assert!(xml.contains("<wfs:Value>Hwy</wfs:Value>"));
        assert!(xml.contains(r#"<fes:ResourceId rid="roads.2"/>"#));
        Ok(())
    }

    #[test]
    fn update_action_attribute() -> Result<()> {
        let feature = road().with_geometry_name("");
        let params = Params {
            action: Some(UpdateAction::Remove),
            ..Default::default()
        };
        let xml = update(feature, &params)?;
        assert!(xml.contains(r#"<wfs:ValueReference action="remove">TYPE</wfs:ValueReference>"#));
        Ok(())
    }

    #[test]
    fn update_without_features_or_filter_is_empty() -> Result<()> {
        let params = Params::new().with_properties(properties! { "a" => 1 });
        assert_eq!(update(Vec::<Feature>::new(), &params)?, "");
        Ok(())
    }

    #[test]
    fn update_with_filter_only() -> Result<()> {
        let params = Params {
            filter: Some("<fes:Filter>x</fes:Filter>".to_string()),
            type_name: Some("topp:roadsType".to_string()),
            properties: Some(properties! { "a" => "b&c" }),
            ..Default::default()
        };
        assert_eq!(
            update(Vec::<Feature>::new(), &params)?,
            "<wfs:Update typeName=\"topp:roadsType\"><wfs:Property><wfs:ValueReference>a</wfs:ValueReference>\
             <wfs:Value>b&amp;c</wfs:Value></wfs:Property><fes:Filter>x</fes:Filter></wfs:Update>"
        );
        Ok(())
    }

    #[test]
    fn update_without_ids_is_empty() -> Result<()> {
        let unidentified = Feature::new().with_layer("roads").with_ns("topp");
        let bulk = Params::new().with_properties(properties! { "a" => 1 });
        assert_eq!(update(unidentified.clone(), &bulk)?, "");

        let per_feature = unidentified.with_properties(properties! { "a" => 1 });
        assert_eq!(update(per_feature, &Params::default())?, "");
        Ok(())
    }

    #[test]
    fn delete_without_ids_is_empty() -> Result<()> {
        let params = Params::new().with_ns("topp").with_layer("roads");
        assert_eq!(delete(Feature::new(), &params)?, "");
        assert_eq!(delete(Vec::<Feature>::new(), &params)?, "");
        Ok(())
    }

    #[test]
    fn replace_without_ids_is_empty() -> Result<()> {
        assert_eq!(replace(road().with_id(""), &Params::default())?, "");
        Ok(())
    }

    #[test]
    fn update_needs_a_type_name() {
        let bulk = Params::new()
            .with_layer("roads")
            .with_properties(properties! { "a" => 1 });
        let err = update(Feature::new().with_id("1"), &bulk).expect_err("no ns");
        assert!(matches!(
            err,
            WfstError::MissingTypeName { ref ns, ref layer } if ns.is_empty() && layer == "roads"
        ));

        let per_feature = Feature::new()
            .with_id("1")
            .with_layer("roads")
            .with_properties(properties! { "a" => 1 });
        let err = update(per_feature, &Params::default()).expect_err("no ns");
        assert!(matches!(err, WfstError::MissingTypeName { .. }));
    }

    #[test]
    fn update_rejects_nan() {
        let params = Params::new()
            .with_ns("topp")
            .with_layer("roads")
            .with_properties(properties! { "speed" => f64::NAN });
        let err = update(road(), &params).expect_err("NaN property");
        assert!(matches!(err, WfstError::NanProperty { .. }));
    }

    #[test]
    fn replace_first_feature_filters_all() -> Result<()> {
        let features = vec![road().with_geometry_name(""), road().with_id("2")];
        assert_eq!(
            replace(features, &Params::default())?,
            "<wfs:Replace><topp:roads gml:id=\"roads.1\"><topp:TYPE>Rd</topp:TYPE></topp:roads>\
             <fes:Filter><fes:ResourceId rid=\"roads.1\"/><fes:ResourceId rid=\"roads.2\"/></fes:Filter>\
             </wfs:Replace>"
        );
        Ok(())
    }

    #[test]
    fn actions_are_idempotent() -> Result<()> {
        let params = Params::new().with_ns("topp").with_layer("roads");
        assert_eq!(insert(road(), &params)?, insert(road(), &params)?);
        assert_eq!(update(road(), &params)?, update(road(), &params)?);
        assert_eq!(delete(road(), &params)?, delete(road(), &params)?);
        assert_eq!(replace(road(), &params)?, replace(road(), &params)?);
        Ok(())
    }
}
