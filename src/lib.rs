//! GeoJSON to GML 3.2 and WFS-T 2.0 transactions.
//!
//! ## Overview
//!
//! - `Feature` represents a GeoJSON feature together with where it lives on
//!   the WFS server (`ns`, `layer`, `geometry_name`, ...).
//! - `FeatureInput` is whatever an action accepts as features: a single
//!   `Feature`, a `Vec<Feature>`, or a `FeatureCollection`.
//! - `Params` carries the caller overrides shared by all actions and the
//!   transaction envelope.
//! - `Geometry` represents a GeoJSON geometry, and `geometry_to_gml` writes it
//!   as GML.
//! - `Value` represents a single property value.
//!
//! The actions are plain functions returning XML strings:
//!
//! - `insert(features, params)`: a `wfs:Insert`.
//! - `update(features, params)`: one bulk `wfs:Update` when
//!   `params.properties` is set, one `wfs:Update` per feature otherwise.
//! - `delete(features, params)`: a `wfs:Delete`.
//! - `replace(features, params)`: a `wfs:Replace` of the first feature.
//! - `transaction(actions, params)`: wraps action XML (or the features for
//!   insert, update and delete) in a `wfs:Transaction`.
//!
//! Nothing is sent anywhere. POST the result to your WFS endpoint with the HTTP
//! client of your choice.
//!
//! Values are looked up on both the feature and `Params`. `layer`,
//! `properties`, `geometry` and `id` are taken from `Params` first; all other
//! names (`ns`, `srsName`, `typeName`, `filter`, ...) are taken from the
//! feature first. See `Resolved` for the details.
//!
//! ## Short usage
//!
//! ```
//! use geojson_wfst::{FeatureInput, Params, insert, transaction};
//!
//! let features = FeatureInput::from_json_str(
//!     r#"{
//!         "type": "Feature",
//!         "id": "1",
//!         "geometry": {"type": "Point", "coordinates": [1, 2]},
//!         "properties": {"TYPE": "Rd"}
//!     }"#,
//! )?;
//! let params = Params::from_json(
//!     r#"{
//!         "ns": "topp",
//!         "layer": "roads",
//!         "geometry_name": "the_geom",
//!         "nsAssignments": {"topp": "http://www.openplans.org/topp"}
//!     }"#,
//! )?;
//!
//! let action = insert(features, &params)?;
//! assert_eq!(
//!     action,
//!     "<wfs:Insert><topp:roads gml:id=\"roads.1\"><topp:the_geom><gml:Point>\
//!      <gml:pos>1 2</gml:pos></gml:Point></topp:the_geom><topp:TYPE>Rd</topp:TYPE>\
//!      </topp:roads></wfs:Insert>"
//! );
//!
//! let xml = transaction(vec![action], &params)?;
//! assert!(xml.starts_with("<wfs:Transaction xmlns:topp="));
//! # Ok::<(), geojson_wfst::WfstError>(())
//! ```
//!
//! ## Building features in Rust
//!
//! ```
//! use geojson_wfst::{Feature, Geometry, Params, Value, properties, update};
//!
//! let feature = Feature::new()
//!     .with_id("roads.7")
//!     .with_geometry(Geometry::Point(vec![146.5, -41.2]));
//!
//! // With `params.properties`, every feature matched by the filter gets the
//! // same values. `null` becomes `xsi:nil="true"`.
//! let params = Params::new()
//!     .with_ns("topp")
//!     .with_layer("roads")
//!     .with_properties(properties! {
//!         "TYPE" => "Hwy",
//!         "note" => Value::Null,
//!     });
//!
//! let xml = update(feature, &params)?;
//! assert!(xml.contains(r#"<wfs:Value xsi:nil="true"></wfs:Value>"#));
//! assert!(xml.contains(r#"<fes:ResourceId rid="roads.7"/>"#));
//! # Ok::<(), geojson_wfst::WfstError>(())
//! ```
//!
//! `properties!` keeps the order of its entries, and so does the generated XML.
//! `Option<T>` values are accepted and `None` becomes `Value::Null`:
//!
//! ```
//! use geojson_wfst::{Value, properties};
//!
//! let props = properties! { "lanes" => Some(2), "name" => Option::<&str>::None };
//! assert_eq!(props.get("name"), Some(&Value::Null));
//! ```
//!
//! ## Geometries
//!
//! Geometries can come from GeoJSON, or from anything that implements
//! `geo_traits::GeometryTrait<T = f64>` (for example `geo_types::Point` or
//! `wkt::Wkt`), or from WKB bytes.
//!
//! ```
//! use geo_types::LineString;
//! use geojson_wfst::{Geometry, GmlOptions, geometry_to_gml};
//!
//! let line = LineString::from(vec![(0.0, 0.0), (1.0, 1.5)]);
//! let geometry = Geometry::from_geo(&line)?;
//! let options = GmlOptions {
//!     srs_name: Some("EPSG:4326".to_string()),
//!     ..Default::default()
//! };
//! assert_eq!(
//!     geometry_to_gml(&geometry, "", &options)?,
//!     r#"<gml:LineString srsName="EPSG:4326"><gml:posList>0 0 1 1.5</gml:posList></gml:LineString>"#
//! );
//! # Ok::<(), geojson_wfst::WfstError>(())
//! ```
mod conversions;
mod error;
mod geojson;
mod gml;
mod ogc_xml;
mod params;
mod types;
mod wfst;
mod xml;

pub use error::{Result, WfstError};
pub use geojson::{Feature, FeatureCollection, FeatureInput};
pub use gml::{
    CollectionMember, Geometry, GeometryKind, GmlOptions, Position, geometry_json_to_gml,
    geometry_to_gml, line_string, linear_ring, multi_line_string, multi_point, multi_polygon,
    point, polygon,
};
pub use params::{Params, Resolved, resolve};
pub use types::{Properties, ReleaseAction, UpdateAction, Value};
pub use wfst::{
    ActionsBundle, ActionsInput, delete, ensure_filter, insert, replace, transaction,
    translate_features, update,
};
pub use xml::{Attributes, attrs_to_string, build_tag, escape_xml_text};
