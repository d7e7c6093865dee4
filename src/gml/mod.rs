//! GeoJSON geometries and their GML 3.2 encoding.
//!
//! [`Geometry`] is the typed form of a GeoJSON geometry object. It can be
//! parsed from GeoJSON ([`Geometry::from_json`]), converted from anything
//! implementing `geo_traits::GeometryTrait` ([`Geometry::from_geo`]), or read
//! from WKB ([`Geometry::from_wkb`]). [`geometry_to_gml`] writes it as GML.

mod geo;
mod writer;

use crate::conversions::{
    geometry_kind_from_str, geometry_kind_to_gml_name, geometry_kind_to_str, json_id_to_string,
};
use crate::error::{Result, WfstError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

pub use writer::{
    geometry_to_gml, line_string, linear_ring, multi_line_string, multi_point, multi_polygon,
    point, polygon,
};

/// One coordinate tuple: `[x, y]` or `[x, y, z]`, in GeoJSON order.
pub type Position = Vec<f64>;

/// The geometry types that can be written as GML.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    /// The GeoJSON `type` name.
    pub fn as_str(&self) -> &'static str {
        geometry_kind_to_str(*self)
    }

    /// The name of the GML element this kind is written as.
    pub fn gml_name(&self) -> &'static str {
        geometry_kind_to_gml_name(*self)
    }
}

impl FromStr for GeometryKind {
    type Err = WfstError;

    fn from_str(s: &str) -> Result<Self> {
        geometry_kind_from_str(s)
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A GeoJSON geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Position),
    LineString(Vec<Position>),
    LinearRing(Vec<Position>),
    /// The first ring is the exterior, the others are holes.
    Polygon(Vec<Vec<Position>>),
    MultiPoint(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    GeometryCollection(Vec<CollectionMember>),
}

/// A member of a geometry collection, optionally carrying its own `gml:id`.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionMember {
    pub id: Option<String>,
    pub geometry: Geometry,
}

impl From<Geometry> for CollectionMember {
    fn from(geometry: Geometry) -> Self {
        Self { id: None, geometry }
    }
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::LinearRing(_) => GeometryKind::LinearRing,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// Parse a GeoJSON geometry object.
    ///
    /// The `type` member is looked up first, so an unknown type is reported as
    /// [`WfstError::UnsupportedGeometryType`] regardless of the coordinates.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| WfstError::InvalidGeometry {
            geometry_type: "Geometry",
            reason: format!("expected a JSON object, got {value}"),
        })?;
        let type_name = object
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| WfstError::InvalidGeometry {
                geometry_type: "Geometry",
                reason: "missing type".to_string(),
            })?;
        let kind: GeometryKind = type_name.parse()?;

        Ok(match kind {
            GeometryKind::Point => Geometry::Point(coordinates_of(kind, object)?),
            GeometryKind::LineString => Geometry::LineString(coordinates_of(kind, object)?),
            GeometryKind::LinearRing => Geometry::LinearRing(coordinates_of(kind, object)?),
            GeometryKind::Polygon => Geometry::Polygon(coordinates_of(kind, object)?),
            GeometryKind::MultiPoint => Geometry::MultiPoint(coordinates_of(kind, object)?),
            GeometryKind::MultiLineString => {
                Geometry::MultiLineString(coordinates_of(kind, object)?)
            }
            GeometryKind::MultiPolygon => Geometry::MultiPolygon(coordinates_of(kind, object)?),
            GeometryKind::GeometryCollection => {
                let geometries = object
                    .get("geometries")
                    .and_then(|g| g.as_array())
                    .ok_or_else(|| WfstError::InvalidGeometry {
                        geometry_type: kind.as_str(),
                        reason: "missing geometries".to_string(),
                    })?;
                let members = geometries
                    .iter()
                    .map(|member| {
                        Ok(CollectionMember {
                            id: member.get("id").and_then(json_id_to_string),
                            geometry: Geometry::from_json(member)?,
                        })
                    })
                    .collect::<Result<Vec<CollectionMember>>>()?;
                Geometry::GeometryCollection(members)
            }
        })
    }
}

fn coordinates_of<T: DeserializeOwned>(
    kind: GeometryKind,
    object: &serde_json::Map<String, serde_json::Value>,
) -> Result<T> {
    let coordinates = object
        .get("coordinates")
        .ok_or_else(|| WfstError::InvalidGeometry {
            geometry_type: kind.as_str(),
            reason: "missing coordinates".to_string(),
        })?;
    T::deserialize(coordinates).map_err(|err| WfstError::InvalidGeometry {
        geometry_type: kind.as_str(),
        reason: err.to_string(),
    })
}

impl<'de> Deserialize<'de> for Geometry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Geometry::from_json(&value).map_err(serde::de::Error::custom)
    }
}

/// Options for writing a geometry as GML.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GmlOptions {
    /// `srsName` attribute of the geometry (and of multi-geometry members).
    pub srs_name: Option<String>,
    /// `srsDimension` attribute of `gml:pos` / `gml:posList`.
    pub srs_dimension: Option<u32>,
    /// `gml:id`s of the members of a multi-geometry, by index.
    pub gml_ids: Vec<String>,
    /// Write positions as `y x [z]` instead of the GeoJSON `x y [z]` order.
    pub reorder_lat_lng: bool,
}

/// Parse a GeoJSON geometry object and write it as GML.
pub fn geometry_json_to_gml(
    geometry: &serde_json::Value,
    id: &str,
    options: &GmlOptions,
) -> Result<String> {
    geometry_to_gml(&Geometry::from_json(geometry)?, id, options)
}
