use super::{CollectionMember, Geometry, GeometryKind, GmlOptions, Position};
use crate::error::{Result, WfstError};
use crate::xml::{Attributes, build_tag};

/// Write any geometry as GML 3.2.
///
/// `id` becomes the `gml:id` of the outermost element (omitted when empty).
pub fn geometry_to_gml(geometry: &Geometry, id: &str, options: &GmlOptions) -> Result<String> {
    match geometry {
        Geometry::Point(coords) => point(coords, id, options),
        Geometry::LineString(coords) => line_string(coords, id, options),
        Geometry::LinearRing(coords) => linear_ring(coords, id, options),
        Geometry::Polygon(rings) => polygon(rings, id, options),
        Geometry::MultiPoint(points) => multi_point(points, id, options),
        Geometry::MultiLineString(lines) => multi_line_string(lines, id, options),
        Geometry::MultiPolygon(polygons) => multi_polygon(polygons, id, options),
        Geometry::GeometryCollection(members) => geometry_collection(members, id, options),
    }
}

/// `<gml:Point><gml:pos>x y</gml:pos></gml:Point>`
pub fn point(coords: &[f64], id: &str, options: &GmlOptions) -> Result<String> {
    let pos = build_tag(
        "gml",
        "pos",
        &dimension_attrs(options),
        Some(&format_position(coords, options)),
    )?;
    build_tag("gml", "Point", &geometry_attrs(id, options), Some(&pos))
}

/// `<gml:LineString><gml:posList>x y x y ...</gml:posList></gml:LineString>`
pub fn line_string(coords: &[Position], id: &str, options: &GmlOptions) -> Result<String> {
    let pos_list = pos_list(coords, options)?;
    build_tag(
        "gml",
        "LineString",
        &geometry_attrs(id, options),
        Some(&pos_list),
    )
}

/// `<gml:LinearRing><gml:posList>...</gml:posList></gml:LinearRing>`
pub fn linear_ring(coords: &[Position], id: &str, options: &GmlOptions) -> Result<String> {
    let pos_list = pos_list(coords, options)?;
    let attrs = Attributes::new()
        .with("gml:id", id)
        .with("srsName", options.srs_name.as_deref().unwrap_or_default());
    build_tag("gml", "LinearRing", &attrs, Some(&pos_list))
}

/// `<gml:Polygon>` with the first ring as `gml:exterior` and every other ring
/// as a separate `gml:interior`.
pub fn polygon(rings: &[Vec<Position>], id: &str, options: &GmlOptions) -> Result<String> {
    let (exterior, interiors) = rings.split_first().ok_or_else(|| WfstError::InvalidGeometry {
        geometry_type: "Polygon",
        reason: "a polygon needs at least one ring".to_string(),
    })?;

    // Rings only carry the dimension; srsName and ids belong to the polygon.
    let ring_options = GmlOptions {
        srs_dimension: options.srs_dimension,
        reorder_lat_lng: options.reorder_lat_lng,
        ..Default::default()
    };

    let mut inner = build_tag(
        "gml",
        "exterior",
        &Attributes::new(),
        Some(&linear_ring(exterior, "", &ring_options)?),
    )?;
    for ring in interiors {
        inner.push_str(&build_tag(
            "gml",
            "interior",
            &Attributes::new(),
            Some(&linear_ring(ring, "", &ring_options)?),
        )?);
    }

    build_tag("gml", "Polygon", &geometry_attrs(id, options), Some(&inner))
}

pub fn multi_point(points: &[Position], id: &str, options: &GmlOptions) -> Result<String> {
    multi(
        GeometryKind::MultiPoint,
        "pointMembers",
        points,
        id,
        options,
        |p, id, o| point(p, id, o),
    )
}

pub fn multi_line_string(
    lines: &[Vec<Position>],
    id: &str,
    options: &GmlOptions,
) -> Result<String> {
    multi(
        GeometryKind::MultiLineString,
        "curveMembers",
        lines,
        id,
        options,
        |l, id, o| line_string(l, id, o),
    )
}

pub fn multi_polygon(
    polygons: &[Vec<Vec<Position>>],
    id: &str,
    options: &GmlOptions,
) -> Result<String> {
    multi(
        GeometryKind::MultiPolygon,
        "surfaceMembers",
        polygons,
        id,
        options,
        |p, id, o| polygon(p, id, o),
    )
}

fn geometry_collection(
    members: &[CollectionMember],
    id: &str,
    options: &GmlOptions,
) -> Result<String> {
    multi(
        GeometryKind::GeometryCollection,
        "geometryMembers",
        members,
        id,
        options,
        |m, id, o| geometry_to_gml(&m.geometry, id, o),
    )
}

/// Anything that can be a member of a multi-geometry. Only collection members
/// can carry their own id.
trait MultiMember {
    fn member_id(&self) -> Option<&str> {
        None
    }
}

impl MultiMember for Position {}

impl MultiMember for Vec<Position> {}

impl MultiMember for Vec<Vec<Position>> {}

impl MultiMember for CollectionMember {
    fn member_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

fn multi<M, F>(
    kind: GeometryKind,
    member_tag: &str,
    members: &[M],
    id: &str,
    options: &GmlOptions,
    convert: F,
) -> Result<String>
where
    M: MultiMember,
    F: Fn(&M, &str, &GmlOptions) -> Result<String>,
{
    // gmlIds address the members of this geometry only.
    let member_options = GmlOptions {
        gml_ids: Vec::new(),
        ..options.clone()
    };

    let mut inner = String::new();
    for (idx, member) in members.iter().enumerate() {
        let member_id = member
            .member_id()
            .filter(|id| !id.is_empty())
            .or_else(|| options.gml_ids.get(idx).map(String::as_str))
            .unwrap_or_default();
        inner.push_str(&convert(member, member_id, &member_options)?);
    }

    let members_xml = build_tag("gml", member_tag, &Attributes::new(), Some(&inner))?;
    build_tag("gml", kind.gml_name(), &geometry_attrs(id, options), Some(&members_xml))
}

fn geometry_attrs(id: &str, options: &GmlOptions) -> Attributes {
    Attributes::new()
        .with("srsName", options.srs_name.as_deref().unwrap_or_default())
        .with("gml:id", id)
}

fn dimension_attrs(options: &GmlOptions) -> Attributes {
    let dimension = options
        .srs_dimension
        .filter(|d| *d != 0)
        .map(|d| d.to_string())
        .unwrap_or_default();
    Attributes::new().with("srsDimension", dimension)
}

fn pos_list(coords: &[Position], options: &GmlOptions) -> Result<String> {
    let positions = coords
        .iter()
        .map(|c| format_position(c, options))
        .collect::<Vec<String>>()
        .join(" ");
    build_tag("gml", "posList", &dimension_attrs(options), Some(&positions))
}

fn format_position(coords: &[f64], options: &GmlOptions) -> String {
    let mut ordinates: Vec<f64> = coords.to_vec();
    if options.reorder_lat_lng && ordinates.len() >= 2 {
        ordinates.swap(0, 1);
    }
    ordinates
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}
