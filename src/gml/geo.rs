use super::{CollectionMember, Geometry, Position};
use crate::error::{Result, WfstError};
use geo_traits::{
    CoordTrait, GeometryCollectionTrait, GeometryTrait, LineStringTrait, LineTrait,
    MultiLineStringTrait, MultiPointTrait, MultiPolygonTrait, PointTrait, PolygonTrait, RectTrait,
    TriangleTrait,
};
use wkb::reader::Wkb;

impl Geometry {
    /// Convert any geometry that implements `geo_traits::GeometryTrait<T = f64>`
    /// (for example `geo_types::Point` or `wkt::Wkt`).
    ///
    /// Every ordinate the coordinate reports is kept, so z values survive.
    /// `Line`, `Triangle` and `Rect` have no GeoJSON counterpart and become a
    /// LineString and single-ring Polygons.
    ///
    /// Example:
    /// ```
    /// use geojson_wfst::Geometry;
    /// use geo_types::Point;
    ///
    /// let geometry = Geometry::from_geo(&Point::new(1.0, 2.0))?;
    /// assert_eq!(geometry, Geometry::Point(vec![1.0, 2.0]));
    /// # Ok::<(), geojson_wfst::WfstError>(())
    /// ```
    pub fn from_geo<G: GeometryTrait<T = f64>>(geometry: &G) -> Result<Self> {
        use geo_traits::GeometryType as GeoType;

        Ok(match geometry.as_type() {
            GeoType::Point(point) => Geometry::Point(point_position(point)?),
            GeoType::LineString(line) => Geometry::LineString(line_positions(line)),
            GeoType::Polygon(poly) => Geometry::Polygon(polygon_rings(poly)),
            GeoType::MultiPoint(multi) => Geometry::MultiPoint(
                multi
                    .points()
                    .map(|point| point_position(&point))
                    .collect::<Result<Vec<Position>>>()?,
            ),
            GeoType::MultiLineString(multi) => Geometry::MultiLineString(
                multi
                    .line_strings()
                    .map(|line| line_positions(&line))
                    .collect(),
            ),
            GeoType::MultiPolygon(multi) => Geometry::MultiPolygon(
                multi.polygons().map(|poly| polygon_rings(&poly)).collect(),
            ),
            GeoType::GeometryCollection(collection) => Geometry::GeometryCollection(
                collection
                    .geometries()
                    .map(|sub_geom| Geometry::from_geo(&sub_geom).map(CollectionMember::from))
                    .collect::<Result<Vec<CollectionMember>>>()?,
            ),
            GeoType::Line(line) => {
                Geometry::LineString(vec![position(&line.start()), position(&line.end())])
            }
            GeoType::Triangle(triangle) => {
                let first = position(&triangle.first());
                Geometry::Polygon(vec![vec![
                    first.clone(),
                    position(&triangle.second()),
                    position(&triangle.third()),
                    first,
                ]])
            }
            GeoType::Rect(rect) => {
                let (min, max) = (rect.min(), rect.max());
                let (minx, miny, maxx, maxy) = (min.x(), min.y(), max.x(), max.y());
                Geometry::Polygon(vec![vec![
                    vec![minx, miny],
                    vec![maxx, miny],
                    vec![maxx, maxy],
                    vec![minx, maxy],
                    vec![minx, miny],
                ]])
            }
        })
    }

    /// Read a WKB (ISO or extended) geometry.
    pub fn from_wkb(buf: &[u8]) -> Result<Self> {
        let wkb = Wkb::try_new(buf)?;
        Self::from_geo(&wkb)
    }

    /// Parse a WKT geometry.
    #[cfg(feature = "wkt")]
    pub fn from_wkt(text: &str) -> Result<Self> {
        use std::str::FromStr;

        let wkt = wkt::Wkt::<f64>::from_str(text).map_err(|err| WfstError::Wkt(err.to_string()))?;
        Self::from_geo(&wkt)
    }
}

fn position<C: CoordTrait<T = f64>>(coord: &C) -> Position {
    (0..coord.dim().size()).filter_map(|n| coord.nth(n)).collect()
}

fn point_position<P: PointTrait<T = f64>>(point: &P) -> Result<Position> {
    point
        .coord()
        .map(|coord| position(&coord))
        .ok_or_else(|| WfstError::InvalidGeometry {
            geometry_type: "Point",
            reason: "an empty point has no GML representation".to_string(),
        })
}

fn line_positions<L: LineStringTrait<T = f64>>(line: &L) -> Vec<Position> {
    line.coords().map(|coord| position(&coord)).collect()
}

fn polygon_rings<P: PolygonTrait<T = f64>>(poly: &P) -> Vec<Vec<Position>> {
    let mut rings = Vec::with_capacity(poly.num_interiors() + 1);
    if let Some(ring) = poly.exterior() {
        rings.push(line_positions(&ring));
    }
    for ring in poly.interiors() {
        rings.push(line_positions(&ring));
    }
    rings
}

#[cfg(test)]
mod tests {
    use crate::Result;
    use crate::gml::{CollectionMember, Geometry};
    use geo_types::{
        Coord, GeometryCollection, Line, LineString, MultiPoint, Point, Polygon, Rect,
    };
    use std::str::FromStr;
    use wkt::Wkt;

    #[test]
    fn from_geo_types() -> Result<()> {
        let line = LineString::from(vec![(0.0, 0.0), (2.0, 1.0)]);
        assert_eq!(
            Geometry::from_geo(&line)?,
            Geometry::LineString(vec![vec![0.0, 0.0], vec![2.0, 1.0]])
        );

        let mp = MultiPoint::from(vec![Point::new(1.0, 5.0), Point::new(-2.0, 3.0)]);
        assert_eq!(
            Geometry::from_geo(&mp)?,
            Geometry::MultiPoint(vec![vec![1.0, 5.0], vec![-2.0, 3.0]])
        );
        Ok(())
    }

    #[test]
    fn polygon_interiors_follow_exterior() -> Result<()> {
        let exterior = LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 0.0)]);
        let hole = LineString::from(vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 1.0)]);
        let poly = Polygon::new(exterior, vec![hole]);

        let Geometry::Polygon(rings) = Geometry::from_geo(&poly)? else {
            panic!("expected a polygon");
        };
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[1][0], vec![1.0, 1.0]);
        Ok(())
    }

    #[test]
    fn collection_members_are_converted_recursively() -> Result<()> {
        let point = geo_types::Geometry::Point(Point::new(5.0, -1.0));
        let line = geo_types::Geometry::Line(Line::new((0.0, 0.0), (1.0, 1.0)));
        let collection = GeometryCollection::from(vec![point, line]);

        assert_eq!(
            Geometry::from_geo(&collection)?,
            Geometry::GeometryCollection(vec![
                CollectionMember::from(Geometry::Point(vec![5.0, -1.0])),
                CollectionMember::from(Geometry::LineString(vec![vec![0.0, 0.0], vec![1.0, 1.0]])),
            ])
        );
        Ok(())
    }

    #[test]
    fn rect_becomes_closed_polygon() -> Result<()> {
        let rect = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 2.0, y: 1.0 });
        let Geometry::Polygon(rings) = Geometry::from_geo(&rect)? else {
            panic!("expected a polygon");
        };
        assert_eq!(rings[0].first(), rings[0].last());
        assert_eq!(rings[0].len(), 5);
        Ok(())
    }

    #[test]
    fn wkt_keeps_z() -> Result<()> {
        let wkt = Wkt::<f64>::from_str("POINT Z (1 2 3)").expect("valid wkt");
        assert_eq!(Geometry::from_geo(&wkt)?, Geometry::Point(vec![1.0, 2.0, 3.0]));
        Ok(())
    }

    #[test]
    fn from_wkb_bytes() -> Result<()> {
        let line = LineString::from(vec![(3.0, -1.0), (4.0, 0.5)]);
        let mut buf = Vec::new();
        wkb::writer::write_geometry(&mut buf, &line, &Default::default())?;

        assert_eq!(
            Geometry::from_wkb(&buf)?,
            Geometry::LineString(vec![vec![3.0, -1.0], vec![4.0, 0.5]])
        );
        Ok(())
    }

    #[test]
    fn empty_point_is_rejected() {
        let empty = Wkt::<f64>::from_str("POINT EMPTY").expect("valid wkt");
        assert!(Geometry::from_geo(&empty).is_err());
    }
}
