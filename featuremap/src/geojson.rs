//! Reading and writing attributed collections as [GeoJSON](https://datatracker.ietf.org/doc/html/rfc7946).
//!
//! GeoJSON coordinates are always WGS84 longitude/latitude, so collections read from GeoJSON have the
//! [`Crs::WGS84`] descriptor, and collections in other systems are reprojected before writing.

use std::path::Path;

use featuremap_types::cartesian::Point2d;
use featuremap_types::geo::Crs;
use featuremap_types::{Ring, RingKind, Shape, Winding};
use geojson::feature::Id;
use geojson::{GeoJson, Geometry, JsonObject, JsonValue, Position};

use crate::attributed::AttributedCollection;
use crate::collection::FeatureCollection;
use crate::error::FeatureMapError;
use crate::table::{AttributeTable, Row};
use crate::value::Value;

/// Reads a GeoJSON file. See [`from_geojson_str`].
pub fn read_geojson(
    path: impl AsRef<Path>,
    id_property: Option<&str>,
) -> Result<AttributedCollection, FeatureMapError> {
    let source = std::fs::read_to_string(path.as_ref())?;
    log::debug!("Reading GeoJSON from {}", path.as_ref().display());
    from_geojson_str(&source, id_property)
}

/// Parses a GeoJSON feature collection (or a single feature).
///
/// Feature identifiers are taken from the `id_property` property if it is given, or from the feature `id` member
/// otherwise. Features without an `id` member get their position in the file as identifier. All feature properties
/// become attribute columns; nested arrays and objects are stored as JSON text.
///
/// Polygons become one solid ring followed by hole rings, line strings become line rings, multi-geometries and
/// geometry collections become several rings of one shape. Point geometries cannot be represented and fail as
/// invalid rings.
pub fn from_geojson_str(
    source: &str,
    id_property: Option<&str>,
) -> Result<AttributedCollection, FeatureMapError> {
    let features = match source.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => {
            return Err(FeatureMapError::UnsupportedGeoJson(
                "expected a feature or a feature collection, got a bare geometry".to_string(),
            ))
        }
    };

    let mut shapes = Vec::with_capacity(features.len());
    let mut records = Vec::with_capacity(features.len());
    for (index, feature) in features.into_iter().enumerate() {
        let id = match id_property {
            Some(property) => feature
                .property(property)
                .and_then(json_id)
                .ok_or_else(|| {
                    FeatureMapError::UnsupportedGeoJson(format!(
                        "feature {index} has no string or number property '{property}'"
                    ))
                })?,
            None => match &feature.id {
                Some(Id::String(id)) => id.clone(),
                Some(Id::Number(id)) => id.to_string(),
                None => index.to_string(),
            },
        };

        let geometry = feature.geometry.as_ref().ok_or_else(|| {
            FeatureMapError::UnsupportedGeoJson(format!("feature '{id}' has no geometry"))
        })?;
        let mut rings = vec![];
        convert_geometry(geometry, &mut rings)?;
        shapes.push(Shape::new(id.clone(), rings)?);

        let cells = feature
            .properties
            .into_iter()
            .flatten()
            .map(|(name, value)| (name, json_to_value(value)))
            .collect();
        records.push((id, cells));
    }

    let collection = FeatureCollection::new(shapes)?.with_crs(Crs::WGS84);
    let table = AttributeTable::from_records(records)?;

    AttributedCollection::new(collection, table)
}

fn json_id(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_to_value(value: JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(v) => Value::Bool(v),
        JsonValue::Number(n) => match n.as_i64() {
            Some(v) => Value::Int(v),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        JsonValue::String(v) => Value::Text(v),
        nested => Value::Text(nested.to_string()),
    }
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(v) => JsonValue::Bool(*v),
        Value::Int(v) => JsonValue::from(*v),
        Value::Float(v) => serde_json::Number::from_f64(*v).map_or(JsonValue::Null, JsonValue::Number),
        Value::Text(v) => JsonValue::String(v.clone()),
    }
}

fn convert_geometry(geometry: &Geometry, rings: &mut Vec<Ring>) -> Result<(), FeatureMapError> {
    match &geometry.value {
        geojson::Value::Point(position) => rings.push(Ring::line(vec![convert_position(position)?])?),
        geojson::Value::MultiPoint(positions) => {
            for position in positions {
                rings.push(Ring::line(vec![convert_position(position)?])?);
            }
        }
        geojson::Value::LineString(line) => rings.push(Ring::line(convert_positions(line, false)?)?),
        geojson::Value::MultiLineString(lines) => {
            for line in lines {
                rings.push(Ring::line(convert_positions(line, false)?)?);
            }
        }
        geojson::Value::Polygon(polygon) => convert_polygon(polygon, rings)?,
        geojson::Value::MultiPolygon(polygons) => {
            for polygon in polygons {
                convert_polygon(polygon, rings)?;
            }
        }
        geojson::Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                convert_geometry(geometry, rings)?;
            }
        }
    }

    Ok(())
}

fn convert_polygon(polygon: &[Vec<Position>], rings: &mut Vec<Ring>) -> Result<(), FeatureMapError> {
    for (index, ring) in polygon.iter().enumerate() {
        rings.push(Ring::polygon(convert_positions(ring, true)?, index > 0)?);
    }

    Ok(())
}

fn convert_positions(positions: &[Position], is_closed: bool) -> Result<Vec<Point2d>, FeatureMapError> {
    let mut points = positions
        .iter()
        .map(|p| convert_position(p))
        .collect::<Result<Vec<_>, _>>()?;

    if is_closed && points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    Ok(points)
}

fn convert_position(position: &[f64]) -> Result<Point2d, FeatureMapError> {
    match position {
        [x, y, ..] => Ok(Point2d::new(*x, *y)),
        _ => Err(FeatureMapError::UnsupportedGeoJson(format!(
            "position must have at least two coordinates, got {position:?}"
        ))),
    }
}

/// Serializes the collection into a GeoJSON feature collection string.
///
/// Shape identifiers are written as feature `id` members and attribute rows as feature properties. Collections with
/// a non-geographic descriptor are reprojected into WGS84 first. A collection with undefined descriptor is written
/// as is.
pub fn to_geojson(collection: &AttributedCollection) -> Result<String, FeatureMapError> {
    let reprojected;
    let collection = match collection.crs() {
        Some(crs) if !crs.is_geographic() => {
            reprojected = collection.reproject(&Crs::WGS84)?;
            &reprojected
        }
        Some(_) => collection,
        None => {
            log::warn!("Writing a collection with undefined coordinate reference descriptor as GeoJSON");
            collection
        }
    };

    let features = collection
        .iter()
        .map(|feature| -> Result<geojson::Feature, FeatureMapError> {
            Ok(geojson::Feature {
                bbox: None,
                geometry: Some(shape_geometry(feature.shape())?),
                id: Some(Id::String(feature.id().to_string())),
                properties: Some(row_properties(&feature.row())),
                foreign_members: None,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let geojson = GeoJson::FeatureCollection(geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    });

    Ok(geojson.to_string())
}

/// Writes the collection into a GeoJSON file. See [`to_geojson`].
pub fn write_geojson(
    collection: &AttributedCollection,
    path: impl AsRef<Path>,
) -> Result<(), FeatureMapError> {
    let contents = to_geojson(collection)?;
    std::fs::write(path.as_ref(), contents)?;
    log::debug!(
        "Written {} features to {}",
        collection.len(),
        path.as_ref().display()
    );

    Ok(())
}

fn row_properties(row: &Row) -> JsonObject {
    row.iter()
        .map(|(name, value)| (name.to_string(), value_to_json(value)))
        .collect()
}

fn shape_geometry(shape: &Shape) -> Result<Geometry, FeatureMapError> {
    let solids: Vec<&Ring> = shape.solid_rings().collect();
    if solids.is_empty() && shape.holes().next().is_some() {
        return Err(FeatureMapError::UnsupportedGeoJson(format!(
            "shape '{}' has holes, but no solid rings",
            shape.id()
        )));
    }

    let mut polygons: Vec<Vec<Vec<Position>>> = solids
        .iter()
        .map(|ring| vec![ring_positions(ring)])
        .collect();
    for hole in shape.holes() {
        let Some(first_point) = hole.points().first() else {
            continue;
        };
        let owner = solids
            .iter()
            .position(|solid| solid.contains_point(first_point))
            .unwrap_or(0);
        polygons[owner].push(ring_positions(hole));
    }

    let lines: Vec<Vec<Position>> = shape.line_rings().map(ring_positions).collect();

    let polygons = match polygons.len() {
        0 => None,
        1 => polygons.pop().map(geojson::Value::Polygon),
        _ => Some(geojson::Value::MultiPolygon(polygons)),
    };
    let lines = match lines.len() {
        0 => None,
        1 => lines.into_iter().next().map(geojson::Value::LineString),
        _ => Some(geojson::Value::MultiLineString(lines)),
    };

    let value = match (polygons, lines) {
        (Some(polygons), None) => polygons,
        (None, Some(lines)) => lines,
        (Some(polygons), Some(lines)) => geojson::Value::GeometryCollection(vec![
            Geometry::new(polygons),
            Geometry::new(lines),
        ]),
        (None, None) => {
            return Err(FeatureMapError::UnsupportedGeoJson(format!(
                "shape '{}' has no rings",
                shape.id()
            )))
        }
    };

    Ok(Geometry::new(value))
}

/// Positions of the ring. Closed rings get the closing position and are oriented according to RFC 7946: solid rings
/// counterclockwise, holes clockwise.
fn ring_positions(ring: &Ring) -> Vec<Position> {
    let mut positions: Vec<Position> = ring.points().iter().map(|p| vec![p.x, p.y]).collect();

    let required = match ring.kind() {
        RingKind::Line => return positions,
        RingKind::Solid => Winding::CounterClockwise,
        RingKind::Hole => Winding::Clockwise,
    };
    if ring.winding() != required {
        positions.reverse();
    }
    if let Some(first) = positions.first().cloned() {
        positions.push(first);
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{house1, house2, houses};
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use featuremap_types::error::GeometryError;

    const HOUSES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "house2",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [[20, 0], [30, 0], [30, 10], [20, 10], [20, 0]],
                        [[22, 2], [22, 4], [24, 4], [24, 2], [22, 2]]
                    ]
                },
                "properties": {"attr1": 1, "attr2": 6, "name": "Big house"}
            },
            {
                "type": "Feature",
                "id": "house1",
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[0, 0], [10, 0], [10, 10]]
                },
                "properties": {"attr1": 2, "attr2": 5.5, "tags": ["old"]}
            }
        ]
    }"#;

    fn attributed_houses() -> AttributedCollection {
        let table = AttributeTable::new(["house1", "house2"])
            .unwrap()
            .with_column("attr1", [2, 1])
            .unwrap()
            .with_column("note", [Value::Text("roof".into()), Value::Null])
            .unwrap();
        AttributedCollection::new(houses(), table).unwrap()
    }

    #[test]
    fn read_features() {
        let attributed = from_geojson_str(HOUSES, None).unwrap();
        assert_eq!(attributed.len(), 2);
        assert_eq!(attributed.crs(), Some(&Crs::WGS84));

        let house2 = attributed.shape(0).unwrap();
        assert_eq!(house2.id(), "house2");
        assert_eq!(house2.rings().len(), 2);
        assert_eq!(house2.rings()[0].len(), 4);
        assert!(house2.rings()[1].is_hole());
        assert_relative_eq!(house2.area(), 96.0);

        let house1 = attributed.shape(1).unwrap();
        assert_eq!(house1.rings()[0].kind(), RingKind::Line);
        assert_eq!(house1.rings()[0].len(), 3);

        let table = attributed.table();
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["attr1", "attr2", "name", "tags"]
        );
        assert_eq!(table.value(0, "tags"), Some(&Value::Null));
        assert_eq!(table.value(1, "tags"), Some(&Value::Text(r#"["old"]"#.into())));
        assert_eq!(table.value(1, "attr2"), Some(&Value::Float(5.5)));
    }

    #[test]
    fn id_from_property() {
        let attributed = from_geojson_str(HOUSES, Some("attr1")).unwrap();
        assert_eq!(
            attributed.collection().ids().collect::<Vec<_>>(),
            vec!["1", "2"]
        );

        assert_matches!(
            from_geojson_str(HOUSES, Some("name")),
            Err(FeatureMapError::UnsupportedGeoJson(_))
        );
    }

    #[test]
    fn generated_ids() {
        let source = r#"{"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}, "properties": null}"#;
        let attributed = from_geojson_str(source, None).unwrap();
        assert_eq!(attributed.shape(0).unwrap().id(), "0");
        assert!(attributed.table().columns().is_empty());
    }

    #[test]
    fn invalid_input() {
        assert_matches!(
            from_geojson_str("{", None),
            Err(FeatureMapError::GeoJson(_))
        );
        assert_matches!(
            from_geojson_str(r#"{"type": "Point", "coordinates": [0, 0]}"#, None),
            Err(FeatureMapError::UnsupportedGeoJson(_))
        );

        let point = r#"{"type": "Feature", "geometry": {"type": "Point", "coordinates": [0, 0]}, "properties": {}}"#;
        assert_matches!(
            from_geojson_str(point, None),
            Err(FeatureMapError::InvalidGeometry(GeometryError::InvalidRing { .. }))
        );

        let duplicates = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "id": 1, "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}, "properties": {}},
            {"type": "Feature", "id": 1, "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}, "properties": {}}
        ]}"#;
        assert_matches!(
            from_geojson_str(duplicates, None),
            Err(FeatureMapError::DuplicateIdentifier(id)) if id == "1"
        );
    }

    #[test]
    fn write_and_read_back() {
        let mut attributed = attributed_houses().select(vec![1_usize]).unwrap();
        attributed.set_crs(Some(Crs::WGS84));

        let json: JsonValue = serde_json::from_str(&to_geojson(&attributed).unwrap()).unwrap();
        let feature = &json["features"][0];
        assert_eq!(feature["id"], "house2");
        assert_eq!(feature["properties"]["attr1"], 1);
        assert_eq!(feature["properties"]["note"], JsonValue::Null);
        assert_eq!(feature["geometry"]["type"], "MultiPolygon");

        let polygons = feature["geometry"]["coordinates"].as_array().unwrap();
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].as_array().unwrap().len(), 2, "hole is nested under the walls");
        assert_eq!(polygons[1].as_array().unwrap().len(), 1);
        let walls = polygons[0][0].as_array().unwrap();
        assert_eq!(walls.len(), 5);
        assert_eq!(walls.first(), walls.last());
    }

    #[test]
    fn multi_part_shapes() {
        let attributed = attributed_houses();
        let json: JsonValue = serde_json::from_str(&to_geojson(&attributed).unwrap()).unwrap();
        assert_eq!(json["features"][0]["geometry"]["type"], "MultiPolygon");

        let back = from_geojson_str(&json.to_string(), None).unwrap();
        assert_eq!(back.shape(0).unwrap().rings().len(), house1().rings().len());
        assert_relative_eq!(back.shape(0).unwrap().area(), house1().area());
        assert_relative_eq!(back.shape(1).unwrap().area(), house2().area());
        assert_eq!(back.table().value(0, "note"), Some(&Value::Text("roof".into())));
    }

    #[test]
    fn projected_collections_are_written_in_wgs84() {
        let mut attributed = from_geojson_str(HOUSES, None).unwrap();
        attributed = attributed.reproject(&Crs::EPSG3857).unwrap();

        let back = from_geojson_str(&to_geojson(&attributed).unwrap(), None).unwrap();
        let corner = back.shape(0).unwrap().rings()[0].points()[1];
        assert_relative_eq!(corner.x, 30.0, epsilon = 1e-9);
        assert_relative_eq!(corner.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn files() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("houses.geojson");

        let attributed = from_geojson_str(HOUSES, None).unwrap();
        write_geojson(&attributed, &path).unwrap();
        let back = read_geojson(&path, None).unwrap();
        assert_eq!(back.collection().ids().collect::<Vec<_>>(), ["house2", "house1"]);
        assert_eq!(back.table().value(0, "name"), Some(&Value::Text("Big house".into())));

        assert_matches!(
            read_geojson(dir.path().join("missing.geojson"), None),
            Err(FeatureMapError::Io(_))
        );
    }
}
