//! Thin shapefile reading adapter
//!
//! Maps shapefile geometry and dBASE attribute records onto [`Feature`]
//! values. Polygons contribute only their outer rings (holes are not border
//! lines); polylines contribute every part; other geometry types are skipped
//! with a warning. Container-level failures are fatal and propagate
//! unchanged.

use crate::Result;
use crate::feature::{AttributeRecord, Feature};
use geo::Coord;
use shapefile::dbase::FieldValue;
use shapefile::{Point, PolygonRing, Shape};
use std::path::Path;

/// Read all features from a shapefile (`.shp` with its sidecar `.dbf`).
pub fn read_features(path: impl AsRef<Path>) -> Result<Vec<Feature>> {
    let mut reader = shapefile::Reader::from_path(path)?;
    let mut features = Vec::new();

    for shape_record in reader.iter_shapes_and_records() {
        let (shape, record) = shape_record?;
        let attributes = attributes_from_record(record);

        let (points, part_offsets) = match &shape {
            Shape::Polygon(polygon) => outer_rings(polygon.rings()),
            Shape::Polyline(polyline) => line_parts(polyline.parts()),
            other => {
                tracing::warn!(geometry = %other.shapetype(), "skipping unsupported geometry type");
                continue;
            }
        };

        features.push(Feature::new(points, part_offsets, attributes));
    }

    Ok(features)
}

/// Keep the attribute fields the pipeline can use as display names.
/// Character and numeric values become strings; everything else is dropped.
fn attributes_from_record(record: shapefile::dbase::Record) -> AttributeRecord {
    let mut attributes = AttributeRecord::new();
    for (field, value) in record {
        match value {
            FieldValue::Character(Some(text)) => attributes.insert(field, text),
            FieldValue::Numeric(Some(number)) => attributes.insert(field, number.to_string()),
            FieldValue::Integer(number) => attributes.insert(field, number.to_string()),
            _ => {}
        }
    }
    attributes
}

/// Concatenate the outer rings of a polygon into a flat buffer with
/// part-start offsets.
fn outer_rings(rings: &[PolygonRing<Point>]) -> (Vec<Coord<f64>>, Vec<usize>) {
    let mut points = Vec::new();
    let mut part_offsets = Vec::new();
    for ring in rings {
        if let PolygonRing::Outer(ring_points) = ring {
            part_offsets.push(points.len());
            points.extend(ring_points.iter().map(|p| Coord { x: p.x, y: p.y }));
        }
    }
    (points, part_offsets)
}

/// Concatenate polyline parts into a flat buffer with part-start offsets.
fn line_parts(parts: &[Vec<Point>]) -> (Vec<Coord<f64>>, Vec<usize>) {
    let mut points = Vec::new();
    let mut part_offsets = Vec::new();
    for part in parts {
        part_offsets.push(points.len());
        points.extend(part.iter().map(|p| Coord { x: p.x, y: p.y }));
    }
    (points, part_offsets)
}
