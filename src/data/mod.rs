use crate::map::{Point, Shape};
use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// World coastline and border rings as `[[{"lat": .., "lon": ..}, ..], ..]`
static WORLD_JSON: &str = include_str!("world.json");

/// Decoded once on first use. The blob ships inside the binary, so a decode
/// failure is a packaging defect and aborts.
static WORLD: LazyLock<Arc<[Shape]>> = LazyLock::new(|| {
    let mut bytes = WORLD_JSON.as_bytes().to_vec();
    let shapes: Vec<Shape> =
        simd_json::serde::from_slice(&mut bytes).expect("embedded world catalog is malformed");
    tracing::debug!(shapes = shapes.len(), "decoded embedded world catalog");
    shapes.into()
});

/// The embedded world catalog
pub fn world_shapes() -> Arc<[Shape]> {
    Arc::clone(&WORLD)
}

/// Load shapes from a GeoJSON file in place of the embedded catalog.
///
/// Line strings are taken as-is and polygons contribute their exterior
/// ring. Every shape is stroked as a closed ring.
pub fn load_geojson_shapes(path: &Path) -> Result<Arc<[Shape]>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("failed to parse GeoJSON in {}", path.display()))?;

    let mut shapes = Vec::new();
    process_geojson_lines(&geojson, |line| {
        if !line.is_empty() {
            shapes.push(line);
        }
    });

    tracing::info!(path = %path.display(), shapes = shapes.len(), "loaded GeoJSON shapes");
    Ok(shapes.into())
}

/// Process GeoJSON and extract line features
fn process_geojson_lines<F>(geojson: &GeoJson, mut add_line: F)
where
    F: FnMut(Shape),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    process_geometry_lines(geometry, &mut add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Geometry(geometry) => {
            process_geometry_lines(geometry, &mut add_line);
        }
    }
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(Shape),
{
    match &geometry.value {
        Value::LineString(coords) => add_line(to_shape(coords)),
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(to_shape(coords));
            }
        }
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(to_shape(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    add_line(to_shape(exterior));
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}

/// GeoJSON positions are `[lon, lat, ..]`; shorter positions are skipped
fn to_shape(coords: &[Vec<f64>]) -> Shape {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| Point::new(c[0], c[1]))
        .collect()
}
