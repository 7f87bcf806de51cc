//! GeoJSON FeatureCollection → typed [`Layer`].

use anyhow::{Context, Result};
use geojson::{JsonObject, JsonValue};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::models::{Feature, FromProperties, Layer, LayerGeometry};

/// Features are read one by one so a single bad geometry does not reject
/// the whole collection.
#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<JsonValue>,
    #[serde(default)]
    properties: Option<JsonObject>,
}

/// Load a layer from a GeoJSON file.
pub fn load_layer<P: FromProperties>(path: &Path) -> Result<Layer<P>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open GeoJSON file: {}", path.display()))?;
    let layer: Layer<P> = read_layer(BufReader::new(file))
        .with_context(|| format!("Failed to parse GeoJSON file: {}", path.display()))?;

    info!("Loaded {} features from {}", layer.len(), path.display());
    Ok(layer)
}

/// Parse a FeatureCollection from any reader.
///
/// Features whose geometry is absent, not areal or not valid GeoJSON are
/// kept without geometry.
pub fn read_layer<P: FromProperties, R: Read>(reader: R) -> Result<Layer<P>> {
    let raw: RawCollection = serde_json::from_reader(reader)?;
    let empty = JsonObject::new();

    let layer = raw
        .features
        .into_iter()
        .enumerate()
        .map(|(idx, feature)| {
            let geometry = feature.geometry.and_then(parse_geometry);
            if geometry.is_none() {
                debug!("Feature {} has no usable polygon geometry", idx);
            }
            let properties = P::from_properties(feature.properties.as_ref().unwrap_or(&empty));
            Feature::new(geometry, properties)
        })
        .collect();

    Ok(layer)
}

/// Convert a GeoJSON geometry object into a [`LayerGeometry`].
pub fn parse_geometry(value: JsonValue) -> Option<LayerGeometry> {
    if value.is_null() {
        return None;
    }
    let geometry = geojson::Geometry::from_json_value(value).ok()?;
    if !has_planar_positions(&geometry.value) {
        return None;
    }

    let geometry: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geometry {
        geo::Geometry::Polygon(p) => Some(LayerGeometry::Polygon(p)),
        geo::Geometry::MultiPolygon(mp) => Some(LayerGeometry::MultiPolygon(mp)),
        _ => None,
    }
}

/// Only areal geometries whose positions all carry at least `(lng, lat)`.
fn has_planar_positions(value: &geojson::Value) -> bool {
    let ring_ok = |ring: &Vec<geojson::Position>| ring.iter().all(|p| p.len() >= 2);
    match value {
        geojson::Value::Polygon(rings) => rings.iter().all(ring_ok),
        geojson::Value::MultiPolygon(polygons) => {
            polygons.iter().all(|rings| rings.iter().all(ring_ok))
        }
        _ => false,
    }
}
