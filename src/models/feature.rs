//! Layer features and the typed property records of each dataset.

use geo::{MultiPolygon, Polygon};
use serde::Serialize;
use serde_json::{Map, Value};

/// Areal geometry of a layer feature.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

/// A single feature of a layer.
///
/// Geometry is optional: a feature whose source geometry was absent or not
/// areal is kept but never matches a point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature<P> {
    #[serde(skip)]
    pub geometry: Option<LayerGeometry>,
    pub properties: P,
}

impl<P> Feature<P> {
    pub fn new(geometry: Option<LayerGeometry>, properties: P) -> Self {
        Self {
            geometry,
            properties,
        }
    }
}

/// Ordered collection of features sharing one semantic role.
///
/// Order is significant: later features are drawn on top and win overlaps.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<P> {
    features: Vec<Feature<P>>,
}

impl<P> Layer<P> {
    pub fn new(features: Vec<Feature<P>>) -> Self {
        Self { features }
    }

    pub fn empty() -> Self {
        Self {
            features: Vec::new(),
        }
    }

    pub fn features(&self) -> &[Feature<P>] {
        &self.features
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature<P>> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl<P> Default for Layer<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<P> FromIterator<Feature<P>> for Layer<P> {
    fn from_iter<I: IntoIterator<Item = Feature<P>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Typed view over a GeoJSON `properties` object.
///
/// Source datasets disagree on field spelling, so each record lists the
/// accepted keys in lookup order. Missing fields stay `None`.
pub trait FromProperties: Sized {
    fn from_properties(props: &Map<String, Value>) -> Self;
}

/// First non-empty value among `keys`, read as text.
///
/// Numbers are accepted as well, since identifiers and surfaces are exported
/// as numbers by some sources and as strings by others.
pub(crate) fn text(props: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match props.get(*key)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// City boundary and neighbouring state polygons.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoundaryProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl FromProperties for BoundaryProps {
    fn from_properties(props: &Map<String, Value>) -> Self {
        Self {
            name: text(props, &["NOMBRE", "NOMGEO", "nombre", "NOM_ENT"]),
        }
    }
}

/// Municipality (alcaldía) polygons.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MunicipalityProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl FromProperties for MunicipalityProps {
    fn from_properties(props: &Map<String, Value>) -> Self {
        Self {
            name: text(props, &["NOMGEO", "NOMBRE", "alcaldia", "NOM_MUN", "nomgeo"]),
        }
    }
}

/// Conservation soil polygons. Only the geometry is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConservationProps {}

impl FromProperties for ConservationProps {
    fn from_properties(_props: &Map<String, Value>) -> Self {
        Self {}
    }
}

/// Protected natural area (ANP) polygons.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedAreaProps {
    pub id: Option<String>,
    pub name: Option<String>,
    pub decree_type: Option<String>,
    pub category: Option<String>,
    pub decree_date: Option<String>,
    pub surface: Option<String>,
}

impl FromProperties for ProtectedAreaProps {
    fn from_properties(props: &Map<String, Value>) -> Self {
        Self {
            id: text(props, &["ANP_ID", "ID_ANP", "id"]),
            name: text(props, &["NOMBRE", "nombre", "NOM_ANP"]),
            decree_type: text(props, &["TIPO_DECRETO", "DECRETO"]),
            category: text(props, &["CATEGORIA_PROTECCION", "CATEGORIA", "CAT_MANEJO"]),
            decree_date: text(props, &["FECHA_DECRETO", "FECHA"]),
            surface: text(props, &["SUPERFICIE", "SUP_DEC", "SUPERFICIE_HA"]),
        }
    }
}

/// PGOEDF zoning polygons.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ZoningProps {
    /// Raw zoning code, possibly a generic marker such as `PDU`.
    pub clave: Option<String>,
    /// Descriptive category text.
    pub pgoedf: Option<String>,
}

impl FromProperties for ZoningProps {
    fn from_properties(props: &Map<String, Value>) -> Self {
        Self {
            clave: text(props, &["CLAVE", "clave"]),
            pgoedf: text(props, &["PGOEDF", "pgoedf", "DESCRIPCION"]),
        }
    }
}

/// Zoning inside a protected area (management program zones).
///
/// The full source record is retained so the detail panel can show it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InternalZoningProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FromProperties for InternalZoningProps {
    fn from_properties(props: &Map<String, Value>) -> Self {
        let zone_keys = ["ZONIFICACION", "ZONA", "zonificacion"];
        let name_keys = ["NOMBRE", "nombre"];
        let extra = props
            .iter()
            .filter(|(k, _)| !zone_keys.contains(&k.as_str()) && !name_keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            zone: text(props, &zone_keys),
            name: text(props, &name_keys),
            extra,
        }
    }
}
