//! Zoning classification of a single coordinate.

use geo::Coord;
use thiserror::Error;
use tracing::debug;

use super::DatasetBundle;
use crate::config::ResolverConfig;
use crate::models::{Classification, Coordinate, CoordinateError, SoilStatus};
use crate::pip::{any_contains, find_feature};
use crate::zoning::{expand_activities, is_pdu_key, normalize_key, ANP_KEY, NODATA_KEY};

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),
}

/// Zoning fields derived for a point inside the city.
struct Zoning {
    key: Option<String>,
    name: Option<String>,
    /// The zoning category has no activity table at all.
    no_catalog: bool,
}

/// Classifies coordinates against a [`DatasetBundle`].
///
/// Holds only immutable configuration; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Validate a raw `lat`/`lng` pair, then classify it.
    pub fn classify_raw(
        &self,
        lat: f64,
        lng: f64,
        bundle: &DatasetBundle,
    ) -> Result<Classification, ClassifyError> {
        let coordinate = Coordinate::new(lat, lng)?;
        Ok(self.classify(coordinate, bundle))
    }

    /// Classify a coordinate.
    ///
    /// Missing layers and misses degrade to partial results; this never fails.
    pub fn classify(&self, coordinate: Coordinate, bundle: &DatasetBundle) -> Classification {
        let point = coordinate.point();
        let labels = &self.config.labels;

        if !bundle.city_boundary.is_empty() && !any_contains(point, &bundle.city_boundary) {
            let mut result = Classification::with_status(SoilStatus::OutsideCdmx);
            result.outside_context = bundle
                .neighbors
                .iter()
                .find(|neighbor| any_contains(point, &neighbor.layer))
                .map(|neighbor| neighbor.label.clone());
            result.no_activities_catalog = true;
            debug!(
                "({}, {}) outside city boundary, context {:?}",
                coordinate.lat(),
                coordinate.lng(),
                result.outside_context
            );
            return result;
        }

        let administrative_unit = find_feature(point, &bundle.municipalities).map(|feature| {
            feature
                .properties
                .name
                .clone()
                .unwrap_or_else(|| labels.city.clone())
        });

        if bundle.conservation_soil.is_empty() {
            debug!("Conservation soil layer unavailable");
            let mut result = Classification::with_status(SoilStatus::NoData);
            result.administrative_unit = administrative_unit;
            result.no_activities_catalog = true;
            return result;
        }

        let status = if find_feature(point, &bundle.conservation_soil).is_some() {
            SoilStatus::ConservationSoil
        } else {
            SoilStatus::UrbanSoil
        };
        debug!(
            "({}, {}) soil: {}",
            coordinate.lat(),
            coordinate.lng(),
            status
        );

        let mut result = Classification::with_status(status);
        result.administrative_unit = administrative_unit;

        if let Some(anp) = find_feature(point, &bundle.protected_areas) {
            debug!("Inside protected area {:?}", anp.properties.name);
            result.is_protected_area = true;
            result.protected_area_info = Some(anp.properties.clone());
        }

        let zoning = self.resolve_zoning(point, status, result.is_protected_area, bundle);
        result.zoning_key = zoning.key;
        result.zoning_name = zoning.name;

        if result.is_protected_area {
            if let Some(layer) = &bundle.internal_zoning {
                if let Some(feature) = find_feature(point, layer) {
                    result.has_internal_zoning = true;
                    result.internal_zoning_feature = Some(feature.clone());
                }
            }
        }

        let activities = match &result.zoning_key {
            Some(key) if !zoning.no_catalog => expand_activities(key, &bundle.rules),
            _ => None,
        };
        match activities {
            Some(set) => {
                result.allowed_activities = set.allowed;
                result.prohibited_activities = set.prohibited;
            }
            None => result.no_activities_catalog = true,
        }

        result
    }

    fn resolve_zoning(
        &self,
        point: Coord<f64>,
        status: SoilStatus,
        is_protected_area: bool,
        bundle: &DatasetBundle,
    ) -> Zoning {
        let labels = &self.config.labels;

        if is_protected_area {
            return Zoning {
                key: Some(ANP_KEY.to_string()),
                name: Some(labels.protected_area.clone()),
                no_catalog: true,
            };
        }

        if status == SoilStatus::UrbanSoil {
            return Zoning {
                key: None,
                name: Some(labels.urban_soil.clone()),
                no_catalog: true,
            };
        }

        let Some(feature) = find_feature(point, &bundle.zoning) else {
            return Zoning {
                key: Some(NODATA_KEY.to_string()),
                name: Some(labels.no_data.clone()),
                no_catalog: true,
            };
        };

        let props = &feature.properties;
        let key = props
            .clave
            .as_deref()
            .map(|clave| normalize_key(clave, props.pgoedf.as_deref()))
            .filter(|key| !key.is_empty());
        debug!("Zoning polygon {:?} -> key {:?}", props.clave, key);

        let name = props
            .pgoedf
            .clone()
            .or_else(|| key.clone())
            .or_else(|| Some(labels.no_data.clone()));
        let no_catalog = key.as_deref().map_or(true, is_pdu_key);

        Zoning {
            key,
            name,
            no_catalog,
        }
    }
}

/// Classify with the default labels.
pub fn classify(coordinate: Coordinate, bundle: &DatasetBundle) -> Classification {
    Resolver::default().classify(coordinate, bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Labels;
    use crate::models::{
        ActivityRule, BoundaryProps, ConservationProps, Feature, InternalZoningProps, Layer,
        LayerGeometry, MunicipalityProps, ProtectedAreaProps, RuleTable, ZoningProps,
    };
    use crate::resolver::NeighborLayer;
    use geo::{LineString, Polygon};

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<LayerGeometry> {
        let ring = LineString::new(vec![
            Coord { x: min_x, y: min_y },
            Coord { x: max_x, y: min_y },
            Coord { x: max_x, y: max_y },
            Coord { x: min_x, y: max_y },
            Coord { x: min_x, y: min_y },
        ]);
        Some(LayerGeometry::Polygon(Polygon::new(ring, vec![])))
    }

    fn boundary(geometry: Option<LayerGeometry>, name: &str) -> Feature<BoundaryProps> {
        Feature::new(
            geometry,
            BoundaryProps {
                name: Some(name.to_string()),
            },
        )
    }

    fn municipality(geometry: Option<LayerGeometry>, name: Option<&str>) -> Feature<MunicipalityProps> {
        Feature::new(
            geometry,
            MunicipalityProps {
                name: name.map(str::to_string),
            },
        )
    }

    fn anp(geometry: Option<LayerGeometry>, name: &str) -> Feature<ProtectedAreaProps> {
        Feature::new(
            geometry,
            ProtectedAreaProps {
                id: Some("7".to_string()),
                name: Some(name.to_string()),
                category: Some("Parque Nacional".to_string()),
                ..Default::default()
            },
        )
    }

    fn zone(geometry: Option<LayerGeometry>, clave: &str, pgoedf: &str) -> Feature<ZoningProps> {
        Feature::new(
            geometry,
            ZoningProps {
                clave: Some(clave.to_string()),
                pgoedf: Some(pgoedf.to_string()),
            },
        )
    }

    /// City spans x 0..100, y 0..80; the southern half (y < 40) is conservation soil.
    fn bundle() -> DatasetBundle {
        let internal = Feature::new(
            rect(10.0, 10.0, 15.0, 15.0),
            InternalZoningProps {
                zone: Some("Uso Público".to_string()),
                ..Default::default()
            },
        );

        DatasetBundle {
            city_boundary: Layer::new(vec![boundary(rect(0.0, 0.0, 100.0, 80.0), "CDMX")]),
            neighbors: vec![
                NeighborLayer {
                    label: "Edo. Méx".to_string(),
                    layer: Layer::new(vec![boundary(rect(-50.0, 0.0, 0.0, 80.0), "México")]),
                },
                NeighborLayer {
                    label: "Morelos".to_string(),
                    layer: Layer::new(vec![boundary(rect(0.0, -40.0, 100.0, 0.0), "Morelos")]),
                },
            ],
            municipalities: Layer::new(vec![
                municipality(rect(0.0, 0.0, 50.0, 80.0), Some("Tlalpan")),
                municipality(rect(50.0, 0.0, 100.0, 80.0), Some("Milpa Alta")),
                municipality(rect(90.0, 70.0, 100.0, 80.0), None),
            ]),
            conservation_soil: Layer::new(vec![Feature::new(
                rect(0.0, 0.0, 100.0, 40.0),
                ConservationProps {},
            )]),
            protected_areas: Layer::new(vec![
                anp(rect(10.0, 10.0, 20.0, 20.0), "Cumbres del Ajusco"),
                anp(rect(60.0, 60.0, 70.0, 70.0), "Bosque de Tlalpan"),
            ]),
            zoning: Layer::new(vec![
                zone(rect(0.0, 0.0, 30.0, 40.0), "AE", "Agroecológica"),
                zone(rect(30.0, 0.0, 40.0, 40.0), "FC", "Forestal de Conservación"),
                zone(rect(40.0, 0.0, 50.0, 40.0), "PDU", "Programa Parcial de Desarrollo Urbano"),
            ]),
            internal_zoning: Some(Layer::new(vec![internal])),
            rules: RuleTable::from_rows(vec![
                ActivityRule::new("Agrícola", "Siembra", "Maíz")
                    .with_cell("FC", "P")
                    .with_cell("AE", "A"),
                ActivityRule::new("Turismo", "Campismo", "Acampar").with_cell("FC", "A"),
            ]),
        }
    }

    fn at(x: f64, y: f64) -> Coordinate {
        Coordinate::new(y, x).unwrap()
    }

    #[test]
    fn test_outside_with_neighbor_context() {
        let result = classify(at(-10.0, 40.0), &bundle());
        assert_eq!(result.status, SoilStatus::OutsideCdmx);
        assert_eq!(result.outside_context.as_deref(), Some("Edo. Méx"));
        assert!(result.administrative_unit.is_none());
        assert!(result.zoning_key.is_none());

        let result = classify(at(50.0, -10.0), &bundle());
        assert_eq!(result.outside_context.as_deref(), Some("Morelos"));

        let result = classify(at(150.0, 40.0), &bundle());
        assert_eq!(result.status, SoilStatus::OutsideCdmx);
        assert!(result.outside_context.is_none());
    }

    #[test]
    fn test_conservation_fc_with_activities() {
        let result = classify(at(35.0, 20.0), &bundle());
        assert_eq!(result.status, SoilStatus::ConservationSoil);
        assert_eq!(result.administrative_unit.as_deref(), Some("Tlalpan"));
        assert_eq!(result.zoning_key.as_deref(), Some("FC"));
        assert_eq!(result.zoning_name.as_deref(), Some("Forestal de Conservación"));
        assert!(!result.is_protected_area);
        assert!(!result.no_activities_catalog);
        assert_eq!(result.prohibited_activities.len(), 1);
        assert_eq!(result.prohibited_activities[0].specific, "Maíz");
        assert_eq!(result.allowed_activities.len(), 1);
        assert_eq!(result.allowed_activities[0].specific, "Acampar");
    }

    #[test]
    fn test_protected_area_overrides_zoning() {
        let result = classify(at(17.0, 17.0), &bundle());
        assert_eq!(result.status, SoilStatus::ConservationSoil);
        assert!(result.is_protected_area);
        assert_eq!(result.zoning_key.as_deref(), Some("ANP"));
        assert_eq!(result.zoning_name.as_deref(), Some("ÁREA NATURAL PROTEGIDA"));
        assert!(result.no_activities_catalog);
        assert!(result.allowed_activities.is_empty());
        assert!(result.prohibited_activities.is_empty());
        assert!(!result.has_internal_zoning);

        let info = result.protected_area_info.unwrap();
        assert_eq!(info.name.as_deref(), Some("Cumbres del Ajusco"));
        assert_eq!(info.category.as_deref(), Some("Parque Nacional"));
    }

    #[test]
    fn test_internal_zoning_is_additive() {
        let result = classify(at(12.0, 12.0), &bundle());
        assert!(result.has_internal_zoning);
        assert_eq!(result.zoning_name.as_deref(), Some("ÁREA NATURAL PROTEGIDA"));
        let internal = result.internal_zoning_feature.unwrap();
        assert_eq!(internal.properties.zone.as_deref(), Some("Uso Público"));
    }

    #[test]
    fn test_internal_zoning_ignored_outside_protected_area() {
        let mut data = bundle();
        data.internal_zoning = Some(Layer::new(vec![Feature::new(
            rect(30.0, 0.0, 40.0, 40.0),
            InternalZoningProps::default(),
        )]));
        let result = classify(at(35.0, 20.0), &data);
        assert!(!result.has_internal_zoning);
        assert!(result.internal_zoning_feature.is_none());
    }

    #[test]
    fn test_pdu_has_no_catalog() {
        let result = classify(at(45.0, 20.0), &bundle());
        assert_eq!(result.zoning_key.as_deref(), Some("PDU_PP"));
        assert_eq!(
            result.zoning_name.as_deref(),
            Some("Programa Parcial de Desarrollo Urbano")
        );
        assert!(result.no_activities_catalog);
        assert!(result.allowed_activities.is_empty());
    }

    #[test]
    fn test_conservation_gap_is_nodata() {
        let result = classify(at(70.0, 20.0), &bundle());
        assert_eq!(result.status, SoilStatus::ConservationSoil);
        assert_eq!(result.administrative_unit.as_deref(), Some("Milpa Alta"));
        assert_eq!(result.zoning_key.as_deref(), Some("NODATA"));
        assert_eq!(result.zoning_name.as_deref(), Some("Información no disponible"));
        assert!(result.no_activities_catalog);
    }

    #[test]
    fn test_urban_soil() {
        let result = classify(at(30.0, 60.0), &bundle());
        assert_eq!(result.status, SoilStatus::UrbanSoil);
        assert!(result.zoning_key.is_none());
        assert_eq!(result.zoning_name.as_deref(), Some("Suelo Urbano"));
        assert!(result.no_activities_catalog);
        assert!(!result.is_protected_area);
    }

    #[test]
    fn test_urban_protected_area() {
        let result = classify(at(65.0, 65.0), &bundle());
        assert_eq!(result.status, SoilStatus::UrbanSoil);
        assert!(result.is_protected_area);
        assert_eq!(result.zoning_key.as_deref(), Some("ANP"));
        assert_eq!(result.zoning_name.as_deref(), Some("ÁREA NATURAL PROTEGIDA"));
        assert!(result.no_activities_catalog);
    }

    #[test]
    fn test_unnamed_municipality_uses_city_label() {
        let result = classify(at(95.0, 75.0), &bundle());
        assert_eq!(result.administrative_unit.as_deref(), Some("Ciudad de México"));
    }

    #[test]
    fn test_missing_conservation_layer_is_no_data() {
        let mut data = bundle();
        data.conservation_soil = Layer::empty();

        for (x, y) in [(35.0, 20.0), (17.0, 17.0), (30.0, 60.0)] {
            let result = classify(at(x, y), &data);
            assert_eq!(result.status, SoilStatus::NoData);
            assert!(result.zoning_key.is_none());
            assert!(!result.is_protected_area);
            assert!(result.no_activities_catalog);
        }
        assert_eq!(
            classify(at(35.0, 20.0), &data).administrative_unit.as_deref(),
            Some("Tlalpan")
        );
        assert_eq!(
            classify(at(-10.0, 40.0), &data).status,
            SoilStatus::OutsideCdmx
        );
    }

    #[test]
    fn test_missing_boundary_layer_skips_outside_check() {
        let mut data = bundle();
        data.city_boundary = Layer::empty();
        let result = classify(at(-10.0, 40.0), &data);
        assert_eq!(result.status, SoilStatus::UrbanSoil);
        assert!(result.outside_context.is_none());
    }

    #[test]
    fn test_key_without_rule_column() {
        let mut data = bundle();
        data.rules = RuleTable::default();
        let result = classify(at(35.0, 20.0), &data);
        assert_eq!(result.zoning_key.as_deref(), Some("FC"));
        assert!(result.no_activities_catalog);
    }

    #[test]
    fn test_zoning_polygon_without_clave() {
        let mut data = bundle();
        data.zoning = Layer::new(vec![Feature::new(
            rect(0.0, 0.0, 100.0, 40.0),
            ZoningProps {
                clave: None,
                pgoedf: Some("Sin clave".to_string()),
            },
        )]);
        let result = classify(at(70.0, 20.0), &data);
        assert!(result.zoning_key.is_none());
        assert_eq!(result.zoning_name.as_deref(), Some("Sin clave"));
        assert!(result.no_activities_catalog);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let data = bundle();
        for (x, y) in [(35.0, 20.0), (12.0, 12.0), (-10.0, 40.0), (65.0, 65.0)] {
            assert_eq!(classify(at(x, y), &data), classify(at(x, y), &data));
        }
    }

    #[test]
    fn test_invalid_coordinate_rejected() {
        let resolver = Resolver::default();
        let err = resolver.classify_raw(95.0, 10.0, &bundle()).unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::InvalidCoordinate(CoordinateError::LatitudeOutOfRange(_))
        ));
        assert!(resolver.classify_raw(f64::NAN, 10.0, &bundle()).is_err());
    }

    #[test]
    fn test_custom_labels() {
        let resolver = Resolver::new(ResolverConfig {
            labels: Labels {
                urban_soil: "Urbano".to_string(),
                ..Labels::default()
            },
        });
        let result = resolver.classify(at(30.0, 60.0), &bundle());
        assert_eq!(result.zoning_name.as_deref(), Some("Urbano"));
    }
}
