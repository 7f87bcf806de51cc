//! Pre-loaded datasets consumed by the resolver.

use crate::models::{
    BoundaryProps, ConservationProps, InternalZoningProps, Layer, MunicipalityProps,
    ProtectedAreaProps, RuleTable, ZoningProps,
};

/// A neighbouring state polygon layer with its display label.
#[derive(Debug, Clone)]
pub struct NeighborLayer {
    pub label: String,
    pub layer: Layer<BoundaryProps>,
}

/// Every layer and the rule table used by one classification.
///
/// Read-only once built; share it between threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct DatasetBundle {
    pub city_boundary: Layer<BoundaryProps>,
    /// Probed in order for points outside the city.
    pub neighbors: Vec<NeighborLayer>,
    pub municipalities: Layer<MunicipalityProps>,
    pub conservation_soil: Layer<ConservationProps>,
    pub protected_areas: Layer<ProtectedAreaProps>,
    pub zoning: Layer<ZoningProps>,
    pub internal_zoning: Option<Layer<InternalZoningProps>>,
    pub rules: RuleTable,
}

impl DatasetBundle {
    /// Total number of features across all layers.
    pub fn feature_count(&self) -> usize {
        self.city_boundary.len()
            + self.neighbors.iter().map(|n| n.layer.len()).sum::<usize>()
            + self.municipalities.len()
            + self.conservation_soil.len()
            + self.protected_areas.len()
            + self.zoning.len()
            + self.internal_zoning.as_ref().map_or(0, Layer::len)
    }
}
