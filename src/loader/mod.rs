//! Local dataset loading.
//!
//! Reads GeoJSON layers and the CSV rule table from disk and assembles a
//! [`DatasetBundle`]. Datasets that are not configured, or configured but
//! absent on disk, load as empty so the resolver can degrade gracefully.

pub mod layer;
pub mod rules;

use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

use crate::config::DatasetPaths;
use crate::models::{FromProperties, Layer, RuleTable};
use crate::resolver::{DatasetBundle, NeighborLayer};

pub use layer::{load_layer, read_layer};
pub use rules::{load_rules, read_rules};

/// Load every configured dataset.
pub fn load_bundle(paths: &DatasetPaths) -> Result<DatasetBundle> {
    let neighbors = paths
        .neighbors
        .iter()
        .map(|neighbor| {
            Ok(NeighborLayer {
                label: neighbor.label.clone(),
                layer: optional_layer(Some(neighbor.path.as_path()), &neighbor.label)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let internal_zoning = match paths.internal_zoning.as_deref() {
        Some(path) if path.exists() => Some(load_layer(path)?),
        Some(path) => {
            warn!("Internal zoning dataset not found: {}", path.display());
            None
        }
        None => None,
    };

    let rules = match paths.rules.as_deref() {
        Some(path) if path.exists() => load_rules(path)?,
        Some(path) => {
            warn!("Rules dataset not found: {}", path.display());
            RuleTable::default()
        }
        None => RuleTable::default(),
    };

    let bundle = DatasetBundle {
        city_boundary: optional_layer(paths.city_boundary.as_deref(), "city boundary")?,
        neighbors,
        municipalities: optional_layer(paths.municipalities.as_deref(), "municipalities")?,
        conservation_soil: optional_layer(paths.conservation_soil.as_deref(), "conservation soil")?,
        protected_areas: optional_layer(paths.protected_areas.as_deref(), "protected areas")?,
        zoning: optional_layer(paths.zoning.as_deref(), "zoning")?,
        internal_zoning,
        rules,
    };

    info!(
        "Dataset bundle ready: {} features, {} activity rules",
        bundle.feature_count(),
        bundle.rules.len()
    );
    Ok(bundle)
}

fn optional_layer<P: FromProperties>(path: Option<&Path>, role: &str) -> Result<Layer<P>> {
    match path {
        Some(path) if path.exists() => load_layer(path),
        Some(path) => {
            warn!("{} dataset not found: {}", role, path.display());
            Ok(Layer::empty())
        }
        None => {
            warn!("No {} dataset configured", role);
            Ok(Layer::empty())
        }
    }
}
