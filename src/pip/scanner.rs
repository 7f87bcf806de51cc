//! Topmost-feature lookup within a single layer.

use geo::Coord;
use tracing::{debug, Level};

use super::geometry::contains;
use crate::models::{Feature, Layer};

/// Does this feature's geometry contain `point`? Features without geometry never match.
pub fn feature_contains<P>(point: Coord<f64>, feature: &Feature<P>) -> bool {
    feature
        .geometry
        .as_ref()
        .is_some_and(|geometry| contains(point, geometry))
}

/// Find the feature of `layer` that contains `point`.
///
/// The layer is scanned from last to first, so when features overlap the one
/// added later wins.
pub fn find_feature<P>(point: Coord<f64>, layer: &Layer<P>) -> Option<&Feature<P>> {
    let found = layer
        .iter()
        .rev()
        .find(|feature| feature_contains(point, feature));

    if found.is_some() && tracing::enabled!(Level::DEBUG) {
        let matches = layer
            .iter()
            .filter(|feature| feature_contains(point, feature))
            .count();
        if matches > 1 {
            debug!(
                "{} overlapping features contain ({}, {}); using the topmost",
                matches, point.x, point.y
            );
        }
    }

    found
}

/// True if any feature of `layer` contains `point`.
pub fn any_contains<P>(point: Coord<f64>, layer: &Layer<P>) -> bool {
    layer.iter().any(|feature| feature_contains(point, feature))
}
