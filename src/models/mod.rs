//! Core data models for the zoning resolver.

pub mod classification;
pub mod coordinate;
pub mod feature;
pub mod rules;

pub use classification::{Classification, SoilStatus};
pub use coordinate::{Coordinate, CoordinateError, RawCoordinate};
pub use feature::{
    BoundaryProps, ConservationProps, Feature, FromProperties, InternalZoningProps, Layer,
    LayerGeometry, MunicipalityProps, ProtectedAreaProps, ZoningProps,
};
pub use rules::{ActivityEntry, ActivityRule, ActivitySet, GroupedActivities, RuleTable};
