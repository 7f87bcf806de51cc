//! Tlalli - point-in-polygon zoning resolver for Mexico City land use.
//!
//! Given a coordinate and a bundle of pre-loaded layers, determines the soil
//! classification (urban or conservation), protected area status, zoning key
//! and the activities permitted or prohibited there. The library is shared by
//! the `query` server and the `classify` CLI.

pub mod config;
pub mod loader;
pub mod models;
pub mod pip;
pub mod resolver;
pub mod zoning;

pub use config::{AppConfig, Labels, ResolverConfig};
pub use models::{Classification, Coordinate, SoilStatus};
pub use resolver::{classify, ClassifyError, DatasetBundle, Resolver};
