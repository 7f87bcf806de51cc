//! Classification resolver.
//!
//! Combines containment checks over the city boundary, conservation soil,
//! protected area and zoning layers into a single [`Classification`], then
//! attaches the permitted and prohibited activities of the zoning key.
//!
//! [`Classification`]: crate::models::Classification

mod bundle;
mod service;

pub use bundle::{DatasetBundle, NeighborLayer};
pub use service::{classify, ClassifyError, Resolver};
