//! Zoning keys and the activity rules attached to them.

mod activities;
mod normalize;

pub use activities::{expand_activities, has_catalog, ALLOWED, PROHIBITED};
pub use normalize::{
    is_pdu_key, normalize_key, GENERIC_MARKERS, PDU_EQUIPMENT, PDU_PARTIAL, PDU_RURAL, PDU_URBAN,
};

/// Key used for every point inside a protected natural area.
pub const ANP_KEY: &str = "ANP";

/// Key for conservation soil not covered by any zoning polygon.
pub const NODATA_KEY: &str = "NODATA";
