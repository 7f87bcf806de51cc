//! The classification result returned for each query.

use serde::Serialize;

use super::feature::{Feature, InternalZoningProps, ProtectedAreaProps};
use super::rules::{group_entries, ActivityEntry, GroupedActivities};

/// Terminal outcome of a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SoilStatus {
    /// Outside the city boundary.
    OutsideCdmx,
    /// Conservation soil layer unavailable.
    NoData,
    UrbanSoil,
    ConservationSoil,
}

impl std::fmt::Display for SoilStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoilStatus::OutsideCdmx => write!(f, "OUTSIDE_CDMX"),
            SoilStatus::NoData => write!(f, "NO_DATA"),
            SoilStatus::UrbanSoil => write!(f, "URBAN_SOIL"),
            SoilStatus::ConservationSoil => write!(f, "CONSERVATION_SOIL"),
        }
    }
}

/// Zoning classification of one coordinate.
///
/// Built once by the resolver and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub status: SoilStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_unit: Option<String>,

    pub is_protected_area: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected_area_info: Option<ProtectedAreaProps>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoning_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoning_name: Option<String>,

    pub has_internal_zoning: bool,

    /// Internal ANP zoning, shown as secondary detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_zoning_feature: Option<Feature<InternalZoningProps>>,

    pub allowed_activities: Vec<ActivityEntry>,

    pub prohibited_activities: Vec<ActivityEntry>,

    pub no_activities_catalog: bool,

    /// Neighbouring state hint when outside the city.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outside_context: Option<String>,
}

impl Classification {
    /// Empty result in the given state; the resolver fills in the rest.
    pub(crate) fn with_status(status: SoilStatus) -> Self {
        Self {
            status,
            administrative_unit: None,
            is_protected_area: false,
            protected_area_info: None,
            zoning_key: None,
            zoning_name: None,
            has_internal_zoning: false,
            internal_zoning_feature: None,
            allowed_activities: Vec::new(),
            prohibited_activities: Vec::new(),
            no_activities_catalog: false,
            outside_context: None,
        }
    }

    /// Activities grouped by sector and general activity, for display.
    pub fn grouped_activities(&self) -> GroupedActivities {
        GroupedActivities {
            allowed: group_entries(&self.allowed_activities),
            prohibited: group_entries(&self.prohibited_activities),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&SoilStatus::ConservationSoil).unwrap();
        assert_eq!(json, "\"CONSERVATION_SOIL\"");
        assert_eq!(SoilStatus::OutsideCdmx.to_string(), "OUTSIDE_CDMX");
    }

    #[test]
    fn test_result_field_names() {
        let mut result = Classification::with_status(SoilStatus::UrbanSoil);
        result.zoning_name = Some("Suelo Urbano".to_string());
        result.no_activities_catalog = true;

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "URBAN_SOIL");
        assert_eq!(value["zoningName"], "Suelo Urbano");
        assert_eq!(value["noActivitiesCatalog"], true);
        assert!(value.get("zoningKey").is_none());
        assert!(value["allowedActivities"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_grouped_activities() {
        let entry = |sector: &str, specific: &str| ActivityEntry {
            sector: sector.to_string(),
            general: "General".to_string(),
            specific: specific.to_string(),
        };
        let mut result = Classification::with_status(SoilStatus::ConservationSoil);
        result.prohibited_activities = vec![entry("Forestal", "Tala"), entry("Forestal", "Quema")];

        let grouped = result.grouped_activities();
        assert!(grouped.allowed.is_empty());
        assert_eq!(grouped.prohibited.len(), 1);
        assert_eq!(grouped.prohibited[0].general[0].specific, vec!["Tala", "Quema"]);
    }
}
