//! Activity rule table: one row per activity, one column per zoning key.

use hashbrown::HashMap;
use serde::Serialize;

/// Source field names of the descriptive columns.
pub const SECTOR_FIELD: &str = "Sector";
pub const GENERAL_FIELDS: &[&str] = &["Actividad general", "Actividad_general"];
pub const SPECIFIC_FIELDS: &[&str] = &["Actividad específica", "Actividad especifica"];

/// One row of the activity matrix.
///
/// `cells` is sparse: a zoning key without an entry does not govern the row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityRule {
    pub sector: String,
    pub general_activity: String,
    pub specific_activity: String,
    pub cells: HashMap<String, String>,
}

impl ActivityRule {
    pub fn new(sector: &str, general: &str, specific: &str) -> Self {
        Self {
            sector: sector.to_string(),
            general_activity: general.to_string(),
            specific_activity: specific.to_string(),
            cells: HashMap::new(),
        }
    }

    /// Builder-style helper to set a zoning key cell.
    pub fn with_cell(mut self, key: &str, value: &str) -> Self {
        self.cells.insert(key.to_string(), value.to_string());
        self
    }

    pub fn cell(&self, key: &str) -> Option<&str> {
        self.cells.get(key).map(String::as_str)
    }
}

/// Full rule table with its header row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTable {
    /// Zoning key columns, in header order.
    pub columns: Vec<String>,
    pub rows: Vec<ActivityRule>,
}

impl RuleTable {
    pub fn new(columns: Vec<String>, rows: Vec<ActivityRule>) -> Self {
        Self { columns, rows }
    }

    /// Build a table whose columns are every key used by `rows`, in first-seen order.
    pub fn from_rows(rows: Vec<ActivityRule>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            let mut keys: Vec<&String> = row.cells.keys().collect();
            keys.sort();
            for key in keys {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    /// Exact header match.
    pub fn has_column(&self, key: &str) -> bool {
        self.columns.iter().any(|c| c == key)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// An activity as reported to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub sector: String,
    pub general: String,
    pub specific: String,
}

impl From<&ActivityRule> for ActivityEntry {
    fn from(rule: &ActivityRule) -> Self {
        Self {
            sector: rule.sector.clone(),
            general: rule.general_activity.clone(),
            specific: rule.specific_activity.clone(),
        }
    }
}

/// Permitted and prohibited activities for one zoning key, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivitySet {
    pub allowed: Vec<ActivityEntry>,
    pub prohibited: Vec<ActivityEntry>,
}

/// Activities sharing a sector, split by general activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorGroup {
    pub sector: String,
    pub general: Vec<GeneralGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneralGroup {
    pub general: String,
    pub specific: Vec<String>,
}

/// Display grouping of allowed and prohibited activities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedActivities {
    pub allowed: Vec<SectorGroup>,
    pub prohibited: Vec<SectorGroup>,
}

/// Group by sector, then general activity, keeping first-appearance order.
pub fn group_entries(entries: &[ActivityEntry]) -> Vec<SectorGroup> {
    let mut groups: Vec<SectorGroup> = Vec::new();

    for entry in entries {
        let idx = match groups.iter().position(|g| g.sector == entry.sector) {
            Some(idx) => idx,
            None => {
                groups.push(SectorGroup {
                    sector: entry.sector.clone(),
                    general: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let sector = &mut groups[idx];

        match sector.general.iter_mut().find(|g| g.general == entry.general) {
            Some(general) => general.specific.push(entry.specific.clone()),
            None => sector.general.push(GeneralGroup {
                general: entry.general.clone(),
                specific: vec![entry.specific.clone()],
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sector: &str, general: &str, specific: &str) -> ActivityEntry {
        ActivityEntry {
            sector: sector.to_string(),
            general: general.to_string(),
            specific: specific.to_string(),
        }
    }

    #[test]
    fn test_has_column_is_exact() {
        let table = RuleTable::new(vec!["FC".to_string(), "AE".to_string()], vec![]);
        assert!(table.has_column("FC"));
        assert!(!table.has_column("fc"));
        assert!(!table.has_column("F"));
    }

    #[test]
    fn test_from_rows_collects_columns() {
        let rows = vec![
            ActivityRule::new("A", "B", "C").with_cell("FC", "P").with_cell("AE", "A"),
            ActivityRule::new("A", "B", "D").with_cell("AF", ""),
        ];
        let table = RuleTable::from_rows(rows);
        assert_eq!(table.columns, vec!["AE", "FC", "AF"]);
        assert_eq!(table.rows[0].cell("FC"), Some("P"));
        assert_eq!(table.rows[1].cell("FC"), None);
    }

    #[test]
    fn test_grouping_preserves_order() {
        let grouped = group_entries(&[
            entry("Agrícola", "Siembra", "Maíz"),
            entry("Pecuario", "Cría", "Ovinos"),
            entry("Agrícola", "Siembra", "Frijol"),
            entry("Agrícola", "Cosecha", "Manual"),
        ]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].sector, "Agrícola");
        assert_eq!(grouped[0].general[0].specific, vec!["Maíz", "Frijol"]);
        assert_eq!(grouped[0].general[1].general, "Cosecha");
        assert_eq!(grouped[1].sector, "Pecuario");
        assert!(group_entries(&[]).is_empty());
    }
}
