//! Cross-reference of a zoning key against the activity rule table.

use tracing::debug;

use super::normalize::is_pdu_key;
use super::{ANP_KEY, NODATA_KEY};
use crate::models::{ActivityEntry, ActivitySet, RuleTable};

/// Cell marking an activity as permitted.
pub const ALLOWED: &str = "A";
/// Cell marking an activity as prohibited.
pub const PROHIBITED: &str = "P";

/// Does `zoning_key` have an activity catalog in `rules`?
pub fn has_catalog(zoning_key: &str, rules: &RuleTable) -> bool {
    !zoning_key.is_empty()
        && zoning_key != ANP_KEY
        && zoning_key != NODATA_KEY
        && !is_pdu_key(zoning_key)
        && rules.has_column(zoning_key)
}

/// Split the rule rows governing `zoning_key` into permitted and prohibited lists.
///
/// Returns `None` when the key has no catalog: `ANP`, `NODATA`, PDU keys, or a
/// key without its own column in the table. Rows keep table order and are
/// neither deduplicated nor sorted.
pub fn expand_activities(zoning_key: &str, rules: &RuleTable) -> Option<ActivitySet> {
    if !has_catalog(zoning_key, rules) {
        debug!("No activity catalog for zoning key '{}'", zoning_key);
        return None;
    }

    let mut set = ActivitySet::default();
    for rule in &rules.rows {
        let Some(cell) = rule.cell(zoning_key) else {
            continue;
        };
        match cell.trim().to_uppercase().as_str() {
            ALLOWED => set.allowed.push(ActivityEntry::from(rule)),
            PROHIBITED => set.prohibited.push(ActivityEntry::from(rule)),
            _ => {}
        }
    }

    debug!(
        "Zoning key '{}': {} allowed, {} prohibited",
        zoning_key,
        set.allowed.len(),
        set.prohibited.len()
    );
    Some(set)
}
