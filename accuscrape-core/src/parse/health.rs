//! Health/activity index parser.
//!
//! These pages embed their data as a script-level JSON array; no structural
//! HTML parsing is involved.

use tracing::warn;

use crate::model::HealthActivityItem;
use crate::parse::extract_script_array;

const INDEX_LIST_VAR: &str = "indexListData";

/// Extract and deserialize the embedded `indexListData` array. Returns an
/// empty vec when the variable is absent or its JSON is malformed.
pub fn parse_health_activities(html: &str) -> Vec<HealthActivityItem> {
    let Some(json) = extract_script_array(html, INDEX_LIST_VAR) else {
        return Vec::new();
    };

    match serde_json::from_str(&json) {
        Ok(items) => items,
        Err(err) => {
            warn!(error = %err, "embedded index list JSON failed to deserialize");
            Vec::new()
        }
    }
}
