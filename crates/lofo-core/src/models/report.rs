use chrono::{Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::COMPLETED_AT_FORMAT;

/// Whether a report describes a lost item or a found one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Lost,
    Found,
}

/// A lost-or-found item report, as stored remotely and mirrored locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReport {
    pub id: String,
    /// Owner's user id
    pub user_id: String,
    /// Owner's display name at the time the report was filed
    #[serde(default)]
    pub user_name: String,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    pub item_name: String,
    pub category: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub whatsapp_number: String,
    /// Creation timestamp, epoch milliseconds
    pub created_at: i64,
    /// Forced true when the report enters the completed-history cache
    #[serde(default)]
    pub completed: bool,
}

/// A resolved report preserved in local history after it leaves the
/// remote-visible set.
///
/// Persisted flat: the original item's fields plus the two completion
/// fields form one object in the slot array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedReport {
    #[serde(flatten)]
    pub item: ItemReport,
    /// Completion timestamp, epoch milliseconds, stamped by the cache at
    /// insertion time (never by the caller)
    pub completed_at: i64,
    /// Display string derived from `completed_at` at insertion time and
    /// cached, not recomputed on read
    pub completed_at_formatted: String,
}

impl CompletedReport {
    /// Wrap an item at its completion moment, stamping the timestamp and
    /// the cached display string. The completion flag is forced on.
    pub fn new(mut item: ItemReport, completed_at: i64) -> Self {
        item.completed = true;
        let completed_at_formatted = format_completed_at(completed_at);
        Self {
            item,
            completed_at,
            completed_at_formatted,
        }
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }
}

/// Format an epoch-millisecond timestamp for display in the history list.
pub fn format_completed_at(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt
            .with_timezone(&Local)
            .format(COMPLETED_AT_FORMAT)
            .to_string(),
        None => String::new(),
    }
}
