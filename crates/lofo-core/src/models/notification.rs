use serde::{Deserialize, Serialize};

/// Category tag carried by delivery payloads. Drives navigation in the UI,
/// never ownership decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    General,
    /// Someone reported finding an item matching one of the user's reports
    ItemMatch,
    /// Someone wants to claim an item the user found
    Claim,
    /// One of the user's reports was marked resolved
    ReportCompleted,
}

/// Second-granularity wire timestamp, `{seconds, nanos}` on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    #[serde(default)]
    pub nanos: u32,
}

impl Timestamp {
    pub fn now() -> Self {
        Self {
            seconds: chrono::Utc::now().timestamp(),
            nanos: 0,
        }
    }

    pub fn from_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }
}

/// One entry in the on-device notification inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationItem {
    /// Generated by the cache at append time; embeds the millisecond clock
    /// plus a random suffix
    pub id: String,
    pub title: String,
    pub description: String,
    pub timestamp: Timestamp,
    /// The only field ever mutated after insertion
    pub read: bool,
    #[serde(default)]
    pub kind: NotificationKind,
    /// Back-reference to a remote report, for navigation only
    #[serde(default)]
    pub item_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_wire_shape() {
        let item = NotificationItem {
            id: "1700000000000-abc".to_string(),
            title: "Match found".to_string(),
            description: "Someone found your bottle".to_string(),
            timestamp: Timestamp::from_seconds(1_700_000_000),
            read: false,
            kind: NotificationKind::ItemMatch,
            item_id: Some("r1".to_string()),
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["timestamp"]["seconds"], 1_700_000_000_i64);
        assert_eq!(value["timestamp"]["nanos"], 0);
        assert_eq!(value["itemId"], "r1");
        assert_eq!(value["read"], false);
    }

    #[test]
    fn kind_defaults_for_old_entries() {
        // Entries written before the kind tag existed still parse
        let json = r#"{
            "id": "x",
            "title": "t",
            "description": "d",
            "timestamp": {"seconds": 1},
            "read": true
        }"#;
        let item: NotificationItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, NotificationKind::General);
        assert!(item.item_id.is_none());
        assert_eq!(item.timestamp.nanos, 0);
    }
}
