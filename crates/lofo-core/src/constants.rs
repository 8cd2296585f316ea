//! Application-wide constants
//!
//! Centralized location for magic values that are used across the cache
//! modules.

/// Maximum number of entries kept in the notification inbox.
/// Appends beyond the cap evict the oldest entries by position (the
/// sequence is always newest-first).
pub const NOTIFICATION_CAP: usize = 50;

/// Default age horizon for the notification expiry sweep, in days.
pub const NOTIFICATION_EXPIRY_DAYS: i64 = 30;

/// Display format for the cached `completedAtFormatted` string.
pub const COMPLETED_AT_FORMAT: &str = "%d %b %Y, %H:%M";

// Storage slot names (one JSON file per slot under the data dir)
pub mod slots {
    /// Reports the user has marked resolved, mirrored locally
    pub const COMPLETED_REPORTS: &str = "completed_reports";
    /// Inbound notification inbox
    pub const NOTIFICATIONS: &str = "notifications";
}
