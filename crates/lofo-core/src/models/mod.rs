pub mod notification;
pub mod report;

pub use notification::{NotificationItem, NotificationKind, Timestamp};
pub use report::{CompletedReport, ItemReport, ReportKind};
