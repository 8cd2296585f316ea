pub mod completed_reports;
pub mod notifications;
pub mod record_store;

pub use completed_reports::CompletedReportCache;
pub use notifications::{CacheError, NotificationCache};
pub use record_store::{RecordStore, StoreError};
