pub mod config;
pub mod constants;
pub mod models;
pub mod resolver;
pub mod store;

// Re-export the main types at crate root for convenience
pub use config::CoreConfig;
pub use models::{
    CompletedReport, ItemReport, NotificationItem, NotificationKind, ReportKind, Timestamp,
};
pub use resolver::{
    CompleteError, ItemResolution, ItemResolver, ProfileService, RemoteItemStore,
    RemoteStoreError, ResolvedItem,
};
pub use store::{CacheError, CompletedReportCache, NotificationCache, RecordStore, StoreError};
