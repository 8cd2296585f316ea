//! Local history of reports the user has marked resolved.
//!
//! The remote store drops a report the moment it is completed; this cache is
//! what keeps it visible afterwards. At most one entry exists per report id
//! and the published snapshot is sorted most-recently-completed first.

use std::path::Path;

use parking_lot::Mutex;
use tokio::sync::watch;

use super::record_store::{RecordStore, StoreError};
use crate::constants::slots;
use crate::models::{CompletedReport, ItemReport};

pub struct CompletedReportCache {
    store: RecordStore,
    reports: Mutex<Vec<CompletedReport>>,
    feed: watch::Sender<Vec<CompletedReport>>,
}

impl CompletedReportCache {
    /// Open the cache, loading whatever the slot holds. A corrupt slot
    /// publishes an empty snapshot rather than failing construction.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        let store = RecordStore::new(data_dir, slots::COMPLETED_REPORTS);
        let mut reports: Vec<CompletedReport> = match store.load() {
            Ok(reports) => reports,
            Err(e) => {
                tracing::warn!("completed-report slot unreadable, starting empty: {e}");
                Vec::new()
            }
        };
        reports.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

        let (feed, _) = watch::channel(reports.clone());
        Self {
            store,
            reports: Mutex::new(reports),
            feed,
        }
    }

    /// Latest-value feed of the history, sorted descending by completion
    /// time. New subscribers observe the current snapshot immediately.
    pub fn subscribe(&self) -> watch::Receiver<Vec<CompletedReport>> {
        self.feed.subscribe()
    }

    /// Mirror a report into local history, stamping its completion time.
    ///
    /// Idempotent: if an entry with the same id already exists this is a
    /// successful no-op, so racing or retried "mark completed" calls never
    /// duplicate history.
    pub fn insert(&self, item: ItemReport) -> Result<(), StoreError> {
        let mut reports = self.reports.lock();
        if reports.iter().any(|r| r.id() == item.id) {
            return Ok(());
        }

        let completed_at = chrono::Utc::now().timestamp_millis();
        reports.push(CompletedReport::new(item, completed_at));

        if let Err(e) = self.store.save(&reports) {
            reports.pop();
            return Err(e);
        }
        self.republish(&mut reports);
        Ok(())
    }

    /// Point lookup by report id.
    pub fn get_by_id(&self, id: &str) -> Option<CompletedReport> {
        self.reports.lock().iter().find(|r| r.id() == id).cloned()
    }

    /// Remove every entry matching `id` (defensive against duplicates that
    /// predate the idempotence guard).
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut reports = self.reports.lock();
        let previous = reports.clone();
        reports.retain(|r| r.id() != id);

        if let Err(e) = self.store.save(&reports) {
            *reports = previous;
            return Err(e);
        }
        self.republish(&mut reports);
        Ok(())
    }

    /// Empty the history, persisting an explicit empty array.
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut reports = self.reports.lock();
        let previous = std::mem::take(&mut *reports);

        if let Err(e) = self.store.save(&reports) {
            *reports = previous;
            return Err(e);
        }
        self.republish(&mut reports);
        Ok(())
    }

    /// Size of the current snapshot. No I/O.
    pub fn count(&self) -> usize {
        self.feed.borrow().len()
    }

    fn republish(&self, reports: &mut Vec<CompletedReport>) {
        reports.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        self.feed.send_replace(reports.clone());
    }
}
