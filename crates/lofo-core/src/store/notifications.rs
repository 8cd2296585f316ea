//! On-device notification inbox.
//!
//! Populated by the push-delivery collaborator, read by the UI. The sequence
//! is kept newest-first by construction: every append prepends and truncates
//! to the cap, so no sort-on-read is ever needed. One instance is shared
//! process-wide via [`NotificationCache::shared`].

use std::path::Path;
use std::sync::OnceLock;

use parking_lot::Mutex;
use tokio::sync::watch;
use uuid::Uuid;

use super::record_store::{RecordStore, StoreError};
use crate::config::default_data_dir;
use crate::constants::{slots, NOTIFICATION_CAP, NOTIFICATION_EXPIRY_DAYS};
use crate::models::{NotificationItem, NotificationKind, Timestamp};

/// Failure type for mutations that target a single entry.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("no entry with that id")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

static SHARED: OnceLock<NotificationCache> = OnceLock::new();

pub struct NotificationCache {
    store: RecordStore,
    items: Mutex<Vec<NotificationItem>>,
    feed: watch::Sender<Vec<NotificationItem>>,
}

impl NotificationCache {
    /// The shared per-process instance, lazily constructed on first access.
    /// Concurrent first accesses still yield a single instance.
    pub fn shared() -> &'static NotificationCache {
        SHARED.get_or_init(|| NotificationCache::new(default_data_dir()))
    }

    /// Open a cache over its own data dir. Tests and embedders that manage
    /// their own locations use this instead of [`NotificationCache::shared`].
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        let store = RecordStore::new(data_dir, slots::NOTIFICATIONS);
        let items: Vec<NotificationItem> = match store.load() {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("notification slot unreadable, starting empty: {e}");
                Vec::new()
            }
        };

        let (feed, _) = watch::channel(items.clone());
        Self {
            store,
            items: Mutex::new(items),
            feed,
        }
    }

    /// Latest-value feed of the inbox, newest-first.
    pub fn subscribe(&self) -> watch::Receiver<Vec<NotificationItem>> {
        self.feed.subscribe()
    }

    /// Append a freshly-delivered notification.
    ///
    /// Generates a unique id, prepends, and silently evicts anything beyond
    /// the cap. Returns the stored item so the caller can reference its id.
    pub fn append(
        &self,
        title: &str,
        description: &str,
        kind: NotificationKind,
        item_id: Option<String>,
    ) -> Result<NotificationItem, StoreError> {
        let item = NotificationItem {
            id: generate_notification_id(),
            title: title.to_string(),
            description: description.to_string(),
            timestamp: Timestamp::now(),
            read: false,
            kind,
            item_id,
        };

        let mut items = self.items.lock();
        let previous = items.clone();
        items.insert(0, item.clone());
        items.truncate(NOTIFICATION_CAP);

        if let Err(e) = self.store.save(&items) {
            *items = previous;
            return Err(e);
        }
        self.republish(&items);
        Ok(item)
    }

    /// Flip one entry's read flag. `CacheError::NotFound` if no entry
    /// matches.
    pub fn mark_read(&self, id: &str) -> Result<(), CacheError> {
        let mut items = self.items.lock();
        if !items.iter().any(|i| i.id == id) {
            return Err(CacheError::NotFound);
        }

        let previous = items.clone();
        for item in items.iter_mut().filter(|i| i.id == id) {
            item.read = true;
        }

        if let Err(e) = self.store.save(&items) {
            *items = previous;
            return Err(e.into());
        }
        self.republish(&items);
        Ok(())
    }

    /// Flip every entry's read flag.
    pub fn mark_all_read(&self) -> Result<(), StoreError> {
        let mut items = self.items.lock();
        let previous = items.clone();
        for item in items.iter_mut() {
            item.read = true;
        }

        if let Err(e) = self.store.save(&items) {
            *items = previous;
            return Err(e);
        }
        self.republish(&items);
        Ok(())
    }

    /// Remove one entry. `CacheError::NotFound` if no entry matches.
    pub fn delete(&self, id: &str) -> Result<(), CacheError> {
        let mut items = self.items.lock();
        if !items.iter().any(|i| i.id == id) {
            return Err(CacheError::NotFound);
        }

        let previous = items.clone();
        items.retain(|i| i.id != id);

        if let Err(e) = self.store.save(&items) {
            *items = previous;
            return Err(e.into());
        }
        self.republish(&items);
        Ok(())
    }

    /// Empty the inbox and remove the underlying slot entirely.
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut items = self.items.lock();
        let previous = std::mem::take(&mut *items);

        if let Err(e) = self.store.remove() {
            *items = previous;
            return Err(e);
        }
        self.republish(&items);
        Ok(())
    }

    /// Count of unread entries, computed from the persisted sequence rather
    /// than the in-memory snapshot. A point query independent of the feed.
    pub fn unread_count(&self) -> usize {
        match self.store.load::<NotificationItem>() {
            Ok(items) => items.iter().filter(|i| !i.read).count(),
            Err(e) => {
                tracing::warn!("unread count unavailable, slot unreadable: {e}");
                0
            }
        }
    }

    /// Sweep entries older than the default 30-day horizon.
    pub fn cleanup_expired(&self) -> Result<usize, StoreError> {
        self.cleanup_expired_before(NOTIFICATION_EXPIRY_DAYS)
    }

    /// Sweep entries older than `horizon_days`. Persists and republishes
    /// only when something was actually removed; returns the removed count.
    pub fn cleanup_expired_before(&self, horizon_days: i64) -> Result<usize, StoreError> {
        let cutoff = chrono::Utc::now().timestamp() - horizon_days * 24 * 60 * 60;

        let mut items = self.items.lock();
        let previous = items.clone();
        items.retain(|i| i.timestamp.seconds > cutoff);

        let removed = previous.len() - items.len();
        if removed == 0 {
            return Ok(0);
        }

        if let Err(e) = self.store.save(&items) {
            *items = previous;
            return Err(e);
        }
        tracing::info!(removed, "swept expired notifications");
        self.republish(&items);
        Ok(removed)
    }

    fn republish(&self, items: &[NotificationItem]) {
        self.feed.send_replace(items.to_vec());
    }
}

/// Unique inbox id: millisecond clock for rough ordering plus a random
/// suffix to survive same-millisecond appends.
fn generate_notification_id() -> String {
    format!(
        "{}-{}",
        chrono::Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}
