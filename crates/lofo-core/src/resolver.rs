//! Remote-first, local-fallback resolution of report lookups.
//!
//! The remote store is authoritative only while a report is active; once the
//! owner marks it resolved the record leaves the remote-visible set and the
//! completed-history cache is the only place it still exists. Resolution
//! therefore tries remote first and consults local history only on a
//! definitive remote miss. The two sources are never queried concurrently.

use std::sync::Arc;

use crate::models::ItemReport;
use crate::store::record_store::StoreError;
use crate::store::CompletedReportCache;

#[derive(Debug, thiserror::Error)]
pub enum RemoteStoreError {
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
}

/// Point-lookup surface of the remote document store.
pub trait RemoteItemStore: Send + Sync {
    /// Fetch a report by id. `Ok(None)` is the definitive miss that sends
    /// the resolver to local history.
    fn fetch_item(&self, item_id: &str) -> Result<Option<ItemReport>, RemoteStoreError>;

    /// Remove a report from the remote-visible set when its owner resolves
    /// it.
    fn mark_completed(&self, item_id: &str) -> Result<(), RemoteStoreError>;

    /// The current session's user id, if signed in.
    fn current_user_id(&self) -> Option<String>;
}

/// Display-name lookup. `None` falls the resolver back to the name embedded
/// in the record.
pub trait ProfileService: Send + Sync {
    fn display_name(&self, user_id: &str) -> Option<String>;
}

/// A report plus the viewer-relative state the UI renders.
#[derive(Debug, Clone)]
pub struct ResolvedItem {
    pub item: ItemReport,
    pub viewer_is_owner: bool,
    /// Freshest known display name for the owner
    pub owner_name: String,
    /// Set only when the record came from local history
    pub completed_at: Option<i64>,
    pub completed_at_formatted: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ItemResolution {
    /// The remote record is still authoritative
    Remote(ResolvedItem),
    /// The remote record is gone; this is the locally-preserved copy
    LocalHistory(ResolvedItem),
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum CompleteError {
    #[error("failed to mirror report locally: {0}")]
    Local(#[from] StoreError),
    /// The report was mirrored locally but could not be removed remotely.
    /// Retrying is safe: the local insert is idempotent.
    #[error("remote removal failed: {0}")]
    Remote(#[from] RemoteStoreError),
}

pub struct ItemResolver {
    remote: Arc<dyn RemoteItemStore>,
    profiles: Arc<dyn ProfileService>,
    history: Arc<CompletedReportCache>,
}

impl ItemResolver {
    pub fn new(
        remote: Arc<dyn RemoteItemStore>,
        profiles: Arc<dyn ProfileService>,
        history: Arc<CompletedReportCache>,
    ) -> Self {
        Self {
            remote,
            profiles,
            history,
        }
    }

    /// Resolve a report id against remote state first, then local history.
    pub fn resolve(&self, item_id: &str) -> ItemResolution {
        match self.remote.fetch_item(item_id) {
            Ok(Some(item)) => {
                let viewer_is_owner =
                    self.remote.current_user_id().as_deref() == Some(item.user_id.as_str());
                let owner_name = self.owner_name(&item);
                return ItemResolution::Remote(ResolvedItem {
                    item,
                    viewer_is_owner,
                    owner_name,
                    completed_at: None,
                    completed_at_formatted: None,
                });
            }
            Ok(None) => {}
            Err(e) => {
                // A transport failure is a miss on this path, not an error
                // surfaced to the caller
                tracing::debug!("remote lookup failed, falling back to history: {e}");
            }
        }

        match self.history.get_by_id(item_id) {
            Some(report) => {
                // A history entry is only ever materialized for its own
                // owner, so the viewer owns this record unconditionally
                let owner_name = self.owner_name(&report.item);
                ItemResolution::LocalHistory(ResolvedItem {
                    viewer_is_owner: true,
                    owner_name,
                    completed_at: Some(report.completed_at),
                    completed_at_formatted: Some(report.completed_at_formatted),
                    item: report.item,
                })
            }
            None => ItemResolution::NotFound,
        }
    }

    /// Mark a report resolved: mirror it into local history, then remove it
    /// from the remote-visible set.
    ///
    /// The local insert runs first so a remote failure can never orphan the
    /// history entry.
    pub fn complete(&self, item: ItemReport) -> Result<(), CompleteError> {
        let item_id = item.id.clone();
        self.history.insert(item)?;
        self.remote.mark_completed(&item_id)?;
        Ok(())
    }

    fn owner_name(&self, item: &ItemReport) -> String {
        self.profiles
            .display_name(&item.user_id)
            .unwrap_or_else(|| item.user_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportKind;
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet};
    use tempfile::tempdir;

    fn make_item(id: &str, user_id: &str) -> ItemReport {
        ItemReport {
            id: id.to_string(),
            user_id: user_id.to_string(),
            user_name: "Historical Name".to_string(),
            kind: ReportKind::Found,
            item_name: "Calculator".to_string(),
            category: "Electronics".to_string(),
            location: "Lab".to_string(),
            description: String::new(),
            image_url: None,
            whatsapp_number: String::new(),
            created_at: 1_700_000_000_000,
            completed: false,
        }
    }

    #[derive(Default)]
    struct FakeRemote {
        items: Mutex<HashMap<String, ItemReport>>,
        removed: Mutex<HashSet<String>>,
        user: Option<String>,
        unavailable: bool,
    }

    impl FakeRemote {
        fn with_user(user: &str) -> Self {
            Self {
                user: Some(user.to_string()),
                ..Default::default()
            }
        }

        fn put(&self, item: ItemReport) {
            self.items.lock().insert(item.id.clone(), item);
        }
    }

    impl RemoteItemStore for FakeRemote {
        fn fetch_item(&self, item_id: &str) -> Result<Option<ItemReport>, RemoteStoreError> {
            if self.unavailable {
                return Err(RemoteStoreError::Unavailable("offline".to_string()));
            }
            Ok(self.items.lock().get(item_id).cloned())
        }

        fn mark_completed(&self, item_id: &str) -> Result<(), RemoteStoreError> {
            if self.unavailable {
                return Err(RemoteStoreError::Unavailable("offline".to_string()));
            }
            self.items.lock().remove(item_id);
            self.removed.lock().insert(item_id.to_string());
            Ok(())
        }

        fn current_user_id(&self) -> Option<String> {
            self.user.clone()
        }
    }

    struct FakeProfiles {
        names: HashMap<String, String>,
    }

    impl FakeProfiles {
        fn empty() -> Self {
            Self {
                names: HashMap::new(),
            }
        }

        fn with(user_id: &str, name: &str) -> Self {
            let mut names = HashMap::new();
            names.insert(user_id.to_string(), name.to_string());
            Self { names }
        }
    }

    impl ProfileService for FakeProfiles {
        fn display_name(&self, user_id: &str) -> Option<String> {
            self.names.get(user_id).cloned()
        }
    }

    fn resolver(
        remote: FakeRemote,
        profiles: FakeProfiles,
        history: Arc<CompletedReportCache>,
    ) -> ItemResolver {
        ItemResolver::new(Arc::new(remote), Arc::new(profiles), history)
    }

    #[test]
    fn remote_hit_is_authoritative() {
        let dir = tempdir().unwrap();
        let history = Arc::new(CompletedReportCache::new(dir.path()));
        let remote = FakeRemote::with_user("viewer");
        remote.put(make_item("r1", "viewer"));

        let r = resolver(remote, FakeProfiles::with("viewer", "Fresh Name"), history);
        match r.resolve("r1") {
            ItemResolution::Remote(resolved) => {
                assert!(resolved.viewer_is_owner);
                assert_eq!(resolved.owner_name, "Fresh Name");
                assert!(resolved.completed_at.is_none());
            }
            other => panic!("expected remote resolution, got {:?}", other),
        }
    }

    #[test]
    fn remote_hit_by_another_owner_is_not_owned() {
        let dir = tempdir().unwrap();
        let history = Arc::new(CompletedReportCache::new(dir.path()));
        let remote = FakeRemote::with_user("viewer");
        remote.put(make_item("r1", "someone-else"));

        let r = resolver(remote, FakeProfiles::empty(), history);
        match r.resolve("r1") {
            ItemResolution::Remote(resolved) => {
                assert!(!resolved.viewer_is_owner);
                // Profile miss falls back to the embedded historical name
                assert_eq!(resolved.owner_name, "Historical Name");
            }
            other => panic!("expected remote resolution, got {:?}", other),
        }
    }

    #[test]
    fn remote_miss_falls_back_to_history() {
        let dir = tempdir().unwrap();
        let history = Arc::new(CompletedReportCache::new(dir.path()));
        history.insert(make_item("r1", "viewer")).unwrap();

        let remote = FakeRemote::with_user("viewer");
        let r = resolver(remote, FakeProfiles::empty(), history);
        match r.resolve("r1") {
            ItemResolution::LocalHistory(resolved) => {
                assert!(resolved.viewer_is_owner);
                assert!(resolved.item.completed);
                assert!(resolved.completed_at.is_some());
                assert!(resolved.completed_at_formatted.is_some());
            }
            other => panic!("expected local-history resolution, got {:?}", other),
        }
    }

    #[test]
    fn remote_failure_also_falls_back() {
        let dir = tempdir().unwrap();
        let history = Arc::new(CompletedReportCache::new(dir.path()));
        history.insert(make_item("r1", "viewer")).unwrap();

        let remote = FakeRemote {
            unavailable: true,
            ..Default::default()
        };
        let r = resolver(remote, FakeProfiles::empty(), history);
        assert!(matches!(r.resolve("r1"), ItemResolution::LocalHistory(_)));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let dir = tempdir().unwrap();
        let history = Arc::new(CompletedReportCache::new(dir.path()));
        let r = resolver(FakeRemote::default(), FakeProfiles::empty(), history);
        assert!(matches!(r.resolve("ghost"), ItemResolution::NotFound));
    }

    #[test]
    fn complete_mirrors_then_removes_remotely() {
        let dir = tempdir().unwrap();
        let history = Arc::new(CompletedReportCache::new(dir.path()));
        let remote = FakeRemote::with_user("viewer");
        remote.put(make_item("r1", "viewer"));
        let remote = Arc::new(remote);

        let r = ItemResolver::new(
            remote.clone(),
            Arc::new(FakeProfiles::empty()),
            history.clone(),
        );
        r.complete(make_item("r1", "viewer")).unwrap();

        assert!(history.get_by_id("r1").is_some());
        assert!(remote.removed.lock().contains("r1"));
        // The resolver now answers from history
        assert!(matches!(r.resolve("r1"), ItemResolution::LocalHistory(_)));
    }

    #[test]
    fn complete_keeps_local_mirror_when_remote_fails() {
        let dir = tempdir().unwrap();
        let history = Arc::new(CompletedReportCache::new(dir.path()));
        let remote = FakeRemote {
            unavailable: true,
            ..Default::default()
        };

        let r = ItemResolver::new(
            Arc::new(remote),
            Arc::new(FakeProfiles::empty()),
            history.clone(),
        );
        let err = r.complete(make_item("r1", "viewer")).unwrap_err();
        assert!(matches!(err, CompleteError::Remote(_)));
        // The history entry is preserved so a retry only repeats the
        // remote call
        assert!(history.get_by_id("r1").is_some());
    }
}
