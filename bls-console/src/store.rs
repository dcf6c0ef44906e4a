//! Session-local caches with ticketed refresh
//!
//! Every refresh takes a ticket before the fetch and commits with it
//! after. Commits carrying a ticket older than the last applied one are
//! discarded, so overlapping refreshes can never roll a collection back
//! to stale data regardless of response ordering.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use shared::models::SystemStatus;
use tokio::sync::RwLock;

/// Single-use token ordering a refresh against concurrent ones.
#[derive(Debug)]
pub struct RefreshTicket {
    seq: u64,
}

#[derive(Debug)]
struct Inner<T> {
    items: Vec<T>,
    applied_seq: u64,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Cache of one Gateway collection, replaced wholesale on refresh.
#[derive(Debug)]
pub struct CollectionStore<T> {
    issued: AtomicU64,
    inner: RwLock<Inner<T>>,
}

impl<T: Clone> Default for CollectionStore<T> {
    fn default() -> Self {
        Self {
            issued: AtomicU64::new(0),
            inner: RwLock::new(Inner {
                items: Vec::new(),
                applied_seq: 0,
                refreshed_at: None,
            }),
        }
    }
}

impl<T: Clone> CollectionStore<T> {
    /// Take a ticket. Call before fetching, commit with it after.
    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket {
            seq: self.issued.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    /// Replace the cache if the ticket is still the newest applied.
    ///
    /// Returns false when a later refresh already committed; the items
    /// are dropped in that case.
    pub async fn commit(&self, ticket: RefreshTicket, items: Vec<T>) -> bool {
        let mut inner = self.inner.write().await;
        if ticket.seq <= inner.applied_seq {
            return false;
        }
        inner.items = items;
        inner.applied_seq = ticket.seq;
        inner.refreshed_at = Some(Utc::now());
        true
    }

    /// Cloned view of the cache as of now.
    pub async fn snapshot(&self) -> Vec<T> {
        self.inner.read().await.items.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// When the cache last accepted a commit, if ever.
    pub async fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.refreshed_at
    }
}

#[derive(Debug, Default)]
struct CellInner {
    value: Option<SystemStatus>,
    applied_seq: u64,
}

/// Cache of the automation status, replaced wholesale like the
/// collections. A status commit never merges fields.
#[derive(Debug, Default)]
pub struct StatusCell {
    issued: AtomicU64,
    inner: RwLock<CellInner>,
}

impl StatusCell {
    pub fn begin_update(&self) -> RefreshTicket {
        RefreshTicket {
            seq: self.issued.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    pub async fn commit(&self, ticket: RefreshTicket, status: SystemStatus) -> bool {
        let mut inner = self.inner.write().await;
        if ticket.seq <= inner.applied_seq {
            return false;
        }
        inner.value = Some(status);
        inner.applied_seq = ticket.seq;
        true
    }

    /// Last committed status, None until the first commit.
    pub async fn current(&self) -> Option<SystemStatus> {
        self.inner.read().await.value.clone()
    }
}

/// All caches of one console session.
#[derive(Debug, Default)]
pub(crate) struct SessionStores {
    pub applicants: CollectionStore<shared::models::Applicant>,
    pub credentials: CollectionStore<shared::models::Credential>,
    pub bookings: CollectionStore<shared::models::Booking>,
    pub status: StatusCell,
}

impl SessionStores {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[tokio::test]
    async fn test_commit_in_order() {
        let store: CollectionStore<String> = CollectionStore::default();
        assert!(store.is_empty().await);
        assert!(store.last_refreshed().await.is_none());

        let ticket = store.begin_refresh();
        assert!(store.commit(ticket, vec!["a".to_string(), "b".to_string()]).await);
        assert_eq!(store.len().await, 2);
        assert!(store.last_refreshed().await.is_some());
    }

    #[tokio::test]
    async fn test_stale_commit_is_discarded() {
        let store: CollectionStore<String> = CollectionStore::default();

        let older = store.begin_refresh();
        let newer = store.begin_refresh();

        assert!(store.commit(newer, vec!["fresh".to_string()]).await);
        assert!(!store.commit(older, vec!["stale".to_string()]).await);
        assert_eq!(store.snapshot().await, vec!["fresh".to_string()]);
    }

    #[tokio::test]
    async fn test_snapshot_is_isolated() {
        let store: CollectionStore<u32> = CollectionStore::default();
        let ticket = store.begin_refresh();
        store.commit(ticket, vec![1, 2, 3]).await;

        let mut snapshot = store.snapshot().await;
        snapshot.push(4);
        assert_eq!(store.snapshot().await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_interleaved_refreshes_keep_newest() {
        let store: CollectionStore<u32> = CollectionStore::default();

        let first = store.begin_refresh();
        assert!(store.commit(first, vec![1]).await);

        let second = store.begin_refresh();
        let third = store.begin_refresh();
        assert!(store.commit(third, vec![3]).await);
        assert!(!store.commit(second, vec![2]).await);

        assert_eq!(store.snapshot().await, vec![3]);
    }

    #[tokio::test]
    async fn test_status_replaces_wholesale() {
        let cell = StatusCell::default();
        assert!(cell.current().await.is_none());

        let ticket = cell.begin_update();
        cell.commit(
            ticket,
            SystemStatus {
                is_running: true,
                current_task: Some("Navigating to BLS website".to_string()),
                last_update: Utc::now(),
            },
        )
        .await;

        let ticket = cell.begin_update();
        cell.commit(
            ticket,
            SystemStatus {
                is_running: false,
                current_task: None,
                last_update: Utc::now(),
            },
        )
        .await;

        let status = cell.current().await.unwrap();
        assert!(!status.is_running);
        assert!(status.current_task.is_none());
    }

    #[tokio::test]
    async fn test_stale_status_commit_is_discarded() {
        let cell = StatusCell::default();

        let older = cell.begin_update();
        let newer = cell.begin_update();

        assert!(
            cell.commit(
                newer,
                SystemStatus {
                    is_running: true,
                    current_task: None,
                    last_update: Utc::now(),
                },
            )
            .await
        );
        assert!(
            !cell
                .commit(
                    older,
                    SystemStatus {
                        is_running: false,
                        current_task: None,
                        last_update: Utc::now(),
                    },
                )
                .await
        );
        assert!(cell.current().await.unwrap().is_running);
    }
}
