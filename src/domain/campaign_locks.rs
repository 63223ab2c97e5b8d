//! Per-campaign mutual exclusion.
//!
//! [`CampaignLocks`] hands out one [`tokio::sync::Mutex`] per campaign id so
//! that read-validate-write sequences on the same campaign are serialized
//! while operations on different campaigns run concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use super::CampaignId;

/// Registry of per-campaign locks.
///
/// Uses a `RwLock<HashMap<...>>` for the outer map and a per-entry
/// `Arc<Mutex<()>>` as the campaign's critical section.
///
/// # Concurrency
///
/// - Operations on the same campaign are serialized.
/// - Operations on different campaigns are concurrent.
/// - The outer map is only write-locked to create or drop an entry.
#[derive(Debug, Default)]
pub struct CampaignLocks {
    locks: RwLock<HashMap<CampaignId, Arc<Mutex<()>>>>,
}

impl CampaignLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `campaign_id`, creating its lock on
    /// first use. The returned guard releases the lock when dropped.
    pub async fn acquire(&self, campaign_id: &CampaignId) -> OwnedMutexGuard<()> {
        let existing = self.locks.read().await.get(campaign_id).map(Arc::clone);
        let lock = match existing {
            Some(lock) => lock,
            None => {
                let mut map = self.locks.write().await;
                Arc::clone(map.entry(campaign_id.clone()).or_default())
            }
        };
        lock.lock_owned().await
    }

    /// Drops the lock entry of `campaign_id` when nobody holds or awaits it.
    ///
    /// Returns `true` if the entry was removed. An entry still referenced by
    /// a guard or a pending [`CampaignLocks::acquire`] is kept, so every
    /// caller of the same campaign keeps contending on one mutex.
    pub async fn forget(&self, campaign_id: &CampaignId) -> bool {
        let mut map = self.locks.write().await;
        let idle = map
            .get(campaign_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            map.remove(campaign_id);
        }
        idle
    }

    /// Returns the number of campaigns with a lock entry.
    pub async fn len(&self) -> usize {
        self.locks.read().await.len()
    }

    /// Returns `true` if no lock entry exists.
    pub async fn is_empty(&self) -> bool {
        self.locks.read().await.is_empty()
    }
}
