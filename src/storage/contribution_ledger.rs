//! Contribution Ledger: append-only pledge lists per campaign.
//!
//! Recording a pledge updates the campaign's running total in the
//! [`CampaignStore`] and appends to its list here as one unit: if the
//! append fails, the campaign write is undone.

use std::sync::Arc;

use super::{CampaignStore, KeyValueStore};
use crate::domain::{CallerId, Campaign, CampaignId, Contribution};
use crate::error::{LedgerError, LedgerResult};

/// Contribution lists keyed by [`CampaignId`], in insertion order.
#[derive(Debug, Clone)]
pub struct ContributionLedger {
    contributions: Arc<dyn KeyValueStore<Vec<Contribution>>>,
}

impl ContributionLedger {
    /// Creates a ledger over the given key-value collaborator.
    #[must_use]
    pub fn new(contributions: Arc<dyn KeyValueStore<Vec<Contribution>>>) -> Self {
        Self { contributions }
    }

    /// Starts an empty list for a freshly created campaign.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageError`] if a list already exists for
    /// `campaign_id` or the write fails.
    pub fn open(&self, campaign_id: &CampaignId) -> LedgerResult<()> {
        if self.contributions.get(campaign_id.as_str())?.is_some() {
            return Err(LedgerError::StorageError(format!(
                "contribution list for campaign {campaign_id} already exists"
            )));
        }
        self.contributions
            .insert(campaign_id.as_str(), Vec::new())
            .map(|_| ())
    }

    /// Validates and records a pledge of `amount` by `caller` at `now`.
    /// Returns the updated campaign and the new record.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::ValidationError`] if `amount` is zero or the campaign
    ///   has ended.
    /// - [`LedgerError::CampaignNotFound`] if the campaign does not exist.
    /// - [`LedgerError::ContributionError`] if the goal ceiling forbids the
    ///   pledge or the funds were withdrawn.
    /// - [`LedgerError::StorageError`] if the campaign has no list or either
    ///   write fails; nothing is left half-applied.
    pub fn record(
        &self,
        campaigns: &CampaignStore,
        campaign_id: &CampaignId,
        amount: u64,
        caller: &CallerId,
        now: u64,
    ) -> LedgerResult<(Campaign, Contribution)> {
        if amount == 0 {
            return Err(LedgerError::ValidationError(
                "Contribution amount must be positive.".to_string(),
            ));
        }

        let mut campaign = campaigns.get(campaign_id)?;
        let new_total = campaign.check_contribution(amount, now)?;
        let mut list = self.contributions.get(campaign_id.as_str())?.ok_or_else(|| {
            LedgerError::StorageError(format!(
                "campaign {campaign_id} has no contribution list"
            ))
        })?;

        let contribution = Contribution::new(caller.clone(), amount, now);
        list.push(contribution.clone());

        let previous = campaign.clone();
        campaign.current_amount = new_total;
        campaigns.save(campaign.clone())?;

        if let Err(err) = self.contributions.insert(campaign_id.as_str(), list) {
            return Err(match campaigns.save(previous) {
                Ok(_) => err,
                Err(rollback) => err.with_failed_rollback(&rollback),
            });
        }

        Ok((campaign, contribution))
    }

    /// Returns the pledges of a campaign in the order they were recorded.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CampaignNotFound`] if no list exists for the
    /// campaign.
    pub fn list(&self, campaign_id: &CampaignId) -> LedgerResult<Vec<Contribution>> {
        self.contributions
            .get(campaign_id.as_str())?
            .ok_or_else(|| {
                LedgerError::CampaignNotFound(format!(
                    "No contributions found for campaign with id={campaign_id}"
                ))
            })
    }

    /// Drops a campaign's whole list, returning how many records it held.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageError`] if the backend fails.
    pub fn purge(&self, campaign_id: &CampaignId) -> LedgerResult<usize> {
        Ok(self
            .contributions
            .remove(campaign_id.as_str())?
            .map_or(0, |list| list.len()))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use tokio_test::assert_ok;

    use super::*;
    use crate::domain::NewCampaign;
    use crate::storage::MemoryStore;

    const T0: u64 = 1_000;

    /// Contribution store whose writes can be switched to fail.
    #[derive(Debug)]
    struct FlakyStore {
        inner: MemoryStore<Vec<Contribution>>,
        fail_writes: AtomicBool,
    }

    impl KeyValueStore<Vec<Contribution>> for FlakyStore {
        fn get(&self, key: &str) -> LedgerResult<Option<Vec<Contribution>>> {
            self.inner.get(key)
        }

        fn insert(
            &self,
            key: &str,
            value: Vec<Contribution>,
        ) -> LedgerResult<Option<Vec<Contribution>>> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(LedgerError::StorageError("disk full".to_string()));
            }
            self.inner.insert(key, value)
        }

        fn remove(&self, key: &str) -> LedgerResult<Option<Vec<Contribution>>> {
            self.inner.remove(key)
        }

        fn values(&self) -> LedgerResult<Vec<Vec<Contribution>>> {
            self.inner.values()
        }
    }

    /// Campaign store that accepts a fixed number of writes, then fails.
    #[derive(Debug)]
    struct BudgetedStore {
        inner: MemoryStore<Campaign>,
        writes_left: AtomicUsize,
    }

    impl KeyValueStore<Campaign> for BudgetedStore {
        fn get(&self, key: &str) -> LedgerResult<Option<Campaign>> {
            self.inner.get(key)
        }

        fn insert(&self, key: &str, value: Campaign) -> LedgerResult<Option<Campaign>> {
            let granted = self
                .writes_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
            if granted.is_err() {
                return Err(LedgerError::StorageError("read-only replica".to_string()));
            }
            self.inner.insert(key, value)
        }

        fn remove(&self, key: &str) -> LedgerResult<Option<Campaign>> {
            self.inner.remove(key)
        }

        fn values(&self) -> LedgerResult<Vec<Campaign>> {
            self.inner.values()
        }
    }

    fn setup(goal: u64) -> (CampaignStore, ContributionLedger, CampaignId) {
        let campaigns = CampaignStore::new(Arc::new(MemoryStore::<Campaign>::new("campaigns")));
        let ledger = ContributionLedger::new(Arc::new(
            MemoryStore::<Vec<Contribution>>::new("contributions"),
        ));
        let id = CampaignId::from("c-1");
        let _ = assert_ok!(campaigns.create(
            id.clone(),
            NewCampaign::new("Title", "Description", goal),
            CallerId::from("owner"),
            T0,
        ));
        assert_ok!(ledger.open(&id));
        (campaigns, ledger, id)
    }

    #[test]
    fn fresh_campaign_has_empty_list() {
        let (_, ledger, id) = setup(100);
        assert!(assert_ok!(ledger.list(&id)).is_empty());
    }

    #[test]
    fn unknown_campaign_list_is_not_found() {
        let (_, ledger, _) = setup(100);
        let result = ledger.list(&CampaignId::from("other"));
        assert!(matches!(result, Err(LedgerError::CampaignNotFound(_))));
    }

    #[test]
    fn record_updates_total_and_appends_in_order() {
        let (campaigns, ledger, id) = setup(100);
        let alice = CallerId::from("alice");
        let bob = CallerId::from("bob");

        let (after_first, _) = assert_ok!(ledger.record(&campaigns, &id, 30, &alice, T0 + 1));
        assert_eq!(after_first.current_amount, 30);
        let (after_second, record) = assert_ok!(ledger.record(&campaigns, &id, 20, &bob, T0 + 2));
        assert_eq!(after_second.current_amount, 50);
        assert_eq!(record, Contribution::new(bob.clone(), 20, T0 + 2));

        assert_eq!(assert_ok!(campaigns.get(&id)).current_amount, 50);
        assert_eq!(
            assert_ok!(ledger.list(&id)),
            vec![
                Contribution::new(alice, 30, T0 + 1),
                Contribution::new(bob, 20, T0 + 2),
            ]
        );
    }

    #[test]
    fn zero_amount_is_rejected_before_lookup() {
        let (campaigns, ledger, _) = setup(100);
        let result = ledger.record(
            &campaigns,
            &CampaignId::from("missing"),
            0,
            &CallerId::from("alice"),
            T0,
        );
        assert!(matches!(result, Err(LedgerError::ValidationError(_))));
    }

    #[test]
    fn missing_campaign_is_not_found() {
        let (campaigns, ledger, _) = setup(100);
        let result = ledger.record(
            &campaigns,
            &CampaignId::from("missing"),
            5,
            &CallerId::from("alice"),
            T0,
        );
        assert!(matches!(result, Err(LedgerError::CampaignNotFound(_))));
    }

    #[test]
    fn rejected_pledge_writes_nothing() {
        let (campaigns, ledger, id) = setup(100);
        let result = ledger.record(&campaigns, &id, 101, &CallerId::from("alice"), T0);
        assert!(matches!(result, Err(LedgerError::ContributionError(_))));
        assert_eq!(assert_ok!(campaigns.get(&id)).current_amount, 0);
        assert!(assert_ok!(ledger.list(&id)).is_empty());
    }

    #[test]
    fn failed_append_rolls_back_total() {
        let campaigns = CampaignStore::new(Arc::new(MemoryStore::<Campaign>::new("campaigns")));
        let flaky = Arc::new(FlakyStore {
            inner: MemoryStore::new("contributions"),
            fail_writes: AtomicBool::new(false),
        });
        let ledger = ContributionLedger::new(
            Arc::clone(&flaky) as Arc<dyn KeyValueStore<Vec<Contribution>>>
        );
        let id = CampaignId::from("c-1");
        let _ = assert_ok!(campaigns.create(
            id.clone(),
            NewCampaign::new("Title", "Description", 100),
            CallerId::from("owner"),
            T0,
        ));
        assert_ok!(ledger.open(&id));

        flaky.fail_writes.store(true, Ordering::SeqCst);
        let result = ledger.record(&campaigns, &id, 10, &CallerId::from("alice"), T0);
        assert!(matches!(result, Err(LedgerError::StorageError(_))));
        assert_eq!(assert_ok!(campaigns.get(&id)).current_amount, 0);
        assert!(assert_ok!(ledger.list(&id)).is_empty());
    }

    #[test]
    fn failed_rollback_reports_append_error_first() {
        let budget = Arc::new(BudgetedStore {
            inner: MemoryStore::new("campaigns"),
            writes_left: AtomicUsize::new(1),
        });
        let campaigns = CampaignStore::new(Arc::clone(&budget) as Arc<dyn KeyValueStore<Campaign>>);
        let flaky = Arc::new(FlakyStore {
            inner: MemoryStore::new("contributions"),
            fail_writes: AtomicBool::new(false),
        });
        let ledger = ContributionLedger::new(
            Arc::clone(&flaky) as Arc<dyn KeyValueStore<Vec<Contribution>>>
        );
        let id = CampaignId::from("c-1");
        let _ = assert_ok!(campaigns.create(
            id.clone(),
            NewCampaign::new("Title", "Description", 100),
            CallerId::from("owner"),
            T0,
        ));
        assert_ok!(ledger.open(&id));

        budget.writes_left.store(1, Ordering::SeqCst);
        flaky.fail_writes.store(true, Ordering::SeqCst);
        let Err(LedgerError::StorageError(msg)) =
            ledger.record(&campaigns, &id, 10, &CallerId::from("alice"), T0)
        else {
            panic!("expected storage error");
        };
        assert_eq!(msg, "disk full; rollback failed: read-only replica");
    }

    #[test]
    fn open_refuses_existing_list() {
        let (campaigns, ledger, id) = setup(100);
        let _ = assert_ok!(ledger.record(&campaigns, &id, 10, &CallerId::from("alice"), T0));

        let result = ledger.open(&id);
        assert!(matches!(result, Err(LedgerError::StorageError(_))));
        assert_eq!(assert_ok!(ledger.list(&id)).len(), 1);
    }

    #[test]
    fn campaign_without_list_is_a_storage_fault() {
        let (campaigns, ledger, id) = setup(100);
        let _ = assert_ok!(ledger.purge(&id));

        let result = ledger.record(&campaigns, &id, 10, &CallerId::from("alice"), T0);
        assert!(matches!(result, Err(LedgerError::StorageError(_))));
        assert_eq!(assert_ok!(campaigns.get(&id)).current_amount, 0);
        assert!(matches!(ledger.list(&id), Err(LedgerError::CampaignNotFound(_))));
    }

    #[test]
    fn purge_reports_dropped_records() {
        let (campaigns, ledger, id) = setup(100);
        let alice = CallerId::from("alice");
        let _ = assert_ok!(ledger.record(&campaigns, &id, 1, &alice, T0));
        let _ = assert_ok!(ledger.record(&campaigns, &id, 2, &alice, T0));

        assert_eq!(assert_ok!(ledger.purge(&id)), 2);
        assert!(matches!(ledger.list(&id), Err(LedgerError::CampaignNotFound(_))));
        assert_eq!(assert_ok!(ledger.purge(&id)), 0);
    }
}
