//! Campaign Store: owns campaign records.
//!
//! Enforces creation validation, goal tracking, and the ownership gate on
//! withdrawal and deletion. Callers pass the current time explicitly.

use std::sync::Arc;

use super::KeyValueStore;
use crate::domain::{CallerId, Campaign, CampaignId, NewCampaign};
use crate::error::{LedgerError, LedgerResult};

/// Campaign records keyed by [`CampaignId`].
#[derive(Debug, Clone)]
pub struct CampaignStore {
    campaigns: Arc<dyn KeyValueStore<Campaign>>,
}

impl CampaignStore {
    /// Creates a store over the given key-value collaborator.
    #[must_use]
    pub fn new(campaigns: Arc<dyn KeyValueStore<Campaign>>) -> Self {
        Self { campaigns }
    }

    /// Validates `draft`, builds the campaign under `id` and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ValidationError`] for an invalid payload and
    /// [`LedgerError::StorageError`] if the write fails or `id` is already
    /// taken.
    pub fn create(
        &self,
        id: CampaignId,
        draft: NewCampaign,
        owner: CallerId,
        now: u64,
    ) -> LedgerResult<Campaign> {
        let campaign = Campaign::open(id, draft, owner, now)?;
        if self.campaigns.get(campaign.id.as_str())?.is_some() {
            return Err(LedgerError::StorageError(format!(
                "campaign id {} is already in use",
                campaign.id
            )));
        }
        self.campaigns.insert(campaign.id.as_str(), campaign.clone())?;
        Ok(campaign)
    }

    /// Looks up a campaign.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CampaignNotFound`] if no record exists.
    pub fn get(&self, id: &CampaignId) -> LedgerResult<Campaign> {
        self.campaigns.get(id.as_str())?.ok_or_else(|| not_found(id))
    }

    /// Returns every campaign in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageError`] if the backend fails.
    pub fn list(&self) -> LedgerResult<Vec<Campaign>> {
        self.campaigns.values()
    }

    /// Overwrites the stored record with `campaign`, returning the record
    /// it replaced.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageError`] if the write fails.
    pub fn save(&self, campaign: Campaign) -> LedgerResult<Option<Campaign>> {
        let key = campaign.id.as_str().to_string();
        self.campaigns.insert(&key, campaign)
    }

    /// Erases a campaign record without any checks. Used to roll back a
    /// creation whose second write failed.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageError`] if the backend fails.
    pub fn discard(&self, id: &CampaignId) -> LedgerResult<()> {
        self.campaigns.remove(id.as_str()).map(|_| ())
    }

    /// Releases the raised funds to the owner: zeroes the running total and
    /// records `now` as the withdrawal time. Returns the updated record and
    /// the amount withdrawn.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::CampaignNotFound`] if the campaign does not exist.
    /// - [`LedgerError::AuthorizationError`] if `caller` is not the owner.
    /// - [`LedgerError::ValidationError`] if the goal is not reached or the
    ///   funds were already withdrawn.
    pub fn withdraw(
        &self,
        id: &CampaignId,
        caller: &CallerId,
        now: u64,
    ) -> LedgerResult<(Campaign, u64)> {
        let mut campaign = self.get(id)?;
        campaign.check_withdrawal(caller)?;

        let amount = campaign.current_amount;
        campaign.current_amount = 0;
        campaign.withdrawn_at = Some(now);
        self.save(campaign.clone())?;
        Ok((campaign, amount))
    }

    /// Removes a campaign owned by `caller`, returning the removed record.
    ///
    /// Deletion does not require the goal to be reached.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::CampaignNotFound`] if the campaign does not exist.
    /// - [`LedgerError::AuthorizationError`] if `caller` is not the owner.
    pub fn delete(&self, id: &CampaignId, caller: &CallerId) -> LedgerResult<Campaign> {
        let campaign = self.get(id)?;
        campaign.ensure_owner(caller, "delete this campaign")?;
        self.campaigns
            .remove(id.as_str())?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &CampaignId) -> LedgerError {
    LedgerError::CampaignNotFound(format!("Campaign with id={id} not found"))
}
