//! Campaign service: the caller-facing boundary of the ledger.

use std::sync::Arc;

use crate::config::{IdStrategy, LedgerConfig};
use crate::domain::{
    CallerId, Campaign, CampaignId, CampaignLocks, CampaignStatus, Clock, Contribution, EventBus,
    IdGenerator, LedgerEvent, NewCampaign, SequentialIdGenerator, SystemClock, UuidGenerator,
};
use crate::error::{LedgerError, LedgerResult};
use crate::storage::{CampaignStore, ContributionLedger, KeyValueStore, MemoryStore};

/// Orchestration layer for all ledger operations.
///
/// Owns the [`CampaignStore`] and [`ContributionLedger`] together with the
/// injected [`Clock`] and [`IdGenerator`]. Every mutation follows the
/// pattern: acquire the campaign lock → read the clock → validate and write
/// through the stores → emit an event → log → return the result.
#[derive(Debug, Clone)]
pub struct CampaignService {
    campaigns: CampaignStore,
    contributions: ContributionLedger,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    locks: Arc<CampaignLocks>,
    event_bus: EventBus,
}

impl CampaignService {
    /// Creates a service over the given components and collaborators.
    #[must_use]
    pub fn new(
        campaigns: CampaignStore,
        contributions: ContributionLedger,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            campaigns,
            contributions,
            clock,
            ids,
            locks: Arc::new(CampaignLocks::new()),
            event_bus,
        }
    }

    /// Creates a service backed by fresh [`MemoryStore`]s.
    #[must_use]
    pub fn in_memory(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>, event_bus: EventBus) -> Self {
        let campaigns: Arc<dyn KeyValueStore<Campaign>> =
            Arc::new(MemoryStore::<Campaign>::new("campaigns"));
        let contributions: Arc<dyn KeyValueStore<Vec<Contribution>>> =
            Arc::new(MemoryStore::<Vec<Contribution>>::new("contributions"));
        Self::new(
            CampaignStore::new(campaigns),
            ContributionLedger::new(contributions),
            clock,
            ids,
            event_bus,
        )
    }

    /// Builds an in-memory service wired from configuration: system clock,
    /// the configured id strategy, and an event bus of the configured
    /// capacity.
    #[must_use]
    pub fn from_config(config: &LedgerConfig) -> Self {
        let ids: Arc<dyn IdGenerator> = match config.id_strategy {
            IdStrategy::Uuid => Arc::new(UuidGenerator),
            IdStrategy::Sequential => Arc::new(SequentialIdGenerator::default()),
        };
        Self::in_memory(
            Arc::new(SystemClock::new()),
            ids,
            EventBus::new(config.event_bus_capacity),
        )
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the injected clock.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Creates a campaign owned by `caller` and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ValidationError`] for an empty title or
    /// description or a zero goal, and [`LedgerError::StorageError`] if
    /// either write fails.
    pub async fn create_campaign(
        &self,
        draft: NewCampaign,
        caller: &CallerId,
    ) -> LedgerResult<CampaignId> {
        let now = self.clock.now_nanos();
        let campaign_id = self.ids.next_id();
        let _guard = self.locks.acquire(&campaign_id).await;

        let campaign = self
            .campaigns
            .create(campaign_id.clone(), draft, caller.clone(), now)?;

        if let Err(err) = self.contributions.open(&campaign_id) {
            tracing::warn!(%campaign_id, error = %err, "rolling back campaign creation");
            return Err(match self.campaigns.discard(&campaign_id) {
                Ok(()) => err,
                Err(rollback) => err.with_failed_rollback(&rollback),
            });
        }

        let _ = self.event_bus.publish(LedgerEvent::CampaignCreated {
            campaign_id: campaign_id.clone(),
            owner: campaign.owner,
            goal_amount: campaign.goal_amount,
            end_date: campaign.end_date,
            timestamp: now,
        });

        tracing::info!(
            %campaign_id,
            owner = %caller,
            goal_amount = campaign.goal_amount,
            "campaign created"
        );
        Ok(campaign_id)
    }

    /// Pledges `amount` from `caller` to a campaign.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::ValidationError`] for a zero amount or an ended
    ///   campaign.
    /// - [`LedgerError::CampaignNotFound`] if the campaign does not exist.
    /// - [`LedgerError::ContributionError`] if the goal is already reached,
    ///   the pledge would exceed it, or the funds were withdrawn.
    pub async fn contribute(
        &self,
        campaign_id: &CampaignId,
        amount: u64,
        caller: &CallerId,
    ) -> LedgerResult<String> {
        let (campaign, contribution) = self
            .locked(campaign_id, |now| {
                self.contributions
                    .record(&self.campaigns, campaign_id, amount, caller, now)
            })
            .await
            .inspect_err(|err| {
                if let LedgerError::StorageError(_) = err {
                    tracing::warn!(
                        %campaign_id,
                        error = %err,
                        "contribution not recorded"
                    );
                }
            })?;

        let _ = self.event_bus.publish(LedgerEvent::ContributionRecorded {
            campaign_id: campaign_id.clone(),
            contributor: contribution.contributor,
            amount,
            current_amount: campaign.current_amount,
            timestamp: contribution.timestamp,
        });

        tracing::info!(
            %campaign_id,
            contributor = %caller,
            amount,
            current_amount = campaign.current_amount,
            goal_amount = campaign.goal_amount,
            "contribution recorded"
        );
        Ok(format!(
            "Contributed {amount} for the campaign with id: {campaign_id}"
        ))
    }

    /// Withdraws the raised funds of a funded campaign.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::CampaignNotFound`] if the campaign does not exist.
    /// - [`LedgerError::AuthorizationError`] if `caller` is not the owner.
    /// - [`LedgerError::ValidationError`] if the goal is not reached or the
    ///   funds were already withdrawn.
    pub async fn withdraw_funds(
        &self,
        campaign_id: &CampaignId,
        caller: &CallerId,
    ) -> LedgerResult<String> {
        let (_, amount, now) = self
            .locked(campaign_id, |now| {
                self.campaigns
                    .withdraw(campaign_id, caller, now)
                    .map(|(campaign, amount)| (campaign, amount, now))
            })
            .await?;

        let _ = self.event_bus.publish(LedgerEvent::FundsWithdrawn {
            campaign_id: campaign_id.clone(),
            owner: caller.clone(),
            amount,
            timestamp: now,
        });

        tracing::info!(%campaign_id, owner = %caller, amount, "funds withdrawn");
        Ok(format!(
            "Funds successfully withdrawn for campaign {campaign_id}"
        ))
    }

    /// Deletes a campaign together with its contributions.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::CampaignNotFound`] if the campaign does not exist.
    /// - [`LedgerError::AuthorizationError`] if `caller` is not the owner.
    pub async fn delete_campaign(
        &self,
        campaign_id: &CampaignId,
        caller: &CallerId,
    ) -> LedgerResult<String> {
        let (removed_count, now) = self
            .locked(campaign_id, |now| {
                let removed = self.campaigns.delete(campaign_id, caller)?;
                match self.contributions.purge(campaign_id) {
                    Ok(count) => Ok((count, now)),
                    Err(err) => {
                        tracing::warn!(%campaign_id, error = %err, "rolling back campaign deletion");
                        match self.campaigns.save(removed) {
                            Ok(_) => Err(err),
                            Err(rollback) => Err(err.with_failed_rollback(&rollback)),
                        }
                    }
                }
            })
            .await?;
        let _ = self.locks.forget(campaign_id).await;

        let _ = self.event_bus.publish(LedgerEvent::CampaignDeleted {
            campaign_id: campaign_id.clone(),
            contributions_removed: removed_count,
            timestamp: now,
        });

        tracing::info!(
            %campaign_id,
            owner = %caller,
            contributions_removed = removed_count,
            "campaign deleted"
        );
        Ok(format!("Campaign {campaign_id} deleted successfully"))
    }

    /// Returns a single campaign.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CampaignNotFound`] if the campaign does not
    /// exist.
    pub async fn get_campaign(&self, campaign_id: &CampaignId) -> LedgerResult<Campaign> {
        self.locked(campaign_id, |_| self.campaigns.get(campaign_id))
            .await
    }

    /// Returns every campaign in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageError`] if the backend fails.
    pub async fn get_campaigns(&self) -> LedgerResult<Vec<Campaign>> {
        let campaigns = self.campaigns.list()?;
        tracing::debug!(count = campaigns.len(), "campaigns listed");
        Ok(campaigns)
    }

    /// Returns the contributions of a campaign in pledge order. A campaign
    /// without pledges yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CampaignNotFound`] if the campaign does not
    /// exist.
    pub async fn list_contributions(
        &self,
        campaign_id: &CampaignId,
    ) -> LedgerResult<Vec<Contribution>> {
        let list = self
            .locked(campaign_id, |_| self.contributions.list(campaign_id))
            .await?;
        tracing::debug!(%campaign_id, count = list.len(), "contributions listed");
        Ok(list)
    }

    /// Returns the lifecycle status of a campaign at the current clock
    /// reading.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CampaignNotFound`] if the campaign does not
    /// exist.
    pub async fn campaign_status(&self, campaign_id: &CampaignId) -> LedgerResult<CampaignStatus> {
        self.locked(campaign_id, |now| {
            self.campaigns
                .get(campaign_id)
                .map(|campaign| campaign.status(now))
        })
        .await
    }

    /// Runs `op` inside the campaign's critical section with a fresh clock
    /// reading. When the campaign turns out not to exist, the lock entry is
    /// dropped unless another caller still holds or awaits it.
    async fn locked<T>(
        &self,
        campaign_id: &CampaignId,
        op: impl FnOnce(u64) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let guard = self.locks.acquire(campaign_id).await;
        let result = op(self.clock.now_nanos());
        drop(guard);

        if matches!(result, Err(LedgerError::CampaignNotFound(_))) {
            let _ = self.locks.forget(campaign_id).await;
        }
        result
    }
}
