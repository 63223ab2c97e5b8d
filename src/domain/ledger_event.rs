//! Domain events reflecting ledger mutations.
//!
//! Every successful mutation publishes a [`LedgerEvent`] through the
//! [`super::EventBus`]. Timestamps are the ledger's nanosecond clock
//! readings, the same values stored on the records.

use serde::Serialize;

use super::{CallerId, CampaignId};

/// Domain event emitted after every successful state mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A campaign was created.
    CampaignCreated {
        /// Campaign identifier.
        campaign_id: CampaignId,
        /// Creator.
        owner: CallerId,
        /// Funding goal.
        goal_amount: u64,
        /// Deadline in nanoseconds.
        end_date: u64,
        /// Creation time.
        timestamp: u64,
    },

    /// A contribution was accepted.
    ContributionRecorded {
        /// Campaign identifier.
        campaign_id: CampaignId,
        /// Caller who pledged.
        contributor: CallerId,
        /// Pledged amount.
        amount: u64,
        /// Running total after the pledge.
        current_amount: u64,
        /// Pledge time.
        timestamp: u64,
    },

    /// The owner withdrew the raised funds.
    FundsWithdrawn {
        /// Campaign identifier.
        campaign_id: CampaignId,
        /// Owner who withdrew.
        owner: CallerId,
        /// Amount released by the withdrawal.
        amount: u64,
        /// Withdrawal time.
        timestamp: u64,
    },

    /// The owner deleted the campaign and its contributions.
    CampaignDeleted {
        /// Campaign identifier.
        campaign_id: CampaignId,
        /// Number of contribution records dropped with it.
        contributions_removed: usize,
        /// Deletion time.
        timestamp: u64,
    },
}

impl LedgerEvent {
    /// Returns the campaign this event belongs to.
    #[must_use]
    pub fn campaign_id(&self) -> &CampaignId {
        match self {
            Self::CampaignCreated { campaign_id, .. }
            | Self::ContributionRecorded { campaign_id, .. }
            | Self::FundsWithdrawn { campaign_id, .. }
            | Self::CampaignDeleted { campaign_id, .. } => campaign_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::CampaignCreated { .. } => "campaign_created",
            Self::ContributionRecorded { .. } => "contribution_recorded",
            Self::FundsWithdrawn { .. } => "funds_withdrawn",
            Self::CampaignDeleted { .. } => "campaign_deleted",
        }
    }
}
