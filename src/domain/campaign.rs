//! Campaign record and the lifecycle rules applied to it.
//!
//! Everything in this module is pure: rules read a [`Campaign`] plus the
//! inputs of an operation and either return the values to write or a
//! [`LedgerError`]. Nothing here touches storage.

use serde::{Deserialize, Serialize};

use super::{CallerId, CampaignId};
use crate::error::{LedgerError, LedgerResult};

/// Lifetime of every campaign: 24 hours in nanoseconds.
pub const CAMPAIGN_DURATION_NANOS: u64 = 24 * 60 * 60 * 1_000_000_000;

/// Creation payload for a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCampaign {
    /// Campaign title; must be non-empty.
    pub title: String,
    /// Campaign description; must be non-empty.
    pub description: String,
    /// Funding goal; must be positive.
    pub goal_amount: u64,
}

impl NewCampaign {
    /// Builds a payload from its three fields.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>, goal_amount: u64) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            goal_amount,
        }
    }

    /// Checks the payload for missing fields and a zero goal.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ValidationError`] if the title or description
    /// is empty or the goal amount is zero.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.title.is_empty() || self.description.is_empty() || self.goal_amount == 0 {
            return Err(LedgerError::ValidationError(
                "Invalid input data: Ensure title, description are present and goal amount is positive."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Lifecycle position of a campaign at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Accepting contributions.
    Open,
    /// Goal reached, awaiting withdrawal by the owner.
    Funded,
    /// Raised funds have been withdrawn.
    Withdrawn,
    /// Deadline passed without reaching the goal.
    Expired,
}

/// A funding goal with a deadline, an owner, and a running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Unique identifier (immutable).
    pub id: CampaignId,
    /// Non-empty title.
    pub title: String,
    /// Non-empty description.
    pub description: String,
    /// Funding goal (immutable, positive).
    pub goal_amount: u64,
    /// Sum of accepted contributions, reset to zero by a withdrawal.
    pub current_amount: u64,
    /// Creation time in nanoseconds (immutable).
    pub start_date: u64,
    /// `start_date + CAMPAIGN_DURATION_NANOS` (immutable).
    pub end_date: u64,
    /// Creator and sole authority for withdrawal and deletion.
    pub owner: CallerId,
    /// When the owner withdrew the raised funds, if they have.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withdrawn_at: Option<u64>,
}

impl Campaign {
    /// Validates `draft` and builds a fresh campaign owned by `owner`,
    /// starting at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ValidationError`] if the payload is invalid or
    /// `now` is too close to `u64::MAX` for the end date to be represented.
    pub fn open(
        id: CampaignId,
        draft: NewCampaign,
        owner: CallerId,
        now: u64,
    ) -> LedgerResult<Self> {
        draft.validate()?;
        let end_date = now.checked_add(CAMPAIGN_DURATION_NANOS).ok_or_else(|| {
            LedgerError::ValidationError(format!("start time {now} leaves no room for an end date"))
        })?;

        Ok(Self {
            id,
            title: draft.title,
            description: draft.description,
            goal_amount: draft.goal_amount,
            current_amount: 0,
            start_date: now,
            end_date,
            owner,
            withdrawn_at: None,
        })
    }

    /// Returns `true` once `now` is strictly past the end date.
    #[must_use]
    pub const fn is_ended(&self, now: u64) -> bool {
        now > self.end_date
    }

    /// Returns `true` if the running total has reached the goal.
    #[must_use]
    pub const fn is_funded(&self) -> bool {
        self.current_amount >= self.goal_amount
    }

    /// Returns `true` if the owner has withdrawn the raised funds.
    #[must_use]
    pub const fn is_withdrawn(&self) -> bool {
        self.withdrawn_at.is_some()
    }

    /// Amount still accepted before the goal ceiling is hit.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.goal_amount.saturating_sub(self.current_amount)
    }

    /// Derives the lifecycle status at `now`.
    #[must_use]
    pub const fn status(&self, now: u64) -> CampaignStatus {
        if self.is_withdrawn() {
            CampaignStatus::Withdrawn
        } else if self.is_funded() {
            CampaignStatus::Funded
        } else if self.is_ended(now) {
            CampaignStatus::Expired
        } else {
            CampaignStatus::Open
        }
    }

    /// Fails unless `caller` owns this campaign. `action` completes the
    /// sentence "Only the campaign owner can ...".
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AuthorizationError`] on an owner mismatch.
    pub fn ensure_owner(&self, caller: &CallerId, action: &str) -> LedgerResult<()> {
        if *caller != self.owner {
            return Err(LedgerError::AuthorizationError(format!(
                "Only the campaign owner can {action}. Caller: {caller}, Owner: {}",
                self.owner
            )));
        }
        Ok(())
    }

    /// Checks whether `amount` may be pledged at `now` and returns the new
    /// running total.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::ValidationError`] if the campaign has ended.
    /// - [`LedgerError::ContributionError`] if funds were withdrawn, the goal
    ///   is already reached, or the pledge would push the total past it.
    pub fn check_contribution(&self, amount: u64, now: u64) -> LedgerResult<u64> {
        if self.is_ended(now) {
            return Err(LedgerError::ValidationError(
                "This campaign has already ended.".to_string(),
            ));
        }
        if self.is_withdrawn() {
            return Err(LedgerError::ContributionError(format!(
                "Funds for campaign with id={} have already been withdrawn. It no longer accepts contributions.",
                self.id
            )));
        }
        if self.is_funded() {
            return Err(LedgerError::ContributionError(format!(
                "Campaign with id={} has successfully reached its funding goal. No further contributions are needed.",
                self.id
            )));
        }
        match self.current_amount.checked_add(amount) {
            Some(total) if total <= self.goal_amount => Ok(total),
            _ => Err(LedgerError::ContributionError(format!(
                "This contribution would exceed the campaign's funding goal. At most {} can still be contributed.",
                self.remaining()
            ))),
        }
    }

    /// Checks whether `caller` may withdraw the raised funds.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::AuthorizationError`] if `caller` is not the owner.
    /// - [`LedgerError::ValidationError`] if the funds were already withdrawn
    ///   or the goal has not been reached.
    pub fn check_withdrawal(&self, caller: &CallerId) -> LedgerResult<()> {
        self.ensure_owner(caller, "withdraw funds")?;
        if self.is_withdrawn() {
            return Err(LedgerError::ValidationError(
                "Funds have already been withdrawn for this campaign.".to_string(),
            ));
        }
        if self.current_amount < self.goal_amount {
            return Err(LedgerError::ValidationError(
                "Cannot withdraw funds as the campaign has not reached its funding goal."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_000_000_000_000;

    fn owner() -> CallerId {
        CallerId::from("owner")
    }

    fn make_campaign(goal: u64) -> Campaign {
        let draft = NewCampaign::new("Solar roof", "Panels for the library", goal);
        let Ok(campaign) = Campaign::open(CampaignId::from("c-1"), draft, owner(), T0) else {
            panic!("valid campaign");
        };
        campaign
    }

    #[test]
    fn open_sets_computed_fields() {
        let campaign = make_campaign(100);
        assert_eq!(campaign.current_amount, 0);
        assert_eq!(campaign.start_date, T0);
        assert_eq!(campaign.end_date - campaign.start_date, 86_400_000_000_000);
        assert_eq!(campaign.owner, owner());
        assert!(campaign.withdrawn_at.is_none());
    }

    #[test]
    fn open_rejects_empty_fields_and_zero_goal() {
        for draft in [
            NewCampaign::new("", "desc", 10),
            NewCampaign::new("title", "", 10),
            NewCampaign::new("title", "desc", 0),
        ] {
            let result = Campaign::open(CampaignId::from("x"), draft, owner(), T0);
            assert!(matches!(result, Err(LedgerError::ValidationError(_))));
        }
    }

    #[test]
    fn open_rejects_overflowing_end_date() {
        let draft = NewCampaign::new("title", "desc", 10);
        let result = Campaign::open(CampaignId::from("x"), draft, owner(), u64::MAX - 1);
        assert!(matches!(result, Err(LedgerError::ValidationError(_))));
    }

    #[test]
    fn contribution_accepted_on_last_nanosecond() {
        let campaign = make_campaign(100);
        assert_eq!(campaign.check_contribution(10, campaign.end_date), Ok(10));
        assert!(matches!(
            campaign.check_contribution(10, campaign.end_date + 1),
            Err(LedgerError::ValidationError(_))
        ));
    }

    #[test]
    fn contribution_respects_goal_ceiling() {
        let mut campaign = make_campaign(100);
        campaign.current_amount = 60;
        assert!(matches!(
            campaign.check_contribution(50, T0),
            Err(LedgerError::ContributionError(_))
        ));
        assert_eq!(campaign.check_contribution(40, T0), Ok(100));

        campaign.current_amount = 100;
        let Err(LedgerError::ContributionError(msg)) = campaign.check_contribution(1, T0) else {
            panic!("expected contribution error");
        };
        assert!(msg.contains("reached its funding goal"));
    }

    #[test]
    fn contribution_overflow_counts_as_exceeding() {
        let mut campaign = make_campaign(u64::MAX);
        campaign.current_amount = u64::MAX - 1;
        assert!(matches!(
            campaign.check_contribution(u64::MAX, T0),
            Err(LedgerError::ContributionError(_))
        ));
    }

    #[test]
    fn withdrawal_requires_owner_and_goal() {
        let mut campaign = make_campaign(100);
        assert!(matches!(
            campaign.check_withdrawal(&CallerId::from("stranger")),
            Err(LedgerError::AuthorizationError(_))
        ));
        assert!(matches!(
            campaign.check_withdrawal(&owner()),
            Err(LedgerError::ValidationError(_))
        ));

        campaign.current_amount = 100;
        assert!(campaign.check_withdrawal(&owner()).is_ok());

        campaign.current_amount = 0;
        campaign.withdrawn_at = Some(T0);
        let Err(LedgerError::ValidationError(msg)) = campaign.check_withdrawal(&owner()) else {
            panic!("expected validation error");
        };
        assert!(msg.contains("already been withdrawn"));
    }

    #[test]
    fn status_follows_lifecycle() {
        let mut campaign = make_campaign(100);
        assert_eq!(campaign.status(T0), CampaignStatus::Open);
        assert_eq!(campaign.status(campaign.end_date + 1), CampaignStatus::Expired);

        campaign.current_amount = 100;
        assert_eq!(campaign.status(campaign.end_date + 1), CampaignStatus::Funded);

        campaign.current_amount = 0;
        campaign.withdrawn_at = Some(T0);
        assert_eq!(campaign.status(T0), CampaignStatus::Withdrawn);
    }

    #[test]
    fn withdrawn_campaign_refuses_contributions() {
        let mut campaign = make_campaign(100);
        campaign.withdrawn_at = Some(T0);
        assert!(matches!(
            campaign.check_contribution(1, T0),
            Err(LedgerError::ContributionError(_))
        ));
    }
}
