//! Type-safe campaign identifier.
//!
//! [`CampaignId`] is a newtype over the opaque string handed out by an
//! [`super::IdGenerator`], so campaign keys cannot be confused with caller
//! identities or other free-form text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a campaign.
///
/// Assigned once at creation and immutable thereafter. Used as the key in
/// both the campaign store and the contribution ledger, and as the event
/// discriminator on the [`super::EventBus`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(String);

impl CampaignId {
    /// Wraps an already-generated identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice, the form used as a
    /// storage key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<uuid::Uuid> for CampaignId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid.to_string())
    }
}

impl From<&str> for CampaignId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CampaignId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
