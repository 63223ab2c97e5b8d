//! A single pledge toward a campaign.

use serde::{Deserialize, Serialize};

use super::CallerId;

/// Immutable record of one accepted pledge.
///
/// Has no identity of its own: it lives in its campaign's list in the
/// contribution ledger and is dropped with that list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// Caller who pledged.
    pub contributor: CallerId,
    /// Pledged amount (always positive).
    pub amount: u64,
    /// Pledge time in nanoseconds.
    pub timestamp: u64,
}

impl Contribution {
    /// Builds a contribution record.
    #[must_use]
    pub const fn new(contributor: CallerId, amount: u64, timestamp: u64) -> Self {
        Self {
            contributor,
            amount,
            timestamp,
        }
    }
}
