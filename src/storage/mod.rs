//! Storage layer: the key-value collaborator and the two ledger components
//! built on it.
//!
//! [`KeyValueStore`] is the abstract ordered map the ledger persists into.
//! [`CampaignStore`] owns campaign records and [`ContributionLedger`] owns
//! the append-only contribution lists; both enforce their component's
//! rules and neither logs.

pub mod campaign_store;
pub mod contribution_ledger;
pub mod memory;

use std::fmt;

pub use campaign_store::CampaignStore;
pub use contribution_ledger::ContributionLedger;
pub use memory::MemoryStore;

use crate::error::LedgerResult;

/// Ordered key-value map holding values of type `V`.
///
/// Every call is synchronous. Implementations report faults as
/// [`crate::error::LedgerError::StorageError`]; a missing key is not a
/// fault and is reported as `Ok(None)`.
pub trait KeyValueStore<V>: fmt::Debug + Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    fn get(&self, key: &str) -> LedgerResult<Option<V>>;

    /// Stores `value` under `key`, returning the value it replaced.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    fn insert(&self, key: &str, value: V) -> LedgerResult<Option<V>>;

    /// Removes `key`, returning the value it held.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    fn remove(&self, key: &str) -> LedgerResult<Option<V>>;

    /// Returns every stored value in ascending key order.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    fn values(&self) -> LedgerResult<Vec<V>>;
}
