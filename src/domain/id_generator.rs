//! Injected campaign id generation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::CampaignId;

/// Source of globally-unique campaign identifiers.
pub trait IdGenerator: fmt::Debug + Send + Sync {
    /// Returns an identifier never handed out before.
    fn next_id(&self) -> CampaignId;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> CampaignId {
        CampaignId::from(uuid::Uuid::new_v4())
    }
}

/// Deterministic identifiers `<prefix>-000001`, `<prefix>-000002`, ...
///
/// Zero-padded so that ascending key order matches creation order for the
/// first million campaigns.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    /// Creates a generator whose ids start with `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("campaign")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> CampaignId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed).saturating_add(1);
        CampaignId::new(format!("{}-{n:06}", self.prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_generator_yields_unique_ids() {
        let generator = UuidGenerator;
        assert_ne!(generator.next_id(), generator.next_id());
    }

    #[test]
    fn sequential_generator_is_ordered() {
        let generator = SequentialIdGenerator::default();
        let first = generator.next_id();
        let second = generator.next_id();
        assert_eq!(first.as_str(), "campaign-000001");
        assert_eq!(second.as_str(), "campaign-000002");
        assert!(first < second);
    }
}
