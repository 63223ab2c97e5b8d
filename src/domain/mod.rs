//! Domain layer: records, lifecycle rules, and injected collaborators.
//!
//! This module holds the campaign and contribution records with the pure
//! rules that govern them, the identity newtypes, the clock and id
//! generator traits the service is built on, the per-campaign lock
//! registry, and the event bus for broadcasting mutations.

pub mod caller;
pub mod campaign;
pub mod campaign_id;
pub mod campaign_locks;
pub mod clock;
pub mod contribution;
pub mod event_bus;
pub mod id_generator;
pub mod ledger_event;

pub use caller::CallerId;
pub use campaign::{CAMPAIGN_DURATION_NANOS, Campaign, CampaignStatus, NewCampaign};
pub use campaign_id::CampaignId;
pub use campaign_locks::CampaignLocks;
pub use clock::{Clock, ManualClock, SystemClock};
pub use contribution::Contribution;
pub use event_bus::{CampaignFeed, EventBus};
pub use id_generator::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use ledger_event::LedgerEvent;
