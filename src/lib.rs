//! # crowdfund-ledger
//!
//! Campaign lifecycle and contribution ledger for time-boxed crowdfunding.
//!
//! Owners create campaigns with a funding goal and a 24-hour window,
//! contributors pledge toward the goal without ever exceeding it, and the
//! owner withdraws once the goal is met or deletes the campaign outright.
//! Storage, time, id generation and caller identity are injected
//! collaborators; this crate holds the rules.
//!
//! ## Architecture
//!
//! ```text
//! Host (transport, auth)
//!     │
//!     ├── CampaignService (service/)
//!     ├── EventBus, CampaignLocks (domain/)
//!     │
//!     ├── CampaignStore ── ContributionLedger (storage/)
//!     ├── Campaign rules (domain/)
//!     │
//!     └── KeyValueStore (MemoryStore)
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod storage;
pub mod telemetry;

pub use config::LedgerConfig;
pub use domain::{CallerId, Campaign, CampaignId, CampaignStatus, Contribution, NewCampaign};
pub use error::{LedgerError, LedgerResult};
pub use service::CampaignService;
