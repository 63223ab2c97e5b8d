//! Service layer: business logic orchestration.
//!
//! [`CampaignService`] serializes operations per campaign, drives the
//! campaign store and contribution ledger, and emits events through the
//! [`super::domain::EventBus`].

pub mod campaign_service;

pub use campaign_service::CampaignService;
