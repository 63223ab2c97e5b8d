//! Fan-out of ledger events to host subscribers.
//!
//! The service publishes one [`LedgerEvent`] per committed mutation. Hosts
//! attach audit sinks, notifiers or read-model projections either to the
//! whole stream ([`EventBus::subscribe`]) or to a single campaign
//! ([`EventBus::watch`]).

use tokio::sync::broadcast;

use super::{CampaignId, LedgerEvent};

/// Cloneable handle on the ledger's event stream.
///
/// Events are held in a bounded ring. A subscriber that falls more than
/// `capacity` events behind loses the oldest ones.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LedgerEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per subscriber
    /// (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Hands `event` to every current subscriber and returns how many there
    /// were. Nothing is buffered when nobody listens.
    pub fn publish(&self, event: LedgerEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribes to every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.tx.subscribe()
    }

    /// Subscribes to the events of one campaign only.
    #[must_use]
    pub fn watch(&self, campaign_id: CampaignId) -> CampaignFeed {
        CampaignFeed {
            campaign_id,
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscribers, campaign feeds included.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Events of a single campaign, in publication order.
#[derive(Debug)]
pub struct CampaignFeed {
    campaign_id: CampaignId,
    rx: broadcast::Receiver<LedgerEvent>,
}

impl CampaignFeed {
    /// Campaign this feed follows.
    #[must_use]
    pub fn campaign_id(&self) -> &CampaignId {
        &self.campaign_id
    }

    /// Waits for the next event of the watched campaign. Events lost to lag
    /// are skipped. Returns `None` once every [`EventBus`] handle is gone.
    pub async fn next(&mut self) -> Option<LedgerEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.campaign_id() == &self.campaign_id => return Some(event),
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
