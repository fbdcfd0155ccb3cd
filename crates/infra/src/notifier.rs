//! Outbound notification boundary.
//!
//! Best-effort: the service calls the notifier only after a transition is
//! committed and never rolls back on failure.

use std::sync::Arc;

use uuid::Uuid;

use dealroom_events::{EventBus, EventEnvelope};
use dealroom_negotiation::NotificationIntent;

pub trait Notifier: Send + Sync {
    type Error: core::fmt::Debug;

    /// Hand off `intent`, produced at lead version `sequence_number`.
    fn notify(&self, intent: NotificationIntent, sequence_number: u64) -> Result<(), Self::Error>;
}

impl<N> Notifier for Arc<N>
where
    N: Notifier + ?Sized,
{
    type Error = N::Error;

    fn notify(&self, intent: NotificationIntent, sequence_number: u64) -> Result<(), Self::Error> {
        (**self).notify(intent, sequence_number)
    }
}

/// Publishes intents on an [`EventBus`] for delivery workers to pick up.
#[derive(Debug)]
pub struct BusNotifier<B> {
    bus: B,
}

impl<B> BusNotifier<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }
}

impl<B> Notifier for BusNotifier<B>
where
    B: EventBus<EventEnvelope<NotificationIntent>>,
{
    type Error = B::Error;

    fn notify(&self, intent: NotificationIntent, sequence_number: u64) -> Result<(), Self::Error> {
        let envelope = EventEnvelope::new(Uuid::now_v7(), intent.lead_id, sequence_number, intent);
        self.bus.publish(envelope)
    }
}
