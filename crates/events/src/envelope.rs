use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dealroom_core::LeadId;

/// Envelope for a message published about one lead.
///
/// Notes:
/// - `sequence_number` is the lead version the message was produced at, so
///   consumers can drop duplicates and stale deliveries.
/// - `payload` is opaque to the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    lead_id: LeadId,

    /// Lead version after the transition that produced this message.
    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(event_id: Uuid, lead_id: LeadId, sequence_number: u64, payload: E) -> Self {
        Self {
            event_id,
            lead_id,
            sequence_number,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn lead_id(&self) -> LeadId {
        self.lead_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
