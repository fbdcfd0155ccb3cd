//! Facts produced by the deal state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dealroom_core::LeadId;
use dealroom_events::Event;

use crate::money::Money;

/// Event: OfferMade (investor opens or resumes a thread).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferMade {
    pub lead_id: LeadId,
    pub amount: Money,
    /// The previous (declined) thread is discarded before this offer.
    pub fresh_thread: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BoughtAtAskingPrice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoughtAtAskingPrice {
    pub lead_id: LeadId,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CounterOffered (seller answers an investor offer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterOffered {
    pub lead_id: LeadId,
    pub amount: Money,
    pub round: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CounteredBack (investor answers a seller counter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounteredBack {
    pub lead_id: LeadId,
    pub amount: Money,
    pub round: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CounterAccepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterAccepted {
    pub lead_id: LeadId,
    pub agreed_price: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OfferAccepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferAccepted {
    pub lead_id: LeadId,
    pub agreed_price: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OfferWithdrawn (before any counter; the lead returns to `New`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferWithdrawn {
    pub lead_id: LeadId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: NegotiationDeclined (investor walks away from a counter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationDeclined {
    pub lead_id: LeadId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ContractSigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSigned {
    pub lead_id: LeadId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SaleClosed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleClosed {
    pub lead_id: LeadId,
    pub sold_for: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadEvent {
    OfferMade(OfferMade),
    BoughtAtAskingPrice(BoughtAtAskingPrice),
    CounterOffered(CounterOffered),
    CounteredBack(CounteredBack),
    CounterAccepted(CounterAccepted),
    OfferAccepted(OfferAccepted),
    OfferWithdrawn(OfferWithdrawn),
    NegotiationDeclined(NegotiationDeclined),
    ContractSigned(ContractSigned),
    SaleClosed(SaleClosed),
}

impl LeadEvent {
    pub fn lead_id(&self) -> LeadId {
        match self {
            LeadEvent::OfferMade(e) => e.lead_id,
            LeadEvent::BoughtAtAskingPrice(e) => e.lead_id,
            LeadEvent::CounterOffered(e) => e.lead_id,
            LeadEvent::CounteredBack(e) => e.lead_id,
            LeadEvent::CounterAccepted(e) => e.lead_id,
            LeadEvent::OfferAccepted(e) => e.lead_id,
            LeadEvent::OfferWithdrawn(e) => e.lead_id,
            LeadEvent::NegotiationDeclined(e) => e.lead_id,
            LeadEvent::ContractSigned(e) => e.lead_id,
            LeadEvent::SaleClosed(e) => e.lead_id,
        }
    }
}

impl Event for LeadEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LeadEvent::OfferMade(_) => "negotiation.lead.offer_made",
            LeadEvent::BoughtAtAskingPrice(_) => "negotiation.lead.bought_at_asking_price",
            LeadEvent::CounterOffered(_) => "negotiation.lead.countered",
            LeadEvent::CounteredBack(_) => "negotiation.lead.countered_back",
            LeadEvent::CounterAccepted(_) => "negotiation.lead.counter_accepted",
            LeadEvent::OfferAccepted(_) => "negotiation.lead.offer_accepted",
            LeadEvent::OfferWithdrawn(_) => "negotiation.lead.offer_withdrawn",
            LeadEvent::NegotiationDeclined(_) => "negotiation.lead.declined",
            LeadEvent::ContractSigned(_) => "negotiation.lead.contract_signed",
            LeadEvent::SaleClosed(_) => "negotiation.lead.sale_closed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LeadEvent::OfferMade(e) => e.occurred_at,
            LeadEvent::BoughtAtAskingPrice(e) => e.occurred_at,
            LeadEvent::CounterOffered(e) => e.occurred_at,
            LeadEvent::CounteredBack(e) => e.occurred_at,
            LeadEvent::CounterAccepted(e) => e.occurred_at,
            LeadEvent::OfferAccepted(e) => e.occurred_at,
            LeadEvent::OfferWithdrawn(e) => e.occurred_at,
            LeadEvent::NegotiationDeclined(e) => e.occurred_at,
            LeadEvent::ContractSigned(e) => e.occurred_at,
            LeadEvent::SaleClosed(e) => e.occurred_at,
        }
    }
}
