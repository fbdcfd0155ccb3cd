//! Notification intents derived from committed transitions.
//!
//! Delivery (SMS, email) happens elsewhere; this module only decides *who*
//! should hear about *what*.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dealroom_core::LeadId;
use dealroom_events::Event;

use crate::event::LeadEvent;
use crate::ledger::Actor;
use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// An investor offer awaits the seller.
    OfferMade,
    /// A seller counter awaits the investor.
    Countered,
    /// Both parties agreed on a price.
    PendingContract,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::OfferMade => "offer_made",
            NotificationKind::Countered => "countered",
            NotificationKind::PendingContract => "pending_contract",
        }
    }

    pub fn recipients(self) -> &'static [Actor] {
        match self {
            NotificationKind::OfferMade => &[Actor::Seller],
            NotificationKind::Countered => &[Actor::Investor],
            NotificationKind::PendingContract => &[Actor::Seller, Actor::Investor],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub lead_id: LeadId,
    pub kind: NotificationKind,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

impl NotificationIntent {
    /// Intent for a transition into `OfferMade`, `Countered` or
    /// `PendingContract`; `None` for every other event.
    pub fn from_event(event: &LeadEvent) -> Option<Self> {
        let (kind, amount) = match event {
            LeadEvent::OfferMade(e) => (NotificationKind::OfferMade, e.amount),
            LeadEvent::CounteredBack(e) => (NotificationKind::OfferMade, e.amount),
            LeadEvent::CounterOffered(e) => (NotificationKind::Countered, e.amount),
            LeadEvent::BoughtAtAskingPrice(e) => (NotificationKind::PendingContract, e.amount),
            LeadEvent::CounterAccepted(e) => (NotificationKind::PendingContract, e.agreed_price),
            LeadEvent::OfferAccepted(e) => (NotificationKind::PendingContract, e.agreed_price),
            LeadEvent::OfferWithdrawn(_)
            | LeadEvent::NegotiationDeclined(_)
            | LeadEvent::ContractSigned(_)
            | LeadEvent::SaleClosed(_) => return None,
        };

        Some(Self {
            lead_id: event.lead_id(),
            kind,
            amount,
            occurred_at: event.occurred_at(),
        })
    }
}
