use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dealroom_core::{Aggregate, AggregateRoot, LeadId};
use dealroom_events::Event;

use crate::command::LeadCommand;
use crate::error::NegotiationError;
use crate::event::LeadEvent;
use crate::ledger::{Actor, NegotiationHistory, OfferEvent};
use crate::machine;
use crate::money::Money;
use crate::policy::NegotiationPolicy;

/// Deal lifecycle. `Sold` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    New,
    OfferMade,
    Countered,
    OfferDeclined,
    PendingContract,
    UnderContract,
    Sold,
}

impl DealStatus {
    /// A price has been agreed (or the deal has closed).
    pub fn is_agreed(self) -> bool {
        matches!(
            self,
            DealStatus::PendingContract | DealStatus::UnderContract | DealStatus::Sold
        )
    }

    /// Offers are being exchanged.
    pub fn is_negotiating(self) -> bool {
        matches!(self, DealStatus::OfferMade | DealStatus::Countered)
    }
}

impl core::fmt::Display for DealStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            DealStatus::New => "New",
            DealStatus::OfferMade => "Offer Made",
            DealStatus::Countered => "Countered",
            DealStatus::OfferDeclined => "Offer Declined",
            DealStatus::PendingContract => "Pending Contract",
            DealStatus::UnderContract => "Under Contract",
            DealStatus::Sold => "Sold",
        };
        f.write_str(label)
    }
}

/// Aggregate root: Lead (one property listing and its negotiation).
///
/// The bottom price is seller-private; investor-facing read models must be
/// built through [`crate::view::InvestorLeadView`], which omits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    id: LeadId,
    asking_price: Money,
    bottom_price: Money,
    status: DealStatus,
    history: NegotiationHistory,
    sold_for: Option<Money>,
    listed_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Lead {
    /// Create a lead from a completed intake.
    pub fn list(
        id: LeadId,
        asking_price: Money,
        bottom_price: Money,
        listed_at: DateTime<Utc>,
    ) -> Result<Self, NegotiationError> {
        if asking_price.is_zero() {
            return Err(NegotiationError::invalid_listing(
                "asking price must be positive",
            ));
        }
        if bottom_price > asking_price {
            return Err(NegotiationError::invalid_listing(format!(
                "bottom price {bottom_price} exceeds asking price {asking_price}"
            )));
        }

        Ok(Self {
            id,
            asking_price,
            bottom_price,
            status: DealStatus::New,
            history: NegotiationHistory::new(),
            sold_for: None,
            listed_at,
            updated_at: listed_at,
            version: 0,
        })
    }

    pub fn id_typed(&self) -> LeadId {
        self.id
    }

    pub fn asking_price(&self) -> Money {
        self.asking_price
    }

    pub fn bottom_price(&self) -> Money {
        self.bottom_price
    }

    pub fn status(&self) -> DealStatus {
        self.status
    }

    pub fn history(&self) -> &NegotiationHistory {
        &self.history
    }

    pub fn sold_for(&self) -> Option<Money> {
        self.sold_for
    }

    pub fn listed_at(&self) -> DateTime<Utc> {
        self.listed_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Price both parties agreed to, once the deal left negotiation.
    pub fn agreed_price(&self) -> Option<Money> {
        if !self.status.is_agreed() {
            return None;
        }
        self.history.last_event().map(|e| e.amount)
    }

    /// Check the structural invariants of a lead, e.g. after loading a snapshot.
    pub fn validate(&self) -> Result<(), NegotiationError> {
        if self.bottom_price > self.asking_price {
            return Err(NegotiationError::invalid_listing(format!(
                "bottom price {} exceeds asking price {}",
                self.bottom_price, self.asking_price
            )));
        }

        match (self.status, self.sold_for) {
            (DealStatus::Sold, None) => {
                return Err(NegotiationError::invalid_listing("sold lead without a sale price"));
            }
            (status, Some(_)) if status != DealStatus::Sold => {
                return Err(NegotiationError::invalid_listing(format!(
                    "{status} lead carries a sale price"
                )));
            }
            _ => {}
        }

        let mut replay = NegotiationHistory::new();
        for event in self.history.iter() {
            replay.append(event.clone())?;
        }

        let last_actor = self.history.last_event().map(|e| e.actor);
        let consistent = match self.status {
            DealStatus::New => last_actor.is_none(),
            DealStatus::OfferMade => last_actor == Some(Actor::Investor),
            DealStatus::Countered => last_actor == Some(Actor::Seller),
            DealStatus::OfferDeclined
            | DealStatus::PendingContract
            | DealStatus::UnderContract
            | DealStatus::Sold => last_actor.is_some(),
        };
        if !consistent {
            return Err(NegotiationError::invalid_listing(format!(
                "history does not match status {}",
                self.status
            )));
        }

        Ok(())
    }

    fn record_offer(&mut self, actor: Actor, amount: Money, at: DateTime<Utc>) {
        self.history.push(OfferEvent::new(actor, amount, at));
    }
}

impl AggregateRoot for Lead {
    type Id = LeadId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Lead {
    type Command = LeadCommand;
    type Event = LeadEvent;
    type Error = NegotiationError;
    type Policy = NegotiationPolicy;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LeadEvent::OfferMade(e) => {
                if e.fresh_thread {
                    self.history.reset();
                }
                self.record_offer(Actor::Investor, e.amount, e.occurred_at);
                self.status = DealStatus::OfferMade;
            }
            LeadEvent::BoughtAtAskingPrice(e) => {
                self.record_offer(Actor::Investor, e.amount, e.occurred_at);
                self.status = DealStatus::PendingContract;
            }
            LeadEvent::CounterOffered(e) => {
                self.record_offer(Actor::Seller, e.amount, e.occurred_at);
                self.status = DealStatus::Countered;
            }
            LeadEvent::CounteredBack(e) => {
                self.record_offer(Actor::Investor, e.amount, e.occurred_at);
                self.status = DealStatus::OfferMade;
            }
            LeadEvent::CounterAccepted(_) | LeadEvent::OfferAccepted(_) => {
                self.status = DealStatus::PendingContract;
            }
            LeadEvent::OfferWithdrawn(_) => {
                self.history.reset();
                self.status = DealStatus::New;
            }
            LeadEvent::NegotiationDeclined(_) => {
                self.status = DealStatus::OfferDeclined;
            }
            LeadEvent::ContractSigned(_) => {
                self.status = DealStatus::UnderContract;
            }
            LeadEvent::SaleClosed(e) => {
                self.sold_for = Some(e.sold_for);
                self.status = DealStatus::Sold;
            }
        }

        self.updated_at = event.occurred_at();

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(
        &self,
        command: &Self::Command,
        policy: &Self::Policy,
    ) -> Result<Vec<Self::Event>, Self::Error> {
        machine::decide(self, command, policy)
    }
}
