//! Commands accepted by the lead aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::Actor;
use crate::money::Money;

/// A negotiation move by one of the two parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum NegotiationAction {
    MakeOffer(Money),
    Counteroffer(Money),
    CounterBack(Money),
    AcceptCounter,
    AcceptOffer,
    WithdrawOffer,
    BuyAtAskingPrice,
}

impl NegotiationAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            NegotiationAction::MakeOffer(_) => ActionKind::MakeOffer,
            NegotiationAction::Counteroffer(_) => ActionKind::Counteroffer,
            NegotiationAction::CounterBack(_) => ActionKind::CounterBack,
            NegotiationAction::AcceptCounter => ActionKind::AcceptCounter,
            NegotiationAction::AcceptOffer => ActionKind::AcceptOffer,
            NegotiationAction::WithdrawOffer => ActionKind::WithdrawOffer,
            NegotiationAction::BuyAtAskingPrice => ActionKind::BuyAtAskingPrice,
        }
    }
}

/// External deal milestones reported after agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Milestone {
    ContractSigned,
    ClosingCompleted { sold_for: Money },
}

impl Milestone {
    pub fn kind(&self) -> ActionKind {
        match self {
            Milestone::ContractSigned => ActionKind::ContractSigned,
            Milestone::ClosingCompleted { .. } => ActionKind::ClosingCompleted,
        }
    }
}

/// Amount-free name of an action, used in errors and action menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    MakeOffer,
    Counteroffer,
    CounterBack,
    AcceptCounter,
    AcceptOffer,
    WithdrawOffer,
    BuyAtAskingPrice,
    ContractSigned,
    ClosingCompleted,
}

impl ActionKind {
    /// Negotiation actions in menu order.
    pub const NEGOTIATION: [ActionKind; 7] = [
        ActionKind::MakeOffer,
        ActionKind::BuyAtAskingPrice,
        ActionKind::Counteroffer,
        ActionKind::AcceptOffer,
        ActionKind::CounterBack,
        ActionKind::AcceptCounter,
        ActionKind::WithdrawOffer,
    ];

    /// The only party allowed to take this action; `None` for milestones.
    pub fn actor(self) -> Option<Actor> {
        match self {
            ActionKind::MakeOffer
            | ActionKind::CounterBack
            | ActionKind::AcceptCounter
            | ActionKind::WithdrawOffer
            | ActionKind::BuyAtAskingPrice => Some(Actor::Investor),
            ActionKind::Counteroffer | ActionKind::AcceptOffer => Some(Actor::Seller),
            ActionKind::ContractSigned | ActionKind::ClosingCompleted => None,
        }
    }
}

impl core::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            ActionKind::MakeOffer => "make offer",
            ActionKind::Counteroffer => "counteroffer",
            ActionKind::CounterBack => "counter back",
            ActionKind::AcceptCounter => "accept counter",
            ActionKind::AcceptOffer => "accept offer",
            ActionKind::WithdrawOffer => "withdraw offer",
            ActionKind::BuyAtAskingPrice => "buy at asking price",
            ActionKind::ContractSigned => "sign contract",
            ActionKind::ClosingCompleted => "complete closing",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadCommand {
    Negotiate {
        action: NegotiationAction,
        actor: Actor,
        at: DateTime<Utc>,
    },
    Milestone {
        milestone: Milestone,
        at: DateTime<Utc>,
    },
}

impl LeadCommand {
    pub fn negotiate(action: NegotiationAction, actor: Actor, at: DateTime<Utc>) -> Self {
        LeadCommand::Negotiate { action, actor, at }
    }

    pub fn milestone(milestone: Milestone, at: DateTime<Utc>) -> Self {
        LeadCommand::Milestone { milestone, at }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            LeadCommand::Negotiate { at, .. } | LeadCommand::Milestone { at, .. } => *at,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            LeadCommand::Negotiate { action, .. } => action.kind(),
            LeadCommand::Milestone { milestone, .. } => milestone.kind(),
        }
    }
}
