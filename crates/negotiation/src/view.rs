//! Read models for the two parties.
//!
//! The investor view is built from [`LeadSummary`], which has no bottom-price
//! field at all; only [`SellerLeadView`] adds it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dealroom_core::{AggregateRoot, LeadId};

use crate::actions::available_actions;
use crate::command::ActionKind;
use crate::lead::{DealStatus, Lead};
use crate::ledger::{Actor, OfferEvent};
use crate::money::Money;
use crate::policy::{CooldownPolicy, NegotiationPolicy};

/// Fields both parties may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSummary {
    pub id: LeadId,
    pub asking_price: Money,
    pub status: DealStatus,
    pub status_label: String,
    pub history: Vec<OfferEvent>,
    pub round: u32,
    pub max_rounds: u32,
    pub is_final_round: bool,
    pub last_investor_offer: Option<Money>,
    pub last_seller_offer: Option<Money>,
    pub agreed_price: Option<Money>,
    pub sold_for: Option<Money>,
    pub cooldown_remaining_seconds: Option<i64>,
    pub cooldown_label: Option<String>,
    pub listed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl LeadSummary {
    pub fn new(lead: &Lead, now: DateTime<Utc>, policy: &NegotiationPolicy) -> Self {
        let history = lead.history();

        let cooldown_remaining = if lead.status() == DealStatus::OfferDeclined {
            history
                .last_event()
                .and_then(|last| policy.cooldown.time_remaining(last.timestamp, now))
        } else {
            None
        };

        Self {
            id: lead.id_typed(),
            asking_price: lead.asking_price(),
            status: lead.status(),
            status_label: lead.status().to_string(),
            history: history.events().to_vec(),
            round: history.round(),
            max_rounds: policy.rounds.max_rounds,
            is_final_round: policy.rounds.is_final_round(history),
            last_investor_offer: history.last_event_by(Actor::Investor).map(|e| e.amount),
            last_seller_offer: history.last_event_by(Actor::Seller).map(|e| e.amount),
            agreed_price: lead.agreed_price(),
            sold_for: lead.sold_for(),
            cooldown_remaining_seconds: cooldown_remaining.map(|d| d.num_seconds()),
            cooldown_label: cooldown_remaining.map(CooldownPolicy::format_remaining),
            listed_at: lead.listed_at(),
            updated_at: lead.updated_at(),
            version: lead.version(),
        }
    }
}

/// What an investor sees. Never carries the bottom price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorLeadView {
    #[serde(flatten)]
    pub summary: LeadSummary,
    pub available_actions: Vec<ActionKind>,
}

impl InvestorLeadView {
    pub fn new(lead: &Lead, now: DateTime<Utc>, policy: &NegotiationPolicy) -> Self {
        Self {
            summary: LeadSummary::new(lead, now, policy),
            available_actions: available_actions(lead, Actor::Investor, now, policy),
        }
    }
}

/// What the listing seller sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerLeadView {
    #[serde(flatten)]
    pub summary: LeadSummary,
    pub bottom_price: Money,
    pub available_actions: Vec<ActionKind>,
}

impl SellerLeadView {
    pub fn new(lead: &Lead, now: DateTime<Utc>, policy: &NegotiationPolicy) -> Self {
        Self {
            summary: LeadSummary::new(lead, now, policy),
            bottom_price: lead.bottom_price(),
            available_actions: available_actions(lead, Actor::Seller, now, policy),
        }
    }
}
