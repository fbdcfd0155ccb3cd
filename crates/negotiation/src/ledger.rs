//! Append-only offer history for one lead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NegotiationError;
use crate::money::Money;

/// Who made an offer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Seller,
    Investor,
}

impl core::fmt::Display for Actor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Actor::Seller => f.write_str("seller"),
            Actor::Investor => f.write_str("investor"),
        }
    }
}

/// One priced move in a negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferEvent {
    pub actor: Actor,
    pub amount: Money,
    pub timestamp: DateTime<Utc>,
}

impl OfferEvent {
    pub fn new(actor: Actor, amount: Money, timestamp: DateTime<Utc>) -> Self {
        Self {
            actor,
            amount,
            timestamp,
        }
    }
}

/// Ordered sequence of offers. Insertion order defines rounds.
///
/// Invariants (enforced by [`NegotiationHistory::append`]):
/// - timestamps are non-decreasing
/// - actors strictly alternate
/// - no entry appears twice within a thread
///
/// A fresh thread starts only through [`NegotiationHistory::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NegotiationHistory {
    events: Vec<OfferEvent>,
}

impl NegotiationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `event` could be appended without mutating.
    pub fn ensure_appendable(&self, event: &OfferEvent) -> Result<(), NegotiationError> {
        let Some(last) = self.events.last() else {
            return Ok(());
        };

        if event.timestamp < last.timestamp {
            return Err(NegotiationError::OrderingViolation(format!(
                "offer at {} precedes the last recorded offer at {}",
                event.timestamp, last.timestamp
            )));
        }

        if event.actor == last.actor {
            return Err(NegotiationError::OrderingViolation(format!(
                "{} cannot make two consecutive offers",
                event.actor
            )));
        }

        if self.events.contains(event) {
            return Err(NegotiationError::OrderingViolation(format!(
                "{} offer of {} at {} is already recorded",
                event.actor, event.amount, event.timestamp
            )));
        }

        Ok(())
    }

    pub fn append(&mut self, event: OfferEvent) -> Result<(), NegotiationError> {
        self.ensure_appendable(&event)?;
        self.events.push(event);
        Ok(())
    }

    /// Unchecked append for replaying events whose ordering was already validated.
    pub(crate) fn push(&mut self, event: OfferEvent) {
        self.events.push(event);
    }

    pub fn last_event(&self) -> Option<&OfferEvent> {
        self.events.last()
    }

    pub fn last_event_by(&self, actor: Actor) -> Option<&OfferEvent> {
        self.events.iter().rev().find(|e| e.actor == actor)
    }

    /// `ceil(len / 2)`: an offer and its counter form one round.
    pub fn round(&self) -> u32 {
        round_for_len(self.events.len())
    }

    /// Round the next appended entry would belong to.
    pub fn round_after_next(&self) -> u32 {
        round_for_len(self.events.len() + 1)
    }

    pub fn reset(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OfferEvent> {
        self.events.iter()
    }

    pub fn events(&self) -> &[OfferEvent] {
        &self.events
    }
}

fn round_for_len(len: usize) -> u32 {
    u32::try_from(len.div_ceil(2)).unwrap_or(u32::MAX)
}

impl<'a> IntoIterator for &'a NegotiationHistory {
    type Item = &'a OfferEvent;
    type IntoIter = core::slice::Iter<'a, OfferEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
