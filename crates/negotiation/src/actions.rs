//! Which actions a party can take right now (dashboard action menus).

use chrono::{DateTime, Utc};

use crate::command::ActionKind;
use crate::lead::{DealStatus, Lead};
use crate::ledger::Actor;
use crate::policy::NegotiationPolicy;

/// Actions `actor` may take on `lead` at `now`, in menu order.
///
/// Amount-carrying actions are listed when *some* amount would be accepted;
/// the amount guards themselves still run when the action is submitted.
/// Counters are hidden once the round cap is reached, and a new offer is
/// hidden while the decline cooldown runs.
pub fn available_actions(
    lead: &Lead,
    actor: Actor,
    now: DateTime<Utc>,
    policy: &NegotiationPolicy,
) -> Vec<ActionKind> {
    if now < lead.updated_at() {
        return Vec::new();
    }

    let history = lead.history();
    let can_counter = !policy.rounds.would_exceed(history);
    let cooling_down = history
        .last_event()
        .and_then(|last| policy.cooldown.time_remaining(last.timestamp, now))
        .is_some();

    let candidates: &[ActionKind] = match lead.status() {
        DealStatus::New => &[ActionKind::MakeOffer, ActionKind::BuyAtAskingPrice],
        DealStatus::OfferMade if can_counter => &[
            ActionKind::Counteroffer,
            ActionKind::AcceptOffer,
            ActionKind::WithdrawOffer,
        ],
        DealStatus::OfferMade => &[ActionKind::AcceptOffer, ActionKind::WithdrawOffer],
        DealStatus::Countered if can_counter => &[
            ActionKind::CounterBack,
            ActionKind::AcceptCounter,
            ActionKind::WithdrawOffer,
        ],
        DealStatus::Countered => &[ActionKind::AcceptCounter, ActionKind::WithdrawOffer],
        DealStatus::OfferDeclined if cooling_down => &[],
        DealStatus::OfferDeclined => &[ActionKind::MakeOffer],
        DealStatus::PendingContract | DealStatus::UnderContract | DealStatus::Sold => &[],
    };

    candidates
        .iter()
        .copied()
        .filter(|kind| kind.actor() == Some(actor))
        .collect()
}
