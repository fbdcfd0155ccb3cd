//! Offer negotiation domain module.
//!
//! Business rules for how a listed property moves from first offer to a
//! closed sale, implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage, no clock reads).

pub mod actions;
pub mod command;
pub mod error;
pub mod event;
pub mod lead;
pub mod ledger;
pub mod machine;
pub mod money;
pub mod notification;
pub mod policy;
pub mod view;

pub use actions::available_actions;
pub use command::{ActionKind, LeadCommand, Milestone, NegotiationAction};
pub use error::NegotiationError;
pub use event::LeadEvent;
pub use lead::{DealStatus, Lead};
pub use ledger::{Actor, NegotiationHistory, OfferEvent};
pub use machine::transition;
pub use money::Money;
pub use notification::{NotificationIntent, NotificationKind};
pub use policy::{CooldownPolicy, NegotiationPolicy, RoundLimitPolicy};
pub use view::{InvestorLeadView, LeadSummary, SellerLeadView};
