use chrono::Duration;
use thiserror::Error;

use dealroom_core::LeadId;

use crate::command::ActionKind;
use crate::lead::DealStatus;
use crate::policy::CooldownPolicy;

/// Negotiation failures, reported synchronously to the caller.
///
/// Every variant names the unmet condition so it can be shown to the user
/// as-is. Nothing here is retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    #[error("cannot {action} while lead is {status}: {reason}")]
    InvalidTransition {
        status: DealStatus,
        action: ActionKind,
        reason: String,
    },

    #[error("{action} would open round {attempted_round}, but negotiations are capped at {max_rounds} rounds")]
    RoundLimitExceeded {
        action: ActionKind,
        attempted_round: u32,
        max_rounds: u32,
    },

    #[error("a new offer is allowed in {}", remaining_label(.remaining))]
    CooldownActive { remaining: Duration },

    #[error("ordering violation: {0}")]
    OrderingViolation(String),

    #[error("lead {0} not found")]
    LeadNotFound(LeadId),

    #[error("{action} is not available while lead is {status}")]
    UnsupportedActionForState {
        status: DealStatus,
        action: ActionKind,
    },

    #[error("invalid listing: {0}")]
    InvalidListing(String),
}

fn remaining_label(remaining: &Duration) -> String {
    CooldownPolicy::format_remaining(*remaining)
}

impl NegotiationError {
    pub fn invalid(status: DealStatus, action: ActionKind, reason: impl Into<String>) -> Self {
        Self::InvalidTransition {
            status,
            action,
            reason: reason.into(),
        }
    }

    pub fn ordering(msg: impl Into<String>) -> Self {
        Self::OrderingViolation(msg.into())
    }

    pub fn invalid_listing(msg: impl Into<String>) -> Self {
        Self::InvalidListing(msg.into())
    }
}
