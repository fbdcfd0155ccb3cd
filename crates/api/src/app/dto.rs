use axum::http::StatusCode;
use serde::Deserialize;

use dealroom_core::LeadId;
use dealroom_infra::NewListing;
use dealroom_negotiation::{Actor, Money, NegotiationAction};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

/// Amounts are integer minor units (cents).
#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub lead_id: Option<LeadId>,
    pub asking_price: Money,
    pub bottom_price: Money,
}

impl From<CreateLeadRequest> for NewListing {
    fn from(body: CreateLeadRequest) -> Self {
        NewListing {
            lead_id: body.lead_id,
            asking_price: body.asking_price,
            bottom_price: body.bottom_price,
        }
    }
}

/// `{"actor": "investor", "action": {"type": "make_offer", "amount": 20000000}}`
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub actor: Actor,
    pub action: NegotiationAction,
    /// When set, the action only applies if the lead is still at this version.
    pub expected_version: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    /// Only deliver notifications addressed to this party.
    pub role: Option<Actor>,
}

// -------------------------
// Parsing helpers
// -------------------------

pub fn parse_lead_id(raw: &str) -> Result<LeadId, axum::response::Response> {
    raw.parse::<LeadId>()
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}
