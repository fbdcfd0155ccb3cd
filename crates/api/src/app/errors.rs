use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use dealroom_infra::ServiceError;
use dealroom_negotiation::NegotiationError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Negotiation(e) => negotiation_error_to_response(e),
        ServiceError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        ServiceError::Storage(msg) => {
            tracing::error!(error = %msg, "storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg)
        }
    }
}

pub fn negotiation_error_to_response(err: NegotiationError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        NegotiationError::LeadNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "lead_not_found", message)
        }
        NegotiationError::InvalidTransition { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_transition", message)
        }
        NegotiationError::UnsupportedActionForState { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "unsupported_action", message)
        }
        NegotiationError::RoundLimitExceeded { .. } => {
            json_error(StatusCode::CONFLICT, "round_limit_exceeded", message)
        }
        NegotiationError::OrderingViolation(_) => {
            json_error(StatusCode::CONFLICT, "ordering_violation", message)
        }
        NegotiationError::InvalidListing(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_listing", message)
        }
        NegotiationError::CooldownActive { remaining } => (
            StatusCode::TOO_MANY_REQUESTS,
            axum::Json(json!({
                "error": "cooldown_active",
                "message": message,
                "remaining_seconds": remaining.num_seconds(),
            })),
        )
            .into_response(),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
