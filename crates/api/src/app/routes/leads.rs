use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use dealroom_negotiation::{Actor, InvestorLeadView, Lead, Milestone, SellerLeadView};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_lead).get(list_leads))
        .route("/:id", get(get_lead))
        .route("/:id/seller", get(get_lead_for_seller))
        .route("/:id/actions", post(apply_action))
        .route("/:id/milestones", post(record_milestone))
}

/// List a lead once seller intake is complete. Responds with the seller view.
pub async fn create_lead(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateLeadRequest>,
) -> axum::response::Response {
    let now = services.now();
    match services.negotiation().list_lead(body.into(), now) {
        Ok(lead) => (
            StatusCode::CREATED,
            Json(SellerLeadView::new(&lead, now, services.policy())),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Investor-facing listing; bottom prices are never included.
pub async fn list_leads(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let now = services.now();
    match services.negotiation().leads() {
        Ok(leads) => {
            let items = leads
                .iter()
                .map(|lead| InvestorLeadView::new(lead, now, services.policy()))
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_lead(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let lead_id = match dto::parse_lead_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.negotiation().lead(lead_id) {
        Ok(lead) => view_for(&services, &lead, Actor::Investor),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_lead_for_seller(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let lead_id = match dto::parse_lead_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.negotiation().lead(lead_id) {
        Ok(lead) => view_for(&services, &lead, Actor::Seller),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Apply a negotiation action; responds with the acting party's view.
pub async fn apply_action(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::ActionRequest>,
) -> axum::response::Response {
    let lead_id = match dto::parse_lead_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let now = services.now();
    let negotiation = services.negotiation();
    let result = match body.expected_version {
        Some(version) => {
            negotiation.apply_action_at(lead_id, body.action, body.actor, now, version)
        }
        None => negotiation.apply_action(lead_id, body.action, body.actor, now),
    };

    match result {
        Ok(lead) => view_for(&services, &lead, body.actor),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Contract signature and closing are reported by the back office.
pub async fn record_milestone(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(milestone): Json<Milestone>,
) -> axum::response::Response {
    let lead_id = match dto::parse_lead_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.negotiation().record_milestone(lead_id, milestone, services.now()) {
        Ok(lead) => view_for(&services, &lead, Actor::Seller),
        Err(e) => errors::service_error_to_response(e),
    }
}

fn view_for(services: &AppServices, lead: &Lead, actor: Actor) -> axum::response::Response {
    let now = services.now();
    match actor {
        Actor::Investor => {
            (StatusCode::OK, Json(InvestorLeadView::new(lead, now, services.policy()))).into_response()
        }
        Actor::Seller => {
            (StatusCode::OK, Json(SellerLeadView::new(lead, now, services.policy()))).into_response()
        }
    }
}
