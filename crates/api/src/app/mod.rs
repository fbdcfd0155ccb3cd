//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: negotiation service, clock and notification fan-out
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use dealroom_infra::{Clock, DealroomConfig};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Must be called from within a Tokio runtime: notification fan-out runs on
/// a blocking task.
pub async fn build_app(config: &DealroomConfig, clock: Arc<dyn Clock>) -> Router {
    let services = Arc::new(services::build_services(config, clock));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
