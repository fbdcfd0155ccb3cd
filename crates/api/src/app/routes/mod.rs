use axum::{routing::get, Router};

pub mod leads;
pub mod system;

/// Router for all lead and dashboard endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/pipeline", get(system::pipeline))
        .route("/notifications/stream", get(system::stream))
        .nest("/leads", leads::router())
}
