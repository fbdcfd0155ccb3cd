use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{sse::Event as SseEvent, IntoResponse},
    Json,
};

use dealroom_infra::PipelineSummary;

use crate::app::dto::StreamQuery;
use crate::app::errors;
use crate::app::services::{self, AppServices};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Dashboard headline figures across all leads.
pub async fn pipeline(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.negotiation().leads() {
        Ok(leads) => (StatusCode::OK, Json(PipelineSummary::from_leads(&leads))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<StreamQuery>,
) -> axum::response::Sse<impl tokio_stream::Stream<Item = Result<SseEvent, std::convert::Infallible>>> {
    services::notification_sse_stream(services, query.role)
}
