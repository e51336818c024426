use axum::{
    body::Bytes,
    extract::{self, FromRequest, Request},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;
use tracer_admission::{AdmissionRequest, AdmissionResponse, admission_review};
use tracing::{Span, debug, warn};

use crate::api::{api_error::ApiError, state::ApiServerState};

// Raw request body. Failing to read it, e.g. because it is too large,
// is reported with the same JSON error payload as a malformed review.
pub(crate) struct ReviewBody(Bytes);

impl<S> FromRequest<S> for ReviewBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await?;
        Ok(Self(body))
    }
}

// The body is read as raw bytes, instead of using the `Json` extractor,
// because the envelope must be sent back exactly as it was received.
#[tracing::instrument(
    name = "mutation",
    fields(
        request_uid=tracing::field::Empty,
        host=crate::config::HOSTNAME.as_str(),
        username=tracing::field::Empty,
        allowed=tracing::field::Empty,
        mutated=tracing::field::Empty,
    ),
    skip_all)]
/// Decide whether the trace annotation has to be removed from the object under review.
pub(crate) async fn mutate_handler(
    extract::State(state): extract::State<Arc<ApiServerState>>,
    ReviewBody(body): ReviewBody,
) -> Result<impl IntoResponse, (StatusCode, ApiError)> {
    let review = admission_review::decode(&body).map_err(|e| {
        warn!(error = %e, "bad admission review");
        into_status_and_error(ApiError::from(e))
    })?;

    populate_span_with_admission_request_data(&review.request);

    let response = state.engine.decide(&review.request);

    populate_span_with_decision(&response);
    debug!(response =? &response, "admission request evaluated");

    let payload = admission_review::encode(&review.envelope, &response).map_err(|e| {
        tracing::error!(error = %e, "cannot build admission review response");
        into_status_and_error(ApiError::from(e))
    })?;

    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        payload,
    ))
}

pub(crate) async fn readiness_handler() -> StatusCode {
    StatusCode::OK
}

fn populate_span_with_admission_request_data(adm_req: &AdmissionRequest) {
    Span::current().record("request_uid", adm_req.uid.as_str());
    Span::current().record("username", adm_req.username.as_str());
}

fn populate_span_with_decision(response: &AdmissionResponse) {
    Span::current().record("allowed", response.allowed());
    Span::current().record("mutated", response.is_mutating());
}

fn into_status_and_error(error: ApiError) -> (StatusCode, ApiError) {
    (error.status, error)
}
