//! Conversion between the admission.k8s.io AdmissionReview envelope and the
//! typed request/response handled by the decision engine.

use serde::{Deserialize, Serialize};

use crate::admission_request::{AdmissionRequest, AdmissionRequestWire};
use crate::admission_response::{AdmissionResponse, AdmissionResponseWire};
use crate::errors::{DecodeError, EncodeError};

/// `apiVersion` and `kind` of the inbound review. The response must be
/// sent back with the very same values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecodedReview {
    pub envelope: ReviewEnvelope,
    pub request: AdmissionRequest,
}

#[derive(Deserialize)]
struct AdmissionReviewRequest {
    #[serde(flatten)]
    envelope: ReviewEnvelope,

    #[serde(default)]
    request: Option<serde_json::Value>,
}

/// The AdmissionReview sent back to the orchestrator
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdmissionReviewResponse {
    #[serde(flatten)]
    pub envelope: ReviewEnvelope,

    pub response: AdmissionResponseWire,
}

/// Parses the raw body of an admission review
pub fn decode(raw: &[u8]) -> Result<DecodedReview, DecodeError> {
    let review: AdmissionReviewRequest = serde_json::from_slice(raw).map_err(DecodeError::Json)?;
    let request = review.request.ok_or(DecodeError::MissingRequest)?;
    let request: AdmissionRequestWire =
        serde_json::from_value(request).map_err(DecodeError::InvalidRequest)?;

    Ok(DecodedReview {
        envelope: review.envelope,
        request: request.into(),
    })
}

/// Serializes `response` inside of an AdmissionReview carrying `envelope`
pub fn encode(
    envelope: &ReviewEnvelope,
    response: &AdmissionResponse,
) -> Result<Vec<u8>, EncodeError> {
    let review = AdmissionReviewResponse {
        envelope: envelope.clone(),
        response: AdmissionResponseWire::try_from(response)?,
    };

    serde_json::to_vec(&review).map_err(EncodeError::Review)
}
