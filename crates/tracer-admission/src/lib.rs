pub mod admission_request;
pub mod admission_response;
pub mod admission_review;
pub mod constants;
pub mod document;
pub mod engine;
pub mod errors;
pub mod patch;

pub use admission_request::AdmissionRequest;
pub use admission_response::{AdmissionResponse, Decision};
pub use admission_review::{DecodedReview, ReviewEnvelope, decode, encode};
pub use engine::{DecisionEngine, EngineConfig};
pub use errors::{DecodeError, EncodeError};
