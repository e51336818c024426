use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use crate::errors::EncodeError;
use crate::patch::Patch;

/// What the webhook decided about a request. Requests are never denied,
/// the only difference is whether the object has to be patched first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    AllowWithPatch(Patch),
}

/// The outcome of one admission request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionResponse {
    /// Copied over from the corresponding request
    pub uid: String,
    pub decision: Decision,
}

impl AdmissionResponse {
    pub fn allow(uid: String) -> Self {
        AdmissionResponse {
            uid,
            decision: Decision::Allow,
        }
    }

    pub fn allow_with_patch(uid: String, patch: Patch) -> Self {
        AdmissionResponse {
            uid,
            decision: Decision::AllowWithPatch(patch),
        }
    }

    pub fn allowed(&self) -> bool {
        true
    }

    pub fn patch(&self) -> Option<&Patch> {
        match &self.decision {
            Decision::Allow => None,
            Decision::AllowWithPatch(patch) => Some(patch),
        }
    }

    pub fn is_mutating(&self) -> bool {
        self.patch().is_some()
    }
}

/// PatchType is the type of patch being used to represent the mutated object
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
pub enum PatchType {
    #[serde(rename = "JSONPatch")]
    #[default]
    JSONPatch,
}

/// This models the admission/v1/AdmissionResponse object of Kubernetes, limited
/// to the fields this webhook fills.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionResponseWire {
    pub uid: String,

    pub allowed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_type: Option<PatchType>,

    /// Base64 encoded JSONPatch document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
}

impl AdmissionResponseWire {
    /// Decodes the base64 `patch` field back into a list of operations.
    /// Returns `None` when the response carries no patch or the patch is
    /// not valid.
    pub fn decoded_patch(&self) -> Option<Patch> {
        let encoded = self.patch.as_ref()?;
        let raw = general_purpose::STANDARD.decode(encoded).ok()?;
        serde_json::from_slice(&raw).ok()
    }
}

impl TryFrom<&AdmissionResponse> for AdmissionResponseWire {
    type Error = EncodeError;

    fn try_from(response: &AdmissionResponse) -> Result<Self, Self::Error> {
        let (patch_type, patch) = match response.patch() {
            Some(patch) => {
                let patch = serde_json::to_vec(patch)
                    .map(|raw| general_purpose::STANDARD.encode(raw))
                    .map_err(EncodeError::Patch)?;
                (Some(PatchType::JSONPatch), Some(patch))
            }
            None => (None, None),
        };

        Ok(AdmissionResponseWire {
            uid: response.uid.clone(),
            allowed: response.allowed(),
            patch_type,
            patch,
        })
    }
}
