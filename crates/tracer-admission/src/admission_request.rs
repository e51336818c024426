use k8s_openapi::api::authentication::v1::UserInfo;
use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use serde::Deserialize;

/// The subset of admission/v1/AdmissionRequest the decision engine works with.
///
/// Built once per review by the codec, read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct AdmissionRequest {
    /// Correlation token, copied over to the response without being looked at.
    pub uid: String,

    /// Name of the user performing the operation. Empty when the
    /// orchestrator did not provide one.
    pub username: String,

    /// The resource being admitted. `Null` when the review has no object,
    /// as it happens with DELETE operations.
    pub object: serde_json::Value,
}

impl AdmissionRequest {
    pub fn new(
        uid: impl Into<String>,
        username: impl Into<String>,
        object: serde_json::Value,
    ) -> Self {
        AdmissionRequest {
            uid: uid.into(),
            username: username.into(),
            object,
        }
    }
}

/// Wire representation of `request`. Fields that are not consumed are
/// ignored by serde.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AdmissionRequestWire {
    pub uid: String,
    #[serde(default)]
    pub user_info: Option<UserInfo>,
    #[serde(default)]
    pub object: Option<RawExtension>,
}

impl From<AdmissionRequestWire> for AdmissionRequest {
    fn from(wire: AdmissionRequestWire) -> Self {
        AdmissionRequest {
            uid: wire.uid,
            username: wire
                .user_info
                .and_then(|user_info| user_info.username)
                .unwrap_or_default(),
            object: wire.object.map(|raw| raw.0).unwrap_or_default(),
        }
    }
}
