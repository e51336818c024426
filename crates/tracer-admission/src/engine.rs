use tracing::debug;

use crate::admission_request::AdmissionRequest;
use crate::admission_response::AdmissionResponse;
use crate::constants::TRACE_ID_ANNOTATION;
use crate::document::{Node, lookup};
use crate::patch::{Patch, PatchOperation, pointer};

const ANNOTATIONS_PATH: [&str; 2] = ["metadata", "annotations"];

/// Settings of the decision engine, provided once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// The identity of the controller owning the annotation. Requests made
    /// by it are never patched.
    pub trusted_identity: String,

    /// Name of the annotation stripped from objects written by anybody else
    pub annotation: String,
}

impl EngineConfig {
    pub fn new(trusted_identity: impl Into<String>) -> Self {
        EngineConfig {
            trusted_identity: trusted_identity.into(),
            annotation: TRACE_ID_ANNOTATION.to_owned(),
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }
}

/// Decides whether the trace annotation has to be removed from an object.
///
/// The engine holds no mutable state: it can be shared between threads and
/// the same request always leads to the same response.
#[derive(Clone, Debug)]
pub struct DecisionEngine {
    config: EngineConfig,
    annotation_path: String,
}

impl DecisionEngine {
    pub fn new(config: EngineConfig) -> Self {
        let annotation_path = pointer(
            ANNOTATIONS_PATH
                .iter()
                .copied()
                .chain(std::iter::once(config.annotation.as_str())),
        );

        DecisionEngine {
            config,
            annotation_path,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The JSON pointer of the annotation inside of the object
    pub fn annotation_path(&self) -> &str {
        &self.annotation_path
    }

    pub fn decide(&self, request: &AdmissionRequest) -> AdmissionResponse {
        if request.username == self.config.trusted_identity {
            debug!(
                request_uid = request.uid.as_str(),
                "request made by trusted identity, nothing to patch"
            );
            return AdmissionResponse::allow(request.uid.clone());
        }

        if !self.has_annotation(&request.object) {
            return AdmissionResponse::allow(request.uid.clone());
        }

        debug!(
            request_uid = request.uid.as_str(),
            username = request.username.as_str(),
            annotation = self.config.annotation.as_str(),
            "removing annotation set by untrusted identity"
        );
        let patch = Patch::from(vec![PatchOperation::Remove {
            path: self.annotation_path.clone(),
        }]);

        AdmissionResponse::allow_with_patch(request.uid.clone(), patch)
    }

    fn has_annotation(&self, object: &serde_json::Value) -> bool {
        let annotations = lookup(Node::from(object), &ANNOTATIONS_PATH);
        annotations.get(&self.config.annotation).is_present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission_response::Decision;
    use rstest::*;
    use serde_json::{Value, json};

    const TRUSTED: &str = "tracer-controller";

    fn engine() -> DecisionEngine {
        DecisionEngine::new(EngineConfig::new(TRUSTED).with_annotation("trace-id"))
    }

    fn remove_annotation_patch(path: &str) -> Patch {
        Patch::from(vec![PatchOperation::Remove {
            path: path.to_owned(),
        }])
    }

    #[test]
    fn default_annotation() {
        let config = EngineConfig::new(TRUSTED);
        assert_eq!(config.annotation, TRACE_ID_ANNOTATION);

        let engine = DecisionEngine::new(config);
        assert_eq!(
            engine.annotation_path(),
            "/metadata/annotations/kubetracer.io~1trace-id"
        );
    }

    #[rstest]
    #[case::with_annotation(json!({"metadata": {"annotations": {"trace-id": "abc123"}}}))]
    #[case::without_annotation(json!({"metadata": {"annotations": {}}}))]
    #[case::without_metadata(json!({"spec": {}}))]
    #[case::without_object(Value::Null)]
    fn trusted_identity_is_never_patched(#[case] object: Value) {
        let request = AdmissionRequest::new("uid", TRUSTED, object);

        let response = engine().decide(&request);
        assert_eq!(response, AdmissionResponse::allow("uid".to_owned()));
    }

    #[rstest]
    #[case::string_value(json!("abc123"))]
    #[case::empty_value(json!(""))]
    #[case::null_value(Value::Null)]
    #[case::object_value(json!({"nested": true}))]
    fn untrusted_identity_with_annotation_is_patched(#[case] value: Value) {
        let object = json!({
            "metadata": {"name": "nginx", "annotations": {"trace-id": value, "other": "keep"}}
        });
        let request = AdmissionRequest::new("uid", "alice", object);

        let response = engine().decide(&request);
        assert!(response.allowed());
        assert_eq!(response.uid, "uid");
        assert_eq!(
            response.decision,
            Decision::AllowWithPatch(remove_annotation_patch("/metadata/annotations/trace-id"))
        );
    }

    #[rstest]
    #[case::other_annotations(json!({"metadata": {"annotations": {"other": "abc123"}}}))]
    #[case::no_annotations(json!({"metadata": {}}))]
    #[case::no_metadata(json!({"kind": "Pod"}))]
    #[case::annotations_wrong_shape(json!({"metadata": {"annotations": ["trace-id"]}}))]
    #[case::metadata_wrong_shape(json!({"metadata": "trace-id"}))]
    #[case::annotation_in_labels(json!({"metadata": {"labels": {"trace-id": "abc123"}}}))]
    #[case::no_object(Value::Null)]
    fn untrusted_identity_without_annotation_is_allowed(#[case] object: Value) {
        let request = AdmissionRequest::new("uid", "alice", object);

        let response = engine().decide(&request);
        assert_eq!(response, AdmissionResponse::allow("uid".to_owned()));
    }

    #[test]
    fn empty_username_is_not_trusted() {
        let request = AdmissionRequest::new(
            "uid",
            "",
            json!({"metadata": {"annotations": {"trace-id": "abc123"}}}),
        );

        assert!(engine().decide(&request).is_mutating());
    }

    #[test]
    fn identity_comparison_is_exact() {
        let request = AdmissionRequest::new(
            "uid",
            "Tracer-Controller",
            json!({"metadata": {"annotations": {"trace-id": "abc123"}}}),
        );

        assert!(engine().decide(&request).is_mutating());
    }

    #[test]
    fn annotation_name_is_escaped() {
        let engine = DecisionEngine::new(EngineConfig::new(TRUSTED).with_annotation("a/b~c"));
        let request = AdmissionRequest::new(
            "uid",
            "alice",
            json!({"metadata": {"annotations": {"a/b~c": "abc123"}}}),
        );

        let response = engine.decide(&request);
        assert_eq!(
            response.patch(),
            Some(&remove_annotation_patch("/metadata/annotations/a~1b~0c"))
        );
    }

    #[test]
    fn decision_is_repeatable() {
        let engine = engine();
        let request = AdmissionRequest::new(
            "uid",
            "alice",
            json!({"metadata": {"annotations": {"trace-id": "abc123"}}}),
        );

        assert_eq!(engine.decide(&request), engine.decide(&request));
    }
}
