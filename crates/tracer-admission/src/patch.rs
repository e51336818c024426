use serde::{Deserialize, Serialize};

/// A single RFC 6902 operation.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: serde_json::Value },
    Remove { path: String },
    Replace { path: String, value: serde_json::Value },
}

impl PatchOperation {
    pub fn path(&self) -> &str {
        match self {
            PatchOperation::Add { path, .. }
            | PatchOperation::Remove { path }
            | PatchOperation::Replace { path, .. } => path,
        }
    }
}

/// An ordered list of operations, serialized as a plain JSON array
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(transparent)]
pub struct Patch(pub Vec<PatchOperation>);

impl Patch {
    pub fn operations(&self) -> &[PatchOperation] {
        &self.0
    }
}

impl From<Vec<PatchOperation>> for Patch {
    fn from(operations: Vec<PatchOperation>) -> Self {
        Patch(operations)
    }
}

/// Escapes one reference token of a JSON pointer (RFC 6901, section 3).
///
/// `~` has to be replaced before `/`, otherwise the `~` introduced by `~1`
/// would be escaped again.
pub fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Builds a JSON pointer out of raw, unescaped reference tokens
pub fn pointer<'a>(tokens: impl IntoIterator<Item = &'a str>) -> String {
    tokens
        .into_iter()
        .map(|token| format!("/{}", escape_token(token)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use serde_json::json;

    #[rstest]
    #[case::plain("trace-id", "trace-id")]
    #[case::slash("kubetracer.io/trace-id", "kubetracer.io~1trace-id")]
    #[case::tilde("a~b", "a~0b")]
    #[case::tilde_then_slash("~/", "~0~1")]
    #[case::escaped_sequence_is_escaped_again("~1", "~01")]
    #[case::empty("", "")]
    fn escape_reference_token(#[case] token: &str, #[case] expected: &str) {
        assert_eq!(escape_token(token), expected);
    }

    #[test]
    fn build_pointer() {
        assert_eq!(
            pointer(["metadata", "annotations", "kubetracer.io/trace-id"]),
            "/metadata/annotations/kubetracer.io~1trace-id"
        );
        assert_eq!(pointer(Vec::<&str>::new()), "");
    }

    #[test]
    fn serialize_operations() {
        let patch = Patch::from(vec![
            PatchOperation::Remove {
                path: "/metadata/annotations/trace-id".to_owned(),
            },
            PatchOperation::Add {
                path: "/metadata/labels/app".to_owned(),
                value: json!("tracer"),
            },
            PatchOperation::Replace {
                path: "/spec/replicas".to_owned(),
                value: json!(3),
            },
        ]);

        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!([
                {"op": "remove", "path": "/metadata/annotations/trace-id"},
                {"op": "add", "path": "/metadata/labels/app", "value": "tracer"},
                {"op": "replace", "path": "/spec/replicas", "value": 3},
            ])
        );
    }

    #[test]
    fn deserialize_operations() {
        let patch: Patch = serde_json::from_value(json!([
            {"op": "remove", "path": "/a"},
            {"op": "add", "path": "/b", "value": {"c": true}},
        ]))
        .unwrap();

        assert_eq!(patch.operations().len(), 2);
        assert_eq!(patch.operations()[0].path(), "/a");
        assert_eq!(
            patch.operations()[1],
            PatchOperation::Add {
                path: "/b".to_owned(),
                value: json!({"c": true}),
            }
        );
    }
}
