/// Annotation holding the trace id propagated by the kubetracer controller
pub const TRACE_ID_ANNOTATION: &str = "kubetracer.io/trace-id";
