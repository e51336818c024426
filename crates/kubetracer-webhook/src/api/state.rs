use tracer_admission::DecisionEngine;

pub(crate) struct ApiServerState {
    pub(crate) engine: DecisionEngine,
}
