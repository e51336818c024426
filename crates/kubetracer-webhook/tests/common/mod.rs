use axum::Router;
use kubetracer_webhook::{WebhookServer, config::Config};
use std::net::SocketAddr;

pub(crate) const TRUSTED_IDENTITY: &str = "tracer-controller";

pub(crate) fn default_test_config() -> Config {
    Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 3101)),
        tls_config: None,
        trusted_identity: TRUSTED_IDENTITY.to_owned(),
        annotation: "trace-id".to_owned(),
        log_level: "info".to_owned(),
        log_fmt: "json".to_owned(),
        log_no_color: false,
    }
}

pub(crate) async fn app(config: Config) -> Router {
    let server = WebhookServer::new_from_config(config).await.unwrap();

    server.router()
}
