use anyhow::Result;
use std::fs;
use tracing::{debug, info};

use kubetracer_webhook::{
    WebhookServer, cli, config::Config, config::SERVICE_NAME, fatal_error, tracing::setup_tracing,
    tracing_initialized,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();

    if let Some(docs_matches) = matches.subcommand_matches("docs") {
        if let Some(output) = docs_matches.get_one::<String>("output") {
            let markdown = clap_markdown::help_markdown_command(&cli::build_cli());
            fs::write(output, markdown)?;
        }
        return Ok(());
    }

    // Starting from rustls 0.22, each application must set its default crypto provider.
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        fatal_error("Cannot install the rustls crypto provider".to_string());
    }

    // A missing trusted identity must prevent the webhook from serving any request
    let config = match Config::from_args(&matches) {
        Ok(config) => config,
        Err(e) => fatal_error(e.to_string()),
    };

    if let Err(e) = setup_tracing(&config.log_level, &config.log_fmt, config.log_no_color) {
        fatal_error(e.to_string());
    }
    tracing_initialized();
    debug!("tracing system ready");

    info!(service = SERVICE_NAME, "starting webhook server");
    let server = match WebhookServer::new_from_config(config).await {
        Ok(server) => server,
        Err(e) => fatal_error(e.to_string()),
    };

    if let Err(e) = server.run().await {
        fatal_error(format!("webhook server error: {e}"));
    }

    Ok(())
}
