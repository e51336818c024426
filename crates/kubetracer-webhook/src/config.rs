use anyhow::{Result, anyhow};
use clap::ArgMatches;
use lazy_static::lazy_static;
use std::net::SocketAddr;
use std::path::PathBuf;

pub static SERVICE_NAME: &str = "kubetracer-webhook";

lazy_static! {
    pub(crate) static ref HOSTNAME: String =
        std::env::var("HOSTNAME").unwrap_or_else(|_| String::from("unknown"));
}

pub struct Config {
    pub addr: SocketAddr,
    pub tls_config: Option<TlsConfig>,
    pub trusted_identity: String,
    pub annotation: String,
    pub log_level: String,
    pub log_fmt: String,
    pub log_no_color: bool,
}

#[derive(Clone, Debug)]
pub struct TlsConfig {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
}

impl Config {
    pub fn from_args(matches: &ArgMatches) -> Result<Self> {
        let addr = api_bind_address(matches)?;
        let tls_config = tls_config(matches)?;
        let trusted_identity = trusted_identity(matches)?;

        let annotation = matches
            .get_one::<String>("annotation")
            .ok_or_else(|| anyhow!("annotation should always be set"))?
            .to_owned();
        if annotation.is_empty() {
            return Err(anyhow!("error parsing arguments: --annotation cannot be empty"));
        }

        let log_level = matches
            .get_one::<String>("log-level")
            .ok_or_else(|| anyhow!("log-level should always be set"))?
            .to_owned();
        let log_fmt = matches
            .get_one::<String>("log-fmt")
            .ok_or_else(|| anyhow!("log-fmt should always be set"))?
            .to_owned();
        let log_no_color = matches.get_flag("log-no-color");

        Ok(Self {
            addr,
            tls_config,
            trusted_identity,
            annotation,
            log_level,
            log_fmt,
            log_no_color,
        })
    }
}

fn api_bind_address(matches: &ArgMatches) -> Result<SocketAddr> {
    let address = matches
        .get_one::<String>("address")
        .ok_or_else(|| anyhow!("address should always be set"))?;
    let port = matches
        .get_one::<String>("port")
        .ok_or_else(|| anyhow!("port should always be set"))?;

    format!("{address}:{port}")
        .parse()
        .map_err(|e| anyhow!("error parsing arguments: {}", e))
}

fn tls_config(matches: &ArgMatches) -> Result<Option<TlsConfig>> {
    let cert_file = matches
        .get_one::<String>("cert-file")
        .cloned()
        .unwrap_or_default();
    let key_file = matches
        .get_one::<String>("key-file")
        .cloned()
        .unwrap_or_default();

    match (cert_file.is_empty(), key_file.is_empty()) {
        (true, true) => Ok(None),
        (false, false) => Ok(Some(TlsConfig {
            cert_file: PathBuf::from(cert_file),
            key_file: PathBuf::from(key_file),
        })),
        _ => Err(anyhow!(
            "error parsing arguments: either both --cert-file and --key-file must be provided, or neither"
        )),
    }
}

// The webhook cannot make any decision without knowing who the controller is:
// refuse to start instead of patching every request.
fn trusted_identity(matches: &ArgMatches) -> Result<String> {
    match matches.get_one::<String>("trusted-identity") {
        Some(identity) if !identity.is_empty() => Ok(identity.to_owned()),
        _ => Err(anyhow!(
            "the trusted identity is not set, use --trusted-identity or the USER_ID environment variable"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::build_cli;
    use rstest::*;

    fn config_from(args: &[&str]) -> Result<Config> {
        let matches = build_cli()
            .try_get_matches_from(std::iter::once("kubetracer-webhook").chain(args.iter().copied()))
            .expect("arguments should be accepted by clap");
        Config::from_args(&matches)
    }

    #[test]
    fn full_config() {
        let config = config_from(&[
            "--trusted-identity",
            "tracer-controller",
            "--addr",
            "127.0.0.1",
            "--port",
            "8443",
            "--cert-file",
            "/tmp/tls.crt",
            "--key-file",
            "/tmp/tls.key",
            "--annotation",
            "trace-id",
            "--log-fmt",
            "json",
        ])
        .unwrap();

        assert_eq!(config.addr, "127.0.0.1:8443".parse().unwrap());
        assert_eq!(config.trusted_identity, "tracer-controller");
        assert_eq!(config.annotation, "trace-id");
        assert_eq!(config.log_fmt, "json");
        let tls_config = config.tls_config.expect("TLS should be enabled");
        assert_eq!(tls_config.cert_file, PathBuf::from("/tmp/tls.crt"));
        assert_eq!(tls_config.key_file, PathBuf::from("/tmp/tls.key"));
    }

    #[test]
    fn tls_can_be_disabled() {
        let config = config_from(&[
            "--trusted-identity",
            "tracer-controller",
            "--cert-file",
            "",
            "--key-file",
            "",
        ])
        .unwrap();

        assert!(config.tls_config.is_none());
    }

    #[rstest]
    #[case::only_cert(&["--trusted-identity", "tracer-controller", "--key-file", ""])]
    #[case::only_key(&["--trusted-identity", "tracer-controller", "--cert-file", ""])]
    #[case::empty_identity(&["--trusted-identity", ""])]
    #[case::empty_annotation(&["--trusted-identity", "tracer-controller", "--annotation", ""])]
    #[case::bad_port(&["--trusted-identity", "tracer-controller", "--port", "https"])]
    fn invalid_config(#[case] args: &[&str]) {
        assert!(config_from(args).is_err());
    }
}
