use clap::builder::PossibleValue;
use clap::{Arg, ArgAction, Command, crate_authors, crate_description, crate_name, crate_version};
use tracer_admission::constants::TRACE_ID_ANNOTATION;

pub fn build_cli() -> Command {
    let mut args = vec![
        Arg::new("log-level")
            .long("log-level")
            .value_name("LOG_LEVEL")
            .env("KUBETRACER_LOG_LEVEL")
            .default_value("info")
            .value_parser([
                PossibleValue::new("trace"),
                PossibleValue::new("debug"),
                PossibleValue::new("info"),
                PossibleValue::new("warn"),
                PossibleValue::new("error"),
            ])
            .help("Log level"),
        Arg::new("log-fmt")
            .long("log-fmt")
            .value_name("LOG_FMT")
            .env("KUBETRACER_LOG_FMT")
            .default_value("text")
            .value_parser([PossibleValue::new("text"), PossibleValue::new("json")])
            .help("Log output format"),
        Arg::new("log-no-color")
            .long("log-no-color")
            .env("NO_COLOR")
            .action(ArgAction::SetTrue)
            .help("Disable colored output for logs"),
        Arg::new("address")
            .long("addr")
            .value_name("BIND_ADDRESS")
            .default_value("0.0.0.0")
            .env("KUBETRACER_BIND_ADDRESS")
            .help("Bind against ADDRESS"),
        Arg::new("port")
            .long("port")
            .value_name("PORT")
            .default_value("443")
            .env("KUBETRACER_PORT")
            .help("Listen on PORT"),
        Arg::new("cert-file")
            .long("cert-file")
            .value_name("CERT_FILE")
            .default_value("/certs/tls.crt")
            .env("KUBETRACER_CERT_FILE")
            .help("Path to an X.509 certificate file for HTTPS. Set both --cert-file and --key-file to an empty value to serve plain HTTP"),
        Arg::new("key-file")
            .long("key-file")
            .value_name("KEY_FILE")
            .default_value("/certs/tls.key")
            .env("KUBETRACER_KEY_FILE")
            .help("Path to an X.509 private key file for HTTPS"),
        Arg::new("trusted-identity")
            .long("trusted-identity")
            .value_name("USERNAME")
            .env("USER_ID")
            .help("Username of the kubetracer controller. Objects written by this user keep the trace annotation"),
        Arg::new("annotation")
            .long("annotation")
            .value_name("ANNOTATION")
            .env("KUBETRACER_ANNOTATION")
            .default_value(TRACE_ID_ANNOTATION)
            .help("Annotation removed from objects written by any other user"),
    ];
    args.sort_by(|a, b| a.get_id().cmp(b.get_id()));

    Command::new(crate_name!())
        .author(crate_authors!())
        .version(crate_version!())
        .about(crate_description!())
        .args(args)
        .subcommand(
            Command::new("docs")
                .about("Generates the markdown documentation of the CLI")
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .required(true)
                        .value_name("FILE")
                        .help("File where the documentation is written"),
                ),
        )
}
