//! CLI argument parsing module
//!
//! This module handles command-line argument parsing and the `webreq` entry point.

use crate::config::{HttpMethod, DEFAULT_CONNECTION_TIMEOUT_MS, DEFAULT_SOCKET_TIMEOUT_MS};
use crate::error::{Result, WebRequestError};
use crate::exit_code::exit_code_for_error;
use crate::http::auth::Auth;
use crate::http::request::RequestBuilder;
use crate::utils::{StringUtils, UrlUtils};
use clap::{value_parser, Arg, ArgMatches, Command};
use std::io::{self, Write};
use std::str::FromStr;

/// Main entry point for the CLI application
pub fn run() {
    let matches = create_app().get_matches();
    crate::logging::init(matches.get_flag("verbose"));

    if let Err(e) = run_with_args(&matches) {
        eprintln!("webreq: error: {}", e);
        std::process::exit(exit_code_for_error(&e));
    }
}

/// Run webreq with parsed command line arguments
fn run_with_args(matches: &ArgMatches) -> Result<()> {
    let builder = build_request_from_args(matches)?;
    let body = builder.send_blocking()?;
    io::stdout().write_all(body.as_bytes())?;
    Ok(())
}

/// Create the CLI application structure
pub fn create_app() -> Command {
    Command::new("webreq")
        .version(crate::VERSION)
        .about("Send a single GET or POST request and print the response body")
        .arg(
            Arg::new("url")
                .help("The URL to request")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("request")
                .short('X')
                .long("request")
                .value_name("METHOD")
                .help("HTTP request method")
                .default_value("GET"),
        )
        .arg(
            Arg::new("param")
                .short('d')
                .long("param")
                .value_name("KEY=VALUE")
                .help("Add a request parameter (query string for GET, form body for POST)")
                .action(clap::ArgAction::Append),
        )
        .arg(
            Arg::new("header")
                .short('H')
                .long("header")
                .value_name("HEADER")
                .help("Add custom HTTP header")
                .action(clap::ArgAction::Append),
        )
        .arg(
            Arg::new("user")
                .short('u')
                .long("user")
                .value_name("USER[:PASSWORD]")
                .help("HTTP basic authentication"),
        )
        .arg(
            Arg::new("user-agent")
                .short('A')
                .long("user-agent")
                .value_name("STRING")
                .help("User-Agent header"),
        )
        .arg(
            Arg::new("connect-timeout")
                .long("connect-timeout")
                .value_name("MS")
                .help("Connection timeout in milliseconds, 0 for none [default: 6000]")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("max-time")
                .long("max-time")
                .value_name("MS")
                .help("Socket read timeout in milliseconds, 0 for none [default: 8000]")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("charset")
                .long("charset")
                .value_name("NAME")
                .help("Character set for parameters and the response body"),
        )
        .arg(
            Arg::new("compressed")
                .long("compressed")
                .help("Request a gzip-compressed response")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Verbose output")
                .action(clap::ArgAction::SetTrue),
        )
}

/// Build a request from command line arguments
pub fn build_request_from_args(matches: &ArgMatches) -> Result<RequestBuilder> {
    let mut builder = RequestBuilder::new();

    if let Some(url_str) = matches.get_one::<String>("url") {
        let url = UrlUtils::validate_url(url_str)?;
        builder = builder.target_url(url.to_string())?;
    }

    if let Some(method_str) = matches.get_one::<String>("request") {
        let method = HttpMethod::from_str(method_str).map_err(|_| {
            WebRequestError::InvalidArgument(format!("Unknown HTTP method: {}", method_str))
        })?;
        builder = builder.method(method);
    }

    if let Some(params) = matches.get_many::<String>("param") {
        for param in params {
            let (key, value) = StringUtils::parse_param(param)?;
            builder = builder.add_param(key, value)?;
        }
    }

    if let Some(headers) = matches.get_many::<String>("header") {
        for header_str in headers {
            let (key, value) = StringUtils::parse_header(header_str)?;
            builder = builder.with_header(key, value)?;
        }
    }

    if let Some(user_str) = matches.get_one::<String>("user") {
        let (username, password) = Auth::parse_user_pass(user_str)?;
        builder = builder.with_basic_auth(username, password);
    }

    if let Some(user_agent) = matches.get_one::<String>("user-agent") {
        builder = builder.with_user_agent(user_agent.clone())?;
    }

    if let Some(charset) = matches.get_one::<String>("charset") {
        builder = builder.with_charset(charset.clone())?;
    }

    let connect_ms = matches
        .get_one::<u64>("connect-timeout")
        .copied()
        .unwrap_or(DEFAULT_CONNECTION_TIMEOUT_MS);
    let read_ms = matches
        .get_one::<u64>("max-time")
        .copied()
        .unwrap_or(DEFAULT_SOCKET_TIMEOUT_MS);

    Ok(builder
        .with_timeouts(connect_ms, read_ms)
        .with_gzip(matches.get_flag("compressed")))
}

#[cfg(test)]
mod tests {
    use super::{build_request_from_args, create_app};
    use crate::config::HttpMethod;
    use crate::error::WebRequestError;

    fn build(args: &[&str]) -> crate::Result<crate::RequestBuilder> {
        let matches = create_app()
            .try_get_matches_from(std::iter::once("webreq").chain(args.iter().copied()))
            .expect("arguments parse");
        build_request_from_args(&matches)
    }

    #[test]
    fn defaults_to_get_with_default_timeouts() {
        let builder = build(&["example.com/api"]).expect("builder");
        let config = builder.config();
        assert_eq!(config.method, Some(HttpMethod::Get));
        assert_eq!(config.url.as_deref(), Some("http://example.com/api"));
        assert_eq!(config.connection_timeout_ms, 6000);
        assert_eq!(config.socket_timeout_ms, 8000);
        assert!(!config.gzip);
    }

    #[test]
    fn collects_params_headers_and_auth() {
        let builder = build(&[
            "http://example.com/form",
            "-X",
            "post",
            "-d",
            "q=a b",
            "-d",
            "n=1",
            "-H",
            "X-Trace: 7",
            "-u",
            "user:pass",
            "--compressed",
            "--max-time",
            "0",
        ])
        .expect("builder");
        let config = builder.config();
        assert_eq!(config.method, Some(HttpMethod::Post));
        assert_eq!(
            config.params,
            vec![
                ("q".to_string(), "a b".to_string()),
                ("n".to_string(), "1".to_string())
            ]
        );
        assert_eq!(config.headers, vec![("X-Trace".to_string(), "7".to_string())]);
        assert_eq!(config.credentials(), Some(("user", "pass")));
        assert!(config.gzip);
        assert_eq!(config.socket_timeout_ms, 0);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = build(&["http://example.com/", "-X", "PATCH"]).expect_err("unknown method");
        assert!(matches!(err, WebRequestError::InvalidArgument(_)));
    }
}
