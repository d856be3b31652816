use anyhow::{anyhow, Result};
use clap::ArgMatches;
use lazy_static::lazy_static;
use std::net::SocketAddr;

lazy_static! {
    pub(crate) static ref HOSTNAME: String =
        std::env::var("HOSTNAME").unwrap_or_else(|_| String::from("unknown"));
}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub tls_config: Option<TlsConfig>,
    pub validate_path: String,
    pub max_request_body_size: usize,
    pub log_level: String,
    pub log_fmt: String,
    pub log_no_color: bool,
}

#[derive(Debug)]
pub struct TlsConfig {
    pub cert_file: String,
    pub key_file: String,
}

impl Config {
    pub fn from_args(matches: &ArgMatches) -> Result<Self> {
        let addr = api_bind_address(matches)?;
        let (cert_file, key_file) = tls_files(matches)?;
        let tls_config = if cert_file.is_empty() {
            None
        } else {
            Some(TlsConfig {
                cert_file,
                key_file,
            })
        };
        let validate_path = validate_path(matches)?;
        let max_request_body_size = max_request_body_size(matches)?;

        let log_level = matches
            .get_one::<String>("log-level")
            .expect("This should not happen, there's a default value for log-level")
            .to_owned();
        let log_fmt = matches
            .get_one::<String>("log-fmt")
            .expect("This should not happen, there's a default value for log-fmt")
            .to_owned();
        let log_no_color = matches
            .get_one::<bool>("log-no-color")
            .expect("clap should have assigned a default value")
            .to_owned();

        Ok(Self {
            addr,
            tls_config,
            validate_path,
            max_request_body_size,
            log_level,
            log_fmt,
            log_no_color,
        })
    }
}

fn api_bind_address(matches: &ArgMatches) -> Result<SocketAddr> {
    format!(
        "{}:{}",
        matches
            .get_one::<String>("address")
            .expect("This should not happen, there's a default value for address"),
        matches
            .get_one::<String>("port")
            .expect("This should not happen, there's a default value for port")
    )
    .parse()
    .map_err(|e| anyhow!("error parsing arguments: {}", e))
}

fn tls_files(matches: &ArgMatches) -> Result<(String, String)> {
    let cert_file = matches
        .get_one::<String>("cert-file")
        .expect("This should not happen, there's a default value for cert-file")
        .to_owned();
    let key_file = matches
        .get_one::<String>("key-file")
        .expect("This should not happen, there's a default value for key-file")
        .to_owned();
    if cert_file.is_empty() != key_file.is_empty() {
        Err(anyhow!(
            "error parsing arguments: either both --cert-file and --key-file must be provided, or neither"
        ))
    } else {
        Ok((cert_file, key_file))
    }
}

fn validate_path(matches: &ArgMatches) -> Result<String> {
    let path = matches
        .get_one::<String>("validate-path")
        .expect("This should not happen, there's a default value for validate-path");
    if !path.starts_with('/') {
        return Err(anyhow!(
            "error parsing arguments: --validate-path must start with '/', got {:?}",
            path
        ));
    }
    Ok(path.to_owned())
}

fn max_request_body_size(matches: &ArgMatches) -> Result<usize> {
    let size = matches
        .get_one::<String>("max-request-body-size")
        .expect("This should not happen, there's a default value for max-request-body-size")
        .parse::<usize>()
        .map_err(|e| anyhow!("error parsing max-request-body-size: {}", e))?;
    if size == 0 {
        return Err(anyhow!(
            "error parsing arguments: --max-request-body-size must be greater than 0"
        ));
    }
    Ok(size)
}
