//! Server configuration for the example binary, read from command-line flags.

use anyhow::{Context, Result, anyhow};
use std::net::SocketAddr;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_COLLECTIONS: [&str; 2] = ["artists", "albums"];

pub const USAGE: &str =
    "--bind <addr:port> [--prefix <path>] [--collection <name>]... [--restricted]";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Path prefix the API is mounted under; empty for the root.
    pub prefix: String,
    /// Collections registered in the in-memory storage at startup.
    pub collections: Vec<String>,
    /// Installs the example allow-list guard instead of allowing everything.
    pub restricted: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8080))),
            prefix: String::new(),
            collections: DEFAULT_COLLECTIONS.iter().map(|c| c.to_string()).collect(),
            restricted: false,
        }
    }
}

impl ServerConfig {
    /// Parses flags, skipping the program name. Unknown flags are ignored.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().skip(1).collect();
        let mut config = ServerConfig::default();
        let mut collections: Vec<String> = vec![];

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--bind" => {
                    let value = flag_value(&args, i)?;
                    config.bind_addr = value
                        .parse()
                        .with_context(|| format!("invalid --bind address '{}'", value))?;
                    i += 2;
                }
                "--prefix" => {
                    config.prefix = flag_value(&args, i)?.to_string();
                    i += 2;
                }
                "--collection" => {
                    collections.push(flag_value(&args, i)?.to_string());
                    i += 2;
                }
                "--restricted" => {
                    config.restricted = true;
                    i += 1;
                }
                other => {
                    tracing::warn!("Ignoring unknown argument '{}'", other);
                    i += 1;
                }
            }
        }

        if !collections.is_empty() {
            config.collections = collections;
        }

        Ok(config)
    }
}

fn flag_value(args: &[String], i: usize) -> Result<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires a value", args[i]))
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("crudapi")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = ServerConfig::from_args(args(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.collections, vec!["artists", "albums"]);
    }

    #[test]
    fn test_all_flags() {
        let config = ServerConfig::from_args(args(&[
            "--bind",
            "0.0.0.0:9000",
            "--prefix",
            "/v1/",
            "--collection",
            "books",
            "--collection",
            "authors",
            "--restricted",
            "--verbose",
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:9000");
        assert_eq!(config.prefix, "/v1/");
        assert_eq!(config.collections, vec!["books", "authors"]);
        assert!(config.restricted);
    }

    #[test]
    fn test_missing_value_and_bad_address_are_errors() {
        let err = ServerConfig::from_args(args(&["--bind"])).unwrap_err();
        assert!(err.to_string().contains("--bind requires a value"));

        let err = ServerConfig::from_args(args(&["--bind", "not-an-addr"])).unwrap_err();
        assert!(err.to_string().contains("invalid --bind address"));
    }
}
