//! Command line options.

use std::path::PathBuf;

use clap::Parser;
use restcheck_domain::ClientConfig;
use restcheck_infrastructure::{ConfigError, load_config};

/// Runs the reqres.in REST API checks.
#[derive(Debug, Clone, Parser)]
#[command(name = "restcheck", version)]
#[command(about = "Runs the reqres.in REST API checks and reports every result")]
pub struct Cli {
    /// Config file (JSON or YAML).
    #[arg(long, env = "RESTCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL, overriding the config file.
    #[arg(long, env = "RESTCHECK_BASE_URL")]
    pub base_url: Option<String>,

    /// Answer from recorded responses instead of the network.
    #[arg(long)]
    pub offline: bool,

    /// Print reports as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Log every request and pretty-printed response body.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        if self.verbose {
            "info,restcheck_application=debug"
        } else {
            "info"
        }
    }

    /// Builds the client config: the file if given, else defaults, then the
    /// base URL override.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded.
    pub async fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path).await?,
            None => ClientConfig::default(),
        };
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "restcheck",
            "--offline",
            "--json",
            "--base-url",
            "http://localhost:9000",
        ])
        .expect("args");
        assert!(cli.offline);
        assert!(cli.json);
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(cli.log_filter(), "info");
    }

    #[test]
    fn test_verbose_logs_runner_at_debug() {
        let cli = Cli::try_parse_from(["restcheck", "-v"]).expect("args");
        assert!(cli.verbose);
        assert_eq!(cli.log_filter(), "info,restcheck_application=debug");
    }

    #[tokio::test]
    async fn test_base_url_overrides_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("restcheck.json");
        std::fs::write(&path, r#"{"base_url": "https://reqres.in", "timeout_ms": 750}"#)
            .expect("write");

        let cli = Cli {
            config: Some(path),
            base_url: Some("http://127.0.0.1:8080".to_string()),
            offline: false,
            json: false,
            verbose: false,
        };
        let config = cli.client_config().await.expect("config");

        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.timeout_ms, 750);
    }

    #[tokio::test]
    async fn test_defaults_without_file() {
        let cli = Cli {
            config: None,
            base_url: None,
            offline: true,
            json: false,
            verbose: false,
        };
        let config = cli.client_config().await.expect("config");
        assert_eq!(config, ClientConfig::default());
    }
}
