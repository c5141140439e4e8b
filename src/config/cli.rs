use crate::config::toml_config::{LoadConfig, RunMode};
use crate::utils::error::{LoadError, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "load-fanout")]
#[command(about = "Fire a bounded number of concurrent or paced HTTP requests at an endpoint")]
pub struct CliConfig {
    /// Path to a TOML run configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Target URL; may contain {email} and {index} placeholders
    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub method: Option<String>,

    /// Total number of requests
    #[arg(short = 'n', long)]
    pub total: Option<usize>,

    /// Number of concurrent workers
    #[arg(short = 'w', long)]
    pub concurrency: Option<usize>,

    /// Spread the requests sequentially over this many seconds
    #[arg(long)]
    pub duration: Option<u64>,

    /// Use the paced (sequential) mode
    #[arg(long)]
    pub paced: bool,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(long, env = "LOAD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "LOAD_BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,

    /// Extra header, repeatable
    #[arg(long = "header", value_name = "NAME:VALUE")]
    pub headers: Vec<String>,

    /// JSON request body; strings may contain {email} and {index}
    #[arg(long)]
    pub body: Option<String>,

    #[arg(long)]
    pub success_status: Option<u16>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Show the resolved configuration without sending requests
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// Loads the TOML file when given, then applies flag overrides.
    pub fn to_load_config(&self) -> Result<LoadConfig> {
        let mut config = match (&self.config, &self.url) {
            (Some(path), _) => LoadConfig::from_file(path)?,
            (None, Some(url)) => LoadConfig::new(url.clone()),
            (None, None) => {
                return Err(LoadError::MissingConfigError {
                    field: "--url or --config".to_string(),
                })
            }
        };

        if let Some(url) = &self.url {
            config.target.url = url.clone();
        }
        if let Some(method) = &self.method {
            config.target.method = method.clone();
        }
        if let Some(timeout) = self.timeout {
            config.target.timeout_seconds = Some(timeout);
        }
        if let Some(api_key) = &self.api_key {
            config.target.api_key = Some(api_key.clone());
        }
        if let Some(token) = &self.bearer_token {
            config.target.bearer_token = Some(token.clone());
        }
        for header in &self.headers {
            let (name, value) = parse_header(header)?;
            config.target.headers.insert(name, value);
        }
        if let Some(body) = &self.body {
            config.target.body = Some(serde_json::from_str(body)?);
        }
        if self.insecure {
            config.target.accept_invalid_certs = true;
        }

        if let Some(total) = self.total {
            config.run.total_requests = total;
        }
        if let Some(concurrency) = self.concurrency {
            config.run.concurrency = concurrency;
        }
        if let Some(duration) = self.duration {
            config.run.duration_seconds = Some(duration);
            config.run.mode = RunMode::Paced;
        }
        if self.paced {
            config.run.mode = RunMode::Paced;
        }
        if let Some(status) = self.success_status {
            config.run.success_status = status;
        }

        Ok(config)
    }
}

fn parse_header(raw: &str) -> Result<(String, String)> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(LoadError::InvalidConfigValueError {
            field: "--header".to_string(),
            value: raw.to_string(),
            reason: "Expected NAME:VALUE".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn test_url_only() {
        let cli = CliConfig::parse_from([
            "load-fanout",
            "--url",
            "https://api.example.com/login/{email}",
            "--method",
            "POST",
            "-n",
            "200",
            "-w",
            "5",
            "--header",
            "Referer: https://www.example.com",
            "--body",
            r#"{"codRef": 442, "visitor": ""}"#,
        ]);

        let config = cli.to_load_config().unwrap();

        assert_eq!(config.target.method, "POST");
        assert_eq!(config.total_requests(), 200);
        assert_eq!(config.concurrency(), 5);
        assert_eq!(config.target.headers["Referer"], "https://www.example.com");
        assert_eq!(config.target.body.unwrap()["codRef"], 442);
    }

    #[test]
    fn test_missing_url_and_config() {
        let cli = CliConfig::parse_from(["load-fanout"]);
        assert!(matches!(
            cli.to_load_config(),
            Err(LoadError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_duration_selects_paced_mode() {
        let cli = CliConfig::parse_from([
            "load-fanout",
            "--url",
            "https://cache.example.com",
            "--duration",
            "600",
        ]);

        let config = cli.to_load_config().unwrap();
        assert_eq!(config.run.mode, RunMode::Paced);
        assert_eq!(config.paced_duration(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_flags_override_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"
[target]
url = "https://api.example.com"
timeout_seconds = 10

[run]
total_requests = 50
concurrency = 2
"#,
            )
            .unwrap();

        let path = temp_file.path().to_str().unwrap().to_string();
        let cli = CliConfig::parse_from([
            "load-fanout",
            "--config",
            path.as_str(),
            "--concurrency",
            "8",
            "--insecure",
        ]);

        let config = cli.to_load_config().unwrap();
        assert_eq!(config.total_requests(), 50);
        assert_eq!(config.concurrency(), 8);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.target.accept_invalid_certs);
    }

    #[test]
    fn test_bad_header_and_body() {
        let cli = CliConfig::parse_from([
            "load-fanout",
            "--url",
            "https://api.example.com",
            "--header",
            "no-colon",
        ]);
        assert!(matches!(
            cli.to_load_config(),
            Err(LoadError::InvalidConfigValueError { .. })
        ));

        let cli = CliConfig::parse_from([
            "load-fanout",
            "--url",
            "https://api.example.com",
            "--body",
            "{not json",
        ]);
        assert!(matches!(
            cli.to_load_config(),
            Err(LoadError::SerializationError(_))
        ));
    }
}
