use crate::core::ConfigProvider;
use crate::utils::error::{LoadError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;
pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_TOTAL_REQUESTS: usize = 100;
pub const DEFAULT_SUCCESS_STATUS: u16 = 200;
pub const MAX_TOTAL_REQUESTS: usize = 10_000_000;

const SUPPORTED_METHODS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub target: TargetConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// May contain `{email}` and `{index}` placeholders.
    pub url: String,
    #[serde(default = "default_method")]
    pub method: String,
    pub timeout_seconds: Option<u64>,
    /// Sent as `x-api-key`.
    pub api_key: Option<String>,
    /// Sent as `Authorization: Bearer <token>`.
    pub bearer_token: Option<String>,
    /// Fail before the run when neither credential is set.
    #[serde(default)]
    pub require_credentials: bool,
    /// Disables TLS certificate verification. Off unless set explicitly.
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Concurrent,
    Paced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub mode: RunMode,
    #[serde(default = "default_total_requests")]
    pub total_requests: usize,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    pub duration_seconds: Option<u64>,
    #[serde(default = "default_success_status")]
    pub success_status: u16,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::default(),
            total_requests: DEFAULT_TOTAL_REQUESTS,
            concurrency: DEFAULT_CONCURRENCY,
            duration_seconds: None,
            success_status: DEFAULT_SUCCESS_STATUS,
        }
    }
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_total_requests() -> usize {
    DEFAULT_TOTAL_REQUESTS
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_success_status() -> u16 {
    DEFAULT_SUCCESS_STATUS
}

impl TargetConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: default_method(),
            timeout_seconds: None,
            api_key: None,
            bearer_token: None,
            require_credentials: false,
            accept_invalid_certs: false,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

impl LoadConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            target: TargetConfig::new(url),
            run: RunConfig::default(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LoadError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LoadError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left
    /// as-is so validation can name them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LoadError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("target.url", &self.target.url)?;

        let method = self.target.method.to_uppercase();
        if !SUPPORTED_METHODS.contains(&method.as_str()) {
            return Err(LoadError::InvalidConfigValueError {
                field: "target.method".to_string(),
                value: self.target.method.clone(),
                reason: format!(
                    "Unsupported method. Valid methods: {}",
                    SUPPORTED_METHODS.join(", ")
                ),
            });
        }

        if let Some(timeout) = self.target.timeout_seconds {
            validation::validate_positive_number("target.timeout_seconds", timeout as usize, 1)?;
        }

        if let Some(api_key) = &self.target.api_key {
            validation::validate_resolved_secret("target.api_key", api_key)?;
        }
        if let Some(token) = &self.target.bearer_token {
            validation::validate_resolved_secret("target.bearer_token", token)?;
        }
        if self.target.require_credentials
            && self.target.api_key.is_none()
            && self.target.bearer_token.is_none()
        {
            return Err(LoadError::MissingConfigError {
                field: "target.api_key or target.bearer_token".to_string(),
            });
        }

        for (name, value) in &self.target.headers {
            validation::validate_non_empty_string("target.headers", name)?;
            if value.contains("${") {
                return Err(LoadError::MissingConfigError {
                    field: format!("target.headers.{} ({})", name, value),
                });
            }
        }

        validation::validate_range(
            "run.total_requests",
            self.run.total_requests,
            0,
            MAX_TOTAL_REQUESTS,
        )?;
        validation::validate_positive_number("run.concurrency", self.run.concurrency, 1)?;
        validation::validate_range("run.success_status", self.run.success_status, 100, 599)?;

        if self.run.mode == RunMode::Paced {
            let duration = validation::validate_required_field(
                "run.duration_seconds",
                &self.run.duration_seconds,
            )?;
            validation::validate_positive_number("run.duration_seconds", *duration as usize, 1)?;
        }

        Ok(())
    }
}

impl ConfigProvider for LoadConfig {
    fn target_url(&self) -> &str {
        &self.target.url
    }

    fn total_requests(&self) -> usize {
        self.run.total_requests
    }

    fn concurrency(&self) -> usize {
        self.run.concurrency
    }

    fn paced_duration(&self) -> Option<Duration> {
        match self.run.mode {
            RunMode::Paced => self.run.duration_seconds.map(Duration::from_secs),
            RunMode::Concurrent => None,
        }
    }

    fn request_timeout(&self) -> Duration {
        self.target.timeout()
    }

    fn success_status(&self) -> u16 {
        self.run.success_status
    }
}

impl Validate for LoadConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
