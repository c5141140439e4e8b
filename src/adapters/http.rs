use crate::adapters::identity::random_email;
use crate::config::TargetConfig;
use crate::core::{RequestOperation, WorkItem};
use crate::utils::error::{LoadError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

const API_KEY_HEADER: &str = "x-api-key";

/// Builds the one client shared by every worker of a run.
pub fn build_client(timeout: Duration, accept_invalid_certs: bool) -> Result<Client> {
    if accept_invalid_certs {
        tracing::warn!("🔓 TLS certificate verification is DISABLED for this run");
    }

    let client = Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()?;
    Ok(client)
}

pub fn render_template(template: &str, item: &WorkItem) -> String {
    template
        .replace("{index}", &item.index.to_string())
        .replace("{email}", &item.email)
}

/// Substitutes placeholders in every string of the body. A string that is
/// exactly `{index}` becomes a JSON number.
pub fn render_body(body: &Value, item: &WorkItem) -> Value {
    match body {
        Value::String(s) if s == "{index}" => Value::from(item.index),
        Value::String(s) => Value::String(render_template(s, item)),
        Value::Array(values) => Value::Array(values.iter().map(|v| render_body(v, item)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), render_body(v, item)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[derive(Debug, Clone)]
pub struct HttpTarget {
    pub method: Method,
    pub url_template: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl HttpTarget {
    pub fn from_config(config: &TargetConfig) -> Result<Self> {
        let method = Method::from_bytes(config.method.to_uppercase().as_bytes()).map_err(|e| {
            LoadError::InvalidConfigValueError {
                field: "target.method".to_string(),
                value: config.method.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            headers.insert(header_name(name)?, header_value("target.headers", value)?);
        }
        if let Some(api_key) = &config.api_key {
            headers.insert(
                HeaderName::from_static(API_KEY_HEADER),
                header_value("target.api_key", api_key)?,
            );
        }
        if let Some(token) = &config.bearer_token {
            headers.insert(
                AUTHORIZATION,
                header_value("target.bearer_token", &format!("Bearer {}", token))?,
            );
        }

        Ok(Self {
            method,
            url_template: config.url.clone(),
            headers,
            body: config.body.clone(),
        })
    }
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| LoadError::InvalidConfigValueError {
        field: "target.headers".to_string(),
        value: name.to_string(),
        reason: e.to_string(),
    })
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value).map_err(|e| LoadError::InvalidConfigValueError {
        field: field.to_string(),
        value: "<redacted>".to_string(),
        reason: e.to_string(),
    })?;
    if field != "target.headers" {
        header.set_sensitive(true);
    }
    Ok(header)
}

/// Sends one request per work item, each with a freshly generated email.
pub struct HttpRequestOperation {
    client: Client,
    target: HttpTarget,
}

impl HttpRequestOperation {
    pub fn new(client: Client, target: HttpTarget) -> Self {
        Self { client, target }
    }

    pub fn from_config(config: &TargetConfig) -> Result<Self> {
        let client = build_client(config.timeout(), config.accept_invalid_certs)?;
        Ok(Self::new(client, HttpTarget::from_config(config)?))
    }
}

#[async_trait]
impl RequestOperation for HttpRequestOperation {
    async fn execute(&self, index: usize) -> Result<u16> {
        let item = WorkItem {
            index,
            email: random_email(),
        };
        let url = render_template(&self.target.url_template, &item);
        tracing::debug!("[{}] {} => Requesting URL: {}", item.index, item.email, url);

        let mut request = self
            .client
            .request(self.target.method.clone(), &url)
            .headers(self.target.headers.clone());
        if let Some(body) = &self.target.body {
            request = request.json(&render_body(body, &item));
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        tracing::debug!("[{}] {} => Status: {}", item.index, item.email, status);

        Ok(status)
    }
}
