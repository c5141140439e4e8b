use crate::utils::error::{LoadError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// URL templates may carry `{email}`/`{index}` placeholders, so they are
/// rendered with dummy values before parsing.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LoadError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    let probe = url_str
        .replace("{email}", "probe@example.com")
        .replace("{index}", "0");

    match Url::parse(&probe) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LoadError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LoadError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(LoadError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| LoadError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LoadError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Credentials still holding a `${VAR}` placeholder mean the variable was
/// never exported.
pub fn validate_resolved_secret(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if value.contains("${") {
        return Err(LoadError::MissingConfigError {
            field: format!("{} ({})", field_name, value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(LoadError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("target.url", "https://example.com").is_ok());
        assert!(validate_url("target.url", "http://example.com/login/{email}/?inbox=false").is_ok());
        assert!(validate_url("target.url", "").is_err());
        assert!(validate_url("target.url", "invalid-url").is_err());
        assert!(validate_url("target.url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("run.concurrency", 5, 1).is_ok());
        assert!(validate_positive_number("run.concurrency", 0, 1).is_err());
    }

    #[test]
    fn test_validate_resolved_secret() {
        assert!(validate_resolved_secret("target.api_key", "abc123").is_ok());
        assert!(validate_resolved_secret("target.api_key", "   ").is_err());

        let err = validate_resolved_secret("target.api_key", "${LOAD_API_KEY}").unwrap_err();
        assert!(matches!(err, LoadError::MissingConfigError { .. }));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("run.success_status", 200u16, 100, 599).is_ok());
        assert!(validate_range("run.success_status", 42u16, 100, 599).is_err());
    }
}
