use crate::utils::error::{Result, ReviewError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> ReviewError {
    ReviewError::InvalidConfigValue {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_required_env(field_name: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ReviewError::MissingConfig {
            field: field_name.to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
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
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_regex(field_name: &str, pattern: &str) -> Result<()> {
    regex::Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| invalid(field_name, pattern, format!("Invalid pattern: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("google.base_url", "https://maps.googleapis.com").is_ok());
        assert!(validate_url("google.base_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("google.base_url", "").is_err());
        assert!(validate_url("google.base_url", "invalid-url").is_err());
        assert!(validate_url("google.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("google.review_cap", 5, 1).is_ok());
        assert!(validate_positive_number("google.review_cap", 0, 1).is_err());
    }

    #[test]
    fn test_validate_required_env() {
        assert_eq!(
            validate_required_env("ANTHROPIC_API_KEY", Some("sk-test".into())).unwrap(),
            "sk-test"
        );
        assert!(matches!(
            validate_required_env("ANTHROPIC_API_KEY", Some("   ".into())),
            Err(ReviewError::MissingConfig { .. })
        ));
        assert!(validate_required_env("ANTHROPIC_API_KEY", None).is_err());
    }

    #[test]
    fn test_validate_range_and_regex() {
        assert!(validate_range("completion.max_tokens", 2000u32, 1, 8192).is_ok());
        assert!(validate_range("completion.max_tokens", 0u32, 1, 8192).is_err());
        assert!(validate_regex("cors.allow_origin_patterns", r"^https://.*\.vercel\.app$").is_ok());
        assert!(validate_regex("cors.allow_origin_patterns", "([").is_err());
    }
}
