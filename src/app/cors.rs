use crate::config::toml_config::CorsSettings;
use crate::utils::error::{Result, ReviewError};
use axum::http::HeaderValue;
use regex::Regex;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Exact origins plus regex patterns (e.g. preview deployments).
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    exact: Vec<String>,
    patterns: Vec<Regex>,
}

impl OriginPolicy {
    pub fn from_settings(settings: &CorsSettings) -> Result<Self> {
        let patterns = settings
            .allow_origin_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ReviewError::InvalidConfigValue {
                    field: "cors.allow_origin_patterns".to_string(),
                    value: p.clone(),
                    reason: format!("Invalid pattern: {}", e),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            exact: settings.allow_origins.clone(),
            patterns,
        })
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.exact.iter().any(|o| o == origin) || self.patterns.iter().any(|re| re.is_match(origin))
    }
}

pub fn cors_layer(settings: &CorsSettings) -> Result<CorsLayer> {
    let policy = Arc::new(OriginPolicy::from_settings(settings)?);

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &axum::http::request::Parts| {
                origin
                    .to_str()
                    .map(|o| policy.allows(o))
                    .unwrap_or(false)
            },
        ))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(false))
}
