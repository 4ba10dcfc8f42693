use crate::utils::error::{Result, ReviewError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_regex,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Deployment-tunable settings. Every field has a default so the file is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerSettings,
    pub google: GoogleSettings,
    pub secondary: SecondarySettings,
    pub completion: CompletionSettings,
    pub prompt: PromptSettings,
    pub cors: CorsSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    pub base_url: String,
    pub search_type: String,
    pub review_cap: usize,
    pub include_photo: bool,
    pub photo_max_width: u32,
    pub timeout_secs: u64,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com".to_string(),
            search_type: "lodging".to_string(),
            review_cap: 5,
            include_photo: true,
            photo_max_width: 800,
            timeout_secs: 30,
        }
    }
}

impl GoogleSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondarySettings {
    pub enabled: bool,
    pub base_url: String,
    pub request_cap: usize,
    pub reviews_limit: usize,
    pub min_text_chars: usize,
    pub poll_attempts: u32,
    pub poll_delay_secs: u64,
    pub timeout_secs: u64,
}

impl Default for SecondarySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.app.outscraper.com".to_string(),
            request_cap: 20,
            reviews_limit: 15,
            min_text_chars: 150,
            poll_attempts: 12,
            poll_delay_secs: 5,
            timeout_secs: 120,
        }
    }
}

impl SecondarySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_delay(&self) -> Duration {
        Duration::from_secs(self.poll_delay_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-haiku-20240307".to_string(),
            max_tokens: 2000,
            timeout_secs: 120,
        }
    }
}

impl CompletionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    pub template_path: PathBuf,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("prompts/prompt_v1.txt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    pub allow_origins: Vec<String>,
    pub allow_origin_patterns: Vec<String>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allow_origins: vec![
                "https://onesynth-frontend.vercel.app".to_string(),
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            allow_origin_patterns: vec![r"^https://onesynth-frontend-.*\.vercel\.app$".to_string()],
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${GOOGLE_BASE_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;

        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReviewError::InvalidConfigValue {
            field: "placeholder".to_string(),
            value: r"\$\{([^}]+)\}".to_string(),
            reason: e.to_string(),
        })?;

        Ok(re
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;

        validate_url("google.base_url", &self.google.base_url)?;
        validate_non_empty_string("google.search_type", &self.google.search_type)?;
        validate_positive_number("google.review_cap", self.google.review_cap, 1)?;
        validate_range("google.photo_max_width", self.google.photo_max_width, 1, 1600)?;
        validate_range("google.timeout_secs", self.google.timeout_secs, 1, 600)?;

        if self.secondary.enabled {
            validate_url("secondary.base_url", &self.secondary.base_url)?;
            validate_positive_number("secondary.request_cap", self.secondary.request_cap, 1)?;
            validate_positive_number("secondary.reviews_limit", self.secondary.reviews_limit, 1)?;
            validate_range("secondary.poll_attempts", self.secondary.poll_attempts, 1, 120)?;
            validate_range("secondary.poll_delay_secs", self.secondary.poll_delay_secs, 0, 300)?;
            validate_range("secondary.timeout_secs", self.secondary.timeout_secs, 1, 900)?;
        }

        validate_url("completion.base_url", &self.completion.base_url)?;
        validate_non_empty_string("completion.model", &self.completion.model)?;
        validate_range("completion.max_tokens", self.completion.max_tokens, 1, 8192)?;
        validate_range("completion.timeout_secs", self.completion.timeout_secs, 1, 900)?;

        for pattern in &self.cors.allow_origin_patterns {
            validate_regex("cors.allow_origin_patterns", pattern)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.google.review_cap, 5);
        assert_eq!(config.secondary.poll_attempts, 12);
        assert_eq!(config.secondary.poll_delay(), Duration::from_secs(5));
        assert_eq!(config.secondary.min_text_chars, 150);
        assert_eq!(config.completion.max_tokens, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections_override() {
        let toml_content = r#"
[google]
review_cap = 20
include_photo = false

[secondary]
enabled = false

[cors]
allow_origins = ["https://example.org"]
allow_origin_patterns = []
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.google.review_cap, 20);
        assert!(!config.google.include_photo);
        assert_eq!(config.google.timeout_secs, 30);
        assert!(!config.secondary.enabled);
        assert_eq!(config.cors.allow_origins, vec!["https://example.org"]);
        assert!(config.cors.allow_origin_patterns.is_empty());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HRD_TEST_COMPLETION_URL", "http://127.0.0.1:9999");

        let toml_content = r#"
[completion]
base_url = "${HRD_TEST_COMPLETION_URL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.completion.base_url, "http://127.0.0.1:9999");

        std::env::remove_var("HRD_TEST_COMPLETION_URL");
    }

    #[test]
    fn test_config_validation() {
        let mut config = TomlConfig::default();
        config.google.base_url = "invalid-url".to_string();
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.cors.allow_origin_patterns = vec!["([".to_string()];
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.secondary.enabled = false;
        config.secondary.poll_attempts = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_poll_delay_is_bounded() {
        let config =
            TomlConfig::from_toml_str("[secondary]\npoll_delay_secs = 9223372036854775807\n")
                .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("secondary.poll_delay_secs"));

        let mut config = TomlConfig::default();
        config.secondary.poll_delay_secs = 300;
        assert!(config.validate().is_ok());
        config.secondary.poll_delay_secs = 301;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 9100\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        assert!(TomlConfig::from_toml_str("[google\nreview_cap = 5").is_err());
    }
}
