#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::InstructionTemplate;
use crate::utils::error::{Result, ReviewError};
use crate::utils::validation::{validate_required_env, Validate};
use std::path::Path;

pub use toml_config::TomlConfig;

pub const GOOGLE_PLACES_API_KEY: &str = "GOOGLE_PLACES_API_KEY";
pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const OUTSCRAPER_API_KEY: &str = "OUTSCRAPER_API_KEY";

/// Secrets read once from the environment.
#[derive(Clone)]
pub struct ApiKeys {
    pub google_places: String,
    pub anthropic: String,
    pub outscraper: Option<String>,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("google_places", &"***")
            .field("anthropic", &"***")
            .field("outscraper", &self.outscraper.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ApiKeys {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            google_places: validate_required_env(GOOGLE_PLACES_API_KEY, lookup(GOOGLE_PLACES_API_KEY))?,
            anthropic: validate_required_env(ANTHROPIC_API_KEY, lookup(ANTHROPIC_API_KEY))?,
            outscraper: lookup(OUTSCRAPER_API_KEY).filter(|k| !k.trim().is_empty()),
        })
    }
}

/// Immutable process configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub keys: ApiKeys,
    pub settings: TomlConfig,
    pub template: InstructionTemplate,
}

impl AppConfig {
    /// Loads `.env`, secrets, the optional TOML file and the instruction template.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = match config_path {
            Some(path) => {
                tracing::info!("📄 Loading settings from {}", path.display());
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        Self::from_parts(ApiKeys::from_env()?, settings)
    }

    pub fn from_parts(keys: ApiKeys, settings: TomlConfig) -> Result<Self> {
        settings.validate()?;
        let template = load_template(&settings.prompt.template_path)?;

        Ok(Self {
            keys,
            settings,
            template,
        })
    }

    /// The secondary source runs only when enabled and its key is present.
    pub fn secondary_key(&self) -> Option<&str> {
        if self.settings.secondary.enabled {
            self.keys.outscraper.as_deref()
        } else {
            None
        }
    }
}

pub fn load_template(path: &Path) -> Result<InstructionTemplate> {
    let text = std::fs::read_to_string(path).map_err(|e| ReviewError::InvalidConfigValue {
        field: "prompt.template_path".to_string(),
        value: path.display().to_string(),
        reason: format!("cannot read instruction template: {}", e),
    })?;

    if text.trim().is_empty() {
        return Err(ReviewError::InvalidConfigValue {
            field: "prompt.template_path".to_string(),
            value: path.display().to_string(),
            reason: "instruction template is empty".to_string(),
        });
    }

    Ok(InstructionTemplate::new(text))
}
