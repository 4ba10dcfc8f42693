pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use config::{AppConfig, TomlConfig};
pub use core::analyzer::ReviewAnalyzer;
pub use domain::model::{AnalysisMeta, AnalysisReport};
pub use utils::error::{Result, ReviewError};
