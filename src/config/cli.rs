use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "hotel-review-digest")]
#[command(about = "Summarizes hotel guest reviews with a hosted language model")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// TOML file with tunable settings
    #[arg(long, global = true, env = "REVIEW_DIGEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides [server].host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Overrides [server].port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[arg(long, global = true, value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Analyze one hotel and print the result
    Analyze {
        /// Hotel name as a guest would type it
        hotel_name: String,

        /// Log CPU and memory usage around each phase
        #[arg(long)]
        monitor: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl CliConfig {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = CliConfig::parse_from(["hotel-review-digest"]);
        assert!(matches!(cli.command(), Command::Serve));
        assert_eq!(cli.log_format, LogFormat::Pretty);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_analyze_with_overrides() {
        let cli = CliConfig::parse_from([
            "hotel-review-digest",
            "analyze",
            "Pestana Palace",
            "--monitor",
            "--port",
            "9000",
            "--log-format",
            "json",
            "-v",
        ]);

        match cli.command() {
            Command::Analyze {
                hotel_name,
                monitor,
            } => {
                assert_eq!(hotel_name, "Pestana Palace");
                assert!(monitor);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.verbose);
    }
}
