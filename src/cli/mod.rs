//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Medtally using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Medtally - medication purchase totals from Mercado Público orders
#[derive(Parser, Debug)]
#[command(name = "medtally")]
#[command(version, about, long_about = None)]
#[command(author = "Medtally Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "medtally.toml", env = "MEDTALLY_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MEDTALLY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch orders over a date range and rank medications by quantity
    Extract(commands::extract::ExtractArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_cli_parse_extract() {
        let cli = Cli::parse_from(["medtally", "extract"]);
        assert_eq!(cli.config, "medtally.toml");
        assert!(matches!(cli.command, Commands::Extract(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["medtally", "--config", "julio.toml", "extract"]);
        assert_eq!(cli.config, "julio.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["medtally", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_extract_overrides() {
        let cli = Cli::parse_from([
            "medtally",
            "extract",
            "--from",
            "2024-07-01",
            "--to",
            "2024-07-15",
            "--top",
            "10",
            "--output-dir",
            "salida",
            "--parallel-days",
            "4",
            "--dry-run",
        ]);

        let Commands::Extract(args) = cli.command else {
            panic!("expected extract command");
        };
        assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert_eq!(args.to, NaiveDate::from_ymd_opt(2024, 7, 15));
        assert_eq!(args.top, Some(10));
        assert_eq!(args.output_dir.as_deref(), Some("salida"));
        assert_eq!(args.parallel_days, Some(4));
        assert!(args.dry_run);
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        let result = Cli::try_parse_from(["medtally", "extract", "--from", "01-07-2024"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["medtally", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["medtally", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.force));
    }
}
