//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Medtally configuration file.

use crate::config::{parse_config_file, MedTallyConfig};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match parse_config_file(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                print!("{}", describe_config(&config));
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2)
            }
        }
    }
}

/// Human readable configuration summary with the ticket masked
pub fn describe_config(config: &MedTallyConfig) -> String {
    let ticket = config
        .mercadopublico
        .ticket
        .as_ref()
        .map(|t| t.expose_secret().masked())
        .unwrap_or_else(|| "(not set)".to_string());

    let mut lines = vec![
        "Configuration Summary:".to_string(),
        format!("  Log Level: {}", config.application.log_level),
        format!("  API Endpoint: {}", config.mercadopublico.base_url),
        format!("  API Ticket: {ticket}"),
        format!("  Order Status: {}", config.mercadopublico.order_status),
        format!(
            "  Request Delay: {} ms (timeout {} s, {} attempts)",
            config.mercadopublico.request_delay_ms,
            config.mercadopublico.timeout_seconds,
            config.mercadopublico.retry.max_retries
        ),
        format!(
            "  Date Range: {} .. {} ({} days, {} in parallel)",
            config.extract.date_from,
            config.extract.date_to,
            config.extract.days().len(),
            config.extract.parallel_days
        ),
        format!("  Output Directory: {}", config.output.directory),
        format!("  Summary File: {}", config.output.summary_file),
        format!("  Items File: {}", config.output.raw_file),
        format!("  Top N: {}", config.output.top_n),
        format!("  Dry Run: {}", config.output.dry_run),
    ];
    if config.logging.local_enabled {
        lines.push(format!(
            "  Log Files: {} ({})",
            config.logging.local_path, config.logging.local_rotation
        ));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_describe_config_masks_ticket() {
        let mut config = MedTallyConfig::default();
        config.mercadopublico.ticket =
            Some(secret_string("1A53E862-03F9-4F2C-9E15-32046FC3C18F".to_string()));

        let text = describe_config(&config);
        assert!(!text.contains("1A53E862"));
        assert!(text.contains("C18F"));
        assert!(text.contains("31 days"));
    }

    #[test]
    fn test_describe_config_without_ticket() {
        let text = describe_config(&MedTallyConfig::default());
        assert!(text.contains("API Ticket: (not set)"));
        assert!(!text.contains("Log Files"));
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let code = ValidateArgs {}
            .execute("does-not-exist-medtally.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
