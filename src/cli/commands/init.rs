//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "medtally.toml")]
    pub output: String,

    /// Include every setting with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Medtally configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Request an API ticket at https://api.mercadopublico.cl");
                println!("  2. Put MERCADOPUBLICO_TICKET=<your ticket> in a .env file");
                println!("  3. Adjust [extract] date_from / date_to in {}", self.output);
                println!("  4. Validate configuration: medtally validate-config");
                println!("  5. Run: medtally extract");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Medtally Configuration File

[mercadopublico]
ticket = "${MERCADOPUBLICO_TICKET}"

[extract]
date_from = "2024-07-01"
date_to = "2024-07-31"

[output]
directory = "."
"#
        .to_string()
    }

    /// Generate configuration with every setting documented
    fn generate_config_with_examples() -> String {
        r#"# Medtally Configuration File
# Ranks medications bought through Mercado Público purchase orders

[application]
# trace | debug | info | warn | error
log_level = "info"

[mercadopublico]
base_url = "https://api.mercadopublico.cl/servicios/v1/publico/ordenesdecompra.json"
# Never commit the ticket: keep it in the environment or a .env file
ticket = "${MERCADOPUBLICO_TICKET}"
# Order status used to list a day's orders
order_status = "aceptada"
timeout_seconds = 60
# Pause after every successful request
request_delay_ms = 250

[mercadopublico.retry]
max_retries = 3
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[extract]
# Inclusive range, YYYY-MM-DD
date_from = "2024-07-01"
date_to = "2024-07-31"
# Days fetched concurrently (1-31)
parallel_days = 1

[output]
directory = "."
summary_file = "resumen_top_medicamentos.csv"
raw_file = "items_medicamentos_raw.csv"
# Rows printed in the console table
top_n = 20
dry_run = false

[logging]
local_enabled = false
local_path = "logs"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MedTallyConfig;
    use tempfile::TempDir;

    fn parse_template(template: &str) -> MedTallyConfig {
        let resolved = template.replace("${MERCADOPUBLICO_TICKET}", "TEST-TICKET");
        toml::from_str(&resolved).unwrap()
    }

    #[test]
    fn test_templates_are_valid() {
        for template in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config = parse_template(&template);
            assert!(config.validate().is_ok());
            assert_eq!(config.extract.days().len(), 31);
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("medtally.toml");
        fs::write(&path, "# existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# existing");

        let args = InitArgs { force: true, ..args };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&path).unwrap().contains("[mercadopublico]"));
    }
}
