//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::MedTallyConfig;
use super::secret::secret_string;
use crate::domain::errors::MedTallyError;
use crate::domain::result::Result;
use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "MEDTALLY";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into MedTallyConfig
/// 4. Applies environment variable overrides (MEDTALLY_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - An override has an unparseable value
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use medtally::config::load_config;
///
/// let config = load_config("medtally.toml").expect("Failed to load config");
/// println!("Extracting from {}", config.extract.date_from);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<MedTallyConfig> {
    let config = parse_config_file(path)?;

    config.validate().map_err(|e| {
        MedTallyError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Loads configuration without validating it
///
/// Used where a partially valid file is still useful, such as reading the
/// logging section before the rest of the configuration is checked.
///
/// # Errors
///
/// Same as [`load_config`] minus validation.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<MedTallyConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MedTallyError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MedTallyError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: MedTallyConfig = toml::from_str(&contents)
        .map_err(|e| MedTallyError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| MedTallyError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut missing_vars: Vec<String> = Vec::new();

    let lines: Vec<String> = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_string();
            }
            re.replace_all(line, |caps: &Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                })
            })
            .into_owned()
        })
        .collect();

    if !missing_vars.is_empty() {
        return Err(MedTallyError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using the MEDTALLY_* prefix
///
/// Environment variables follow the pattern: MEDTALLY_<SECTION>_<KEY>
/// For example: MEDTALLY_MERCADOPUBLICO_TICKET, MEDTALLY_EXTRACT_DATE_FROM
fn apply_env_overrides(config: &mut MedTallyConfig) -> Result<()> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

fn apply_overrides<F>(config: &mut MedTallyConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |section: &str, key: &str| lookup(&format!("{ENV_PREFIX}_{section}_{key}"));

    // Application overrides
    if let Some(val) = var("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Mercado Público overrides
    if let Some(val) = var("MERCADOPUBLICO", "BASE_URL") {
        config.mercadopublico.base_url = val;
    }
    if let Some(val) = var("MERCADOPUBLICO", "TICKET") {
        config.mercadopublico.ticket = Some(secret_string(val));
    }
    if let Some(val) = var("MERCADOPUBLICO", "ORDER_STATUS") {
        config.mercadopublico.order_status = val;
    }
    if let Some(val) = var("MERCADOPUBLICO", "TIMEOUT_SECONDS") {
        config.mercadopublico.timeout_seconds = parse_number("TIMEOUT_SECONDS", &val)?;
    }
    if let Some(val) = var("MERCADOPUBLICO", "REQUEST_DELAY_MS") {
        config.mercadopublico.request_delay_ms = parse_number("REQUEST_DELAY_MS", &val)?;
    }
    if let Some(val) = var("MERCADOPUBLICO", "RETRY_MAX_RETRIES") {
        config.mercadopublico.retry.max_retries = parse_number("RETRY_MAX_RETRIES", &val)?;
    }

    // Extract overrides
    if let Some(val) = var("EXTRACT", "DATE_FROM") {
        config.extract.date_from = parse_date("DATE_FROM", &val)?;
    }
    if let Some(val) = var("EXTRACT", "DATE_TO") {
        config.extract.date_to = parse_date("DATE_TO", &val)?;
    }
    if let Some(val) = var("EXTRACT", "PARALLEL_DAYS") {
        config.extract.parallel_days = parse_number("PARALLEL_DAYS", &val)?;
    }

    // Output overrides
    if let Some(val) = var("OUTPUT", "DIRECTORY") {
        config.output.directory = val;
    }
    if let Some(val) = var("OUTPUT", "TOP_N") {
        config.output.top_n = parse_number("TOP_N", &val)?;
    }
    if let Some(val) = var("OUTPUT", "DRY_RUN") {
        config.output.dry_run = val.parse().unwrap_or(false);
    }

    // Logging overrides
    if let Some(val) = var("LOGGING", "LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = var("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = var("LOGGING", "LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        MedTallyError::Configuration(format!(
            "Invalid numeric value '{value}' for {ENV_PREFIX} override {key}"
        ))
    })
}

fn parse_date(key: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        MedTallyError::Configuration(format!(
            "Invalid date '{value}' for {ENV_PREFIX} override {key}, expected YYYY-MM-DD"
        ))
    })
}
