//! Application configuration loading from config.toml
//!
//! The file names the user whose recurring expenses the batch job processes and
//! optionally lists categories and recurring expenses to seed on first run.

use crate::entities::{Frequency, TransactionType};
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Owner id used for the batch run and for seeded records
    pub user_id: String,
    /// Categories to create when missing
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Recurring expenses to create when missing
    #[serde(default)]
    pub recurring_expenses: Vec<RecurringExpenseConfig>,
}

/// Configuration for a single category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Name of the category
    pub name: String,
    /// `expense` (default) or `income`
    #[serde(default = "default_category_type")]
    pub category_type: TransactionType,
}

/// Configuration for a single recurring expense
#[derive(Debug, Deserialize, Clone)]
pub struct RecurringExpenseConfig {
    /// Name of the recurring expense
    pub name: String,
    /// Name of the category it is charged to
    pub category: String,
    /// Amount per occurrence
    pub amount: f64,
    /// `weekly`, `monthly` or `yearly`
    pub frequency: Frequency,
    /// First due date, if already known
    #[serde(default)]
    pub next_due: Option<NaiveDate>,
    /// Whether the batch job may materialize it unattended
    #[serde(default)]
    pub auto_add: bool,
    /// Optional notes
    #[serde(default)]
    pub description: Option<String>,
}

const fn default_category_type() -> TransactionType {
    TransactionType::Expense
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.user_id.trim().is_empty() {
        return Err(Error::Config {
            message: "user_id cannot be empty".to_string(),
        });
    }

    Ok(config)
}

/// Loads configuration from `CONFIG_PATH`, or ./config.toml when unset.
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}
