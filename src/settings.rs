//! # Settings Module
//!
//! ## Purpose
//! Persistent configuration of the calculator client: where the computation service
//! lives, the precision new values are shown with, what the editor and the molecule
//! mass/mole fields start with, and how much is logged.
//!
//! ## Architecture
//! - **ClientConfig**: serializable configuration structure
//! - **ConfigManager**: loads, validates, updates and saves the configuration
//! - **Configuration File**: JSON file, `chemcalc_config.json` by default. A missing or
//!   unreadable file means the default configuration
//!
//! ## Configuration Format
//! ```json
//! {
//!   "service_url": "http://127.0.0.1:5000/",
//!   "default_precision": 2,
//!   "initial_expression": "H_2 + O_2 \\rightarrow H_2O",
//!   "initial_inputs": { "mass": "", "mole": "" },
//!   "log_level": "info"
//! }
//! ```
//!
//! ## Usage
//! ```rust, ignore
//! let mut manager = ConfigManager::new();
//! manager.set_service_url("http://localhost:5000/")?;
//! let session = Session::from_config(manager.get_config());
//! ```
use crate::Rendering::precision::{DEFAULT_PRECISION, MAX_PRECISION};
use crate::Rendering::result_renderer::InitialInputs;
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "chemcalc_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// base URL the four endpoints are joined to
    pub service_url: String,
    pub default_precision: u32,
    pub initial_expression: String,
    #[serde(default)]
    pub initial_inputs: InitialInputs,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:5000/".to_string(),
            default_precision: DEFAULT_PRECISION,
            initial_expression: "H_2 + O_2 \\rightarrow H_2O".to_string(),
            initial_inputs: InitialInputs::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// `log_level` as a filter; unknown names fall back to `Info`
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

/// Loads the configuration file and keeps it in sync with the changes made through it
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: ClientConfig,
    config_file: String,
}

impl ConfigManager {
    /// Configuration from `chemcalc_config.json` in the current directory, or the default
    pub fn new() -> Self {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    pub fn with_config_file(config_file: &str) -> Self {
        let config = Self::load_config(config_file).unwrap_or_default();
        Self {
            config,
            config_file: config_file.to_string(),
        }
    }

    fn load_config(config_file: &str) -> Result<ClientConfig, Box<dyn std::error::Error>> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            let mut config: ClientConfig = serde_json::from_str(&content)?;
            if config.default_precision > MAX_PRECISION {
                warn!(
                    "default precision {} in {} is above {}, using {}",
                    config.default_precision, config_file, MAX_PRECISION, DEFAULT_PRECISION
                );
                config.default_precision = DEFAULT_PRECISION;
            }
            Ok(config)
        } else {
            Ok(ClientConfig::default())
        }
    }

    /// Writes the configuration back to its file. Does nothing during tests.
    pub fn save_config(&self) -> Result<(), Box<dyn std::error::Error>> {
        #[cfg(test)]
        {
            return Ok(());
        }

        #[cfg(not(test))]
        {
            let content = serde_json::to_string_pretty(&self.config)?;
            fs::write(&self.config_file, content)?;
            Ok(())
        }
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    pub fn get_config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn set_service_url(&mut self, service_url: &str) -> Result<(), Box<dyn std::error::Error>> {
        let url = Url::parse(service_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!("Unsupported scheme: {}", url.scheme()).into());
        }
        self.config.service_url = url.to_string();
        self.save_config()
    }

    pub fn set_default_precision(&mut self, precision: u32) -> Result<(), Box<dyn std::error::Error>> {
        if precision > MAX_PRECISION {
            return Err(format!("Precision must be at most {}", MAX_PRECISION).into());
        }
        self.config.default_precision = precision;
        self.save_config()
    }

    pub fn set_initial_expression(&mut self, latex: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.config.initial_expression = latex.to_string();
        self.save_config()
    }

    pub fn set_initial_inputs(&mut self, inputs: InitialInputs) -> Result<(), Box<dyn std::error::Error>> {
        self.config.initial_inputs = inputs;
        self.save_config()
    }

    pub fn set_log_level(&mut self, level: &str) -> Result<(), Box<dyn std::error::Error>> {
        let filter = LevelFilter::from_str(level)
            .map_err(|_| format!("Unknown log level: {}", level))?;
        self.config.log_level = filter.to_string().to_lowercase();
        self.save_config()
    }

    pub fn reset_to_defaults(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.config = ClientConfig::default();
        self.save_config()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
