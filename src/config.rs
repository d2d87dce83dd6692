// Mon Feb 02 2026 - Alex

use crate::error::LeakError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub leaks_binary: PathBuf,
    pub simctl_binary: PathBuf,
    /// Always passed to `leaks`, ahead of any given on the command line.
    pub excluded_symbols: Vec<String>,
    pub artifact_dir: Option<PathBuf>,
    pub pretty_json: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            leaks_binary: PathBuf::from("leaks"),
            simctl_binary: PathBuf::from("xcrun"),
            excluded_symbols: Vec::new(),
            artifact_dir: None,
            pretty_json: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, LeakError> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate().map_err(LeakError::Config)?;
        Ok(config)
    }

    pub fn with_leaks_binary(mut self, path: PathBuf) -> Self {
        self.leaks_binary = path;
        self
    }

    pub fn with_artifact_dir(mut self, dir: PathBuf) -> Self {
        self.artifact_dir = Some(dir);
        self
    }

    pub fn with_excluded_symbol(mut self, symbol: &str) -> Self {
        self.excluded_symbols.push(symbol.to_string());
        self
    }

    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.leaks_binary.as_os_str().is_empty() {
            return Err("leaks_binary must not be empty".to_string());
        }
        if self.simctl_binary.as_os_str().is_empty() {
            return Err("simctl_binary must not be empty".to_string());
        }
        if self.excluded_symbols.iter().any(|s| s.trim().is_empty()) {
            return Err("excluded_symbols must not contain blank entries".to_string());
        }
        match self.log_level.to_lowercase().as_str() {
            "off" | "error" | "warn" | "warning" | "info" | "debug" | "trace" => Ok(()),
            other => Err(format!("unknown log_level: {}", other)),
        }
    }
}
