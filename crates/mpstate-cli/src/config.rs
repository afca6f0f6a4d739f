//! Configuration loading and types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the mpstate CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// multipass invocation settings
    #[serde(default)]
    pub multipass: MultipassConfig,
    /// State document settings
    #[serde(default)]
    pub store: StoreConfig,
}

/// multipass invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipassConfig {
    /// Binary name or path
    #[serde(default = "default_program")]
    pub program: String,
    /// Seconds before an info run is killed; 0 disables the deadline
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MultipassConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// State document settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Where the state document lives
    #[serde(default = "default_state_path")]
    pub path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
            log_level: default_log_level(),
        }
    }
}

fn default_program() -> String {
    mpstate_multipass::client::MULTIPASS_PROGRAM.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_state_path() -> PathBuf {
    PathBuf::from("mpstate.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &PathBuf) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from default paths or use defaults
    ///
    /// # Errors
    /// Returns error if a config file exists but cannot be read or parsed
    pub fn load_default() -> eyre::Result<Self> {
        // Check environment variable
        if let Ok(path) = std::env::var("MPSTATE_CONFIG") {
            return Self::load(&PathBuf::from(path));
        }

        // Try common paths
        let paths = [
            PathBuf::from("mpstate.toml"),
            PathBuf::from("/etc/mpstate/mpstate.toml"),
            dirs::config_dir()
                .map(|p| p.join("mpstate/mpstate.toml"))
                .unwrap_or_default(),
        ];

        for path in paths {
            if path.exists() {
                return Self::load(&path);
            }
        }

        // Return default config if no file found
        tracing::warn!("no config file found, using defaults");
        Ok(Config::default())
    }
}
