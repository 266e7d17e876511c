//! Configuration module for `GradeLens`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

fn default_level() -> String {
    "info".to_string()
}

fn default_profile() -> String {
    "default".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default = "default_level")]
    pub level: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            verbose: false,
        }
    }
}

/// History storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Profile name used to key the history file
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Directory holding history files; empty means the platform data dir
    #[serde(default)]
    pub history_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            history_dir: String::new(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// History storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override storage profile
    pub profile: Option<String>,
    /// Override history directory
    pub history_dir: Option<String>,
}

impl Config {
    /// Get the `$GRADELENS` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/gradelens`
    /// - macOS: `~/Library/Application Support/gradelens`
    /// - Windows: `%APPDATA%\gradelens`
    #[must_use]
    pub fn get_gradelens_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradelens")
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds so a
    /// development checkout never clobbers a real config.
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_gradelens_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$GRADELENS` variable in a string
    ///
    /// Replaces occurrences of `$GRADELENS` with the actual gradelens
    /// directory path so configured paths can reference the config directory.
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains("$GRADELENS") {
            let gradelens_dir = Self::get_gradelens_dir();
            value.replace("$GRADELENS", gradelens_dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields take their serde defaults, so a partial config file
    /// (say, just `[logging]`) is valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the
    /// expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;
        config.storage.history_dir = Self::expand_variables(&config.storage.history_dir);
        Ok(config)
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Command-line arguments override config file values for this run only;
    /// the persistent file is not modified. Only non-`None` values in the
    /// overrides struct replace config values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(profile) = &overrides.profile {
            self.storage.profile.clone_from(profile);
        }
        if let Some(history_dir) = &overrides.history_dir {
            self.storage.history_dir.clone_from(history_dir);
        }
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// First run creates the config directory and writes the defaults out so
    /// the user has a file to edit. Falls back to defaults on any read or
    /// parse error.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(config) = Self::from_toml(&content) {
                    return config;
                }
            }
        } else {
            let defaults = Self::default();
            let _ = defaults.save();
            return defaults;
        }

        Self::default()
    }

    /// Save configuration to file
    ///
    /// Serializes to TOML and writes to the platform config file, creating
    /// the config directory if needed.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config cannot be serialized to TOML (shouldn't happen)
    /// - The config directory cannot be created
    /// - The file cannot be written (permissions, disk full, etc.)
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `verbose`, `profile`, `history_dir`.
    ///
    /// # Returns
    /// - `Some(String)`: The configuration value as a string
    /// - `None`: If the key is not recognized
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "profile" => Some(self.storage.profile.clone()),
            "history_dir" | "history-dir" => Some(self.storage.history_dir.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config. Call [`save()`](Config::save) to persist
    /// changes.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The key is not recognized
    /// - The value cannot be parsed (e.g., "maybe" for verbose boolean)
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "profile" => self.storage.profile = value.to_string(),
            "history_dir" | "history-dir" => self.storage.history_dir = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// Updates the in-memory config. Call [`save()`](Config::save) to persist
    /// changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str) -> Result<(), String> {
        let defaults = Self::default();
        match key {
            "level" => self.logging.level = defaults.logging.level,
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "profile" => self.storage.profile = defaults.storage.profile,
            "history_dir" | "history-dir" => {
                self.storage.history_dir = defaults.storage.history_dir;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file, causing the next
    /// [`load()`](Config::load) call to recreate it from defaults. Succeeds
    /// silently when the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    /// (permissions, file locked, etc.)
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }

    /// Resolved history repository path for the configured profile.
    ///
    /// An empty `history_dir` means the platform data directory.
    #[must_use]
    pub fn history_file_path(&self) -> PathBuf {
        let file_name = format!("{}-history.json", self.storage.profile);
        if self.storage.history_dir.is_empty() {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("gradelens")
                .join(file_name)
        } else {
            PathBuf::from(&self.storage.history_dir).join(file_name)
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[storage]")?;
        writeln!(f, "  profile = \"{}\"", self.storage.profile)?;
        writeln!(f, "  history_dir = \"{}\"", self.storage.history_dir)?;

        Ok(())
    }
}
