//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Reward tuning (award amount, goal step, baseline goal)
//! - Display preferences for the progress views
//! - The local user identity used to scope checkpoints
//!
//! Configuration is stored at `~/.config/habitloop/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::reward::{RewardConfig, DEFAULT_AWARD_AMOUNT, DEFAULT_BASELINE_GOAL, DEFAULT_GOAL_STEP};

/// Reward tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardSection {
    #[serde(default = "default_award_amount")]
    pub award_amount: u64,
    #[serde(default = "default_goal_step")]
    pub goal_step: u32,
    #[serde(default = "default_baseline_goal")]
    pub baseline_goal: u32,
}

/// Display preferences for the progress views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySection {
    #[serde(default = "default_true")]
    pub show_chart: bool,
    #[serde(default = "default_gallery_columns")]
    pub gallery_columns: u32,
}

/// Local user identity; scopes the reward checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSection {
    #[serde(default = "default_user_id")]
    pub id: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/habitloop/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reward: RewardSection,
    #[serde(default)]
    pub display: DisplaySection,
    #[serde(default)]
    pub user: UserSection,
}

// Default functions
fn default_award_amount() -> u64 {
    DEFAULT_AWARD_AMOUNT
}
fn default_goal_step() -> u32 {
    DEFAULT_GOAL_STEP
}
fn default_baseline_goal() -> u32 {
    DEFAULT_BASELINE_GOAL
}
fn default_true() -> bool {
    true
}
fn default_gallery_columns() -> u32 {
    3
}
fn default_user_id() -> String {
    "local".to_string()
}

impl Default for RewardSection {
    fn default() -> Self {
        Self {
            award_amount: default_award_amount(),
            goal_step: default_goal_step(),
            baseline_goal: default_baseline_goal(),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            show_chart: true,
            gallery_columns: default_gallery_columns(),
        }
    }
}

impl Default for UserSection {
    fn default() -> Self {
        Self {
            id: default_user_id(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reward: RewardSection::default(),
            display: DisplaySection::default(),
            user: UserSection::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown_key = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".to_string(),
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown_key());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown_key)?;
                let existing = obj.get(part).ok_or_else(unknown_key)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => {
                        let parsed =
                            value
                                .parse::<bool>()
                                .map_err(|_| ConfigError::InvalidValue {
                                    key: key.to_string(),
                                    message: format!("cannot parse '{value}' as bool"),
                                })?;
                        serde_json::Value::Bool(parsed)
                    }
                    serde_json::Value::Number(_) => {
                        let parsed =
                            value
                                .parse::<u64>()
                                .map_err(|_| ConfigError::InvalidValue {
                                    key: key.to_string(),
                                    message: format!("cannot parse '{value}' as number"),
                                })?;
                        serde_json::Value::Number(parsed.into())
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown_key)?;
        }

        Err(unknown_key())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/habitloop"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        let path = Self::path()?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        self.save()?;
        Ok(())
    }

    /// Reward constants for the engine, from the `[reward]` section.
    pub fn reward_config(&self) -> RewardConfig {
        RewardConfig {
            award_amount: self.reward.award_amount,
            goal_step: self.reward.goal_step,
            baseline_goal: self.reward.baseline_goal,
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
