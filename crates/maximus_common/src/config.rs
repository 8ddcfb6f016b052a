//! Maximus configuration.
//!
//! Config file: ~/.config/maximus/config.toml or /etc/maximus/config.toml.
//! `$MAXIMUS_CONFIG` or an explicit path overrides both.

use anyhow::{bail, Context, Result};
use maximus_shared::VBUCKS_PER_TIER;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::llm_client::LlmConfig;

pub const CONFIG_ENV: &str = "MAXIMUS_CONFIG";
pub const API_KEY_ENV: &str = "MAXIMUS_LLM_API_KEY";

/// Ledger settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// V-Bucks per tier
    pub tier_size: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            tier_size: VBUCKS_PER_TIER,
        }
    }
}

/// Drawing module settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    /// Seconds of continuous drawing per passive reward tick
    pub activity_tick_secs: u64,
    /// Directory where saved artwork is written
    pub export_dir: PathBuf,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            activity_tick_secs: 10,
            export_dir: PathBuf::from("."),
            canvas_width: 300,
            canvas_height: 200,
        }
    }
}

impl DrawingConfig {
    pub fn activity_tick(&self) -> Duration {
        Duration::from_secs(self.activity_tick_secs)
    }
}

/// Reading module settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    /// Seconds per elapsed-time tick
    pub tick_secs: u64,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self { tick_secs: 1 }
    }
}

impl ReadingConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_secs)
    }
}

/// Main Maximus configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaximusConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub drawing: DrawingConfig,

    #[serde(default)]
    pub reading: ReadingConfig,
}

impl MaximusConfig {
    /// Default user config path: ~/.config/maximus/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(Path::new(&xdg).join("maximus").join("config.toml"));
        }
        let home = std::env::var("HOME").context("Cannot determine home directory")?;
        Ok(Path::new(&home)
            .join(".config")
            .join("maximus")
            .join("config.toml"))
    }

    /// System config path: /etc/maximus/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/maximus/config.toml")
    }

    /// Load configuration.
    ///
    /// Priority:
    /// 1. Explicit path (must exist)
    /// 2. $MAXIMUS_CONFIG (must exist)
    /// 3. User config
    /// 4. System config
    /// 5. Defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load_from(&path)?,
            None => Self::load_default_locations()?,
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                config.llm.api_key = Some(key);
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn load_default_locations() -> Result<Self> {
        if let Ok(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::load_from(&system_path);
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: MaximusConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.ledger.tier_size == 0 {
            bail!("ledger.tier_size must be at least 1");
        }
        if self.drawing.activity_tick_secs == 0 {
            bail!("drawing.activity_tick_secs must be at least 1");
        }
        if self.reading.tick_secs == 0 {
            bail!("reading.tick_secs must be at least 1");
        }
        if self.drawing.canvas_width == 0 || self.drawing.canvas_height == 0 {
            bail!("drawing canvas size must be non-zero");
        }
        Ok(())
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::user_config_path()?)
    }

    /// Render as TOML for display
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
