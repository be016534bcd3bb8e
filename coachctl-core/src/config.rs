use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::{CoachingContext, CoachingRole, UserContext};

/// Configuration for coachctl (~/.coachctl/config.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub endpoint: String,
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Who is signed in and which coaching they are looking at
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub user_id: String,
    pub coaching_id: String,
    pub coaching_owner_id: String,
    pub role: Option<CoachingRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
    pub log_file: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_tick_ms() -> u64 {
    100
}

fn default_toast_secs() -> u64 {
    4
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            toast_secs: default_toast_secs(),
            log_file: None,
        }
    }
}

impl CoachConfig {
    /// Load config from the default location
    ///
    /// Fails hard with actionable error if config doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            anyhow::bail!(
                "Config not found at {:?}\n\nRun: coachctl config init",
                config_path
            );
        }

        let content = fs::read_to_string(config_path)
            .context(format!("Failed to read config file: {:?}", config_path))?;

        let mut config: Self =
            toml::from_str(&content).context("Failed to parse config file (invalid TOML)")?;

        // Expand variables (${var} substitution)
        config.expand_variables();

        Ok(config)
    }

    /// Get config file path: $COACHCTL_CONFIG or ~/.coachctl/config.toml
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var("COACHCTL_CONFIG") {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        Self::home_dir().join("config.toml")
    }

    /// ~/.coachctl
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".coachctl")
    }

    /// Log file for the TUI (it owns the terminal, so logs can't go to stderr)
    pub fn log_file(&self) -> PathBuf {
        self.tui
            .log_file
            .clone()
            .unwrap_or_else(|| Self::home_dir().join("coachctl.log"))
    }

    /// A starter config for `coachctl config init`
    pub fn template() -> Self {
        Self {
            api: ApiConfig {
                endpoint: "http://localhost:8080/v1".to_string(),
                token: Some("${COACHCTL_TOKEN}".to_string()),
                timeout_secs: default_timeout_secs(),
            },
            session: SessionConfig {
                user_id: "${USER}".to_string(),
                coaching_id: "my-coaching".to_string(),
                coaching_owner_id: "${USER}".to_string(),
                role: Some(CoachingRole::Admin),
            },
            tui: TuiConfig::default(),
        }
    }

    pub fn coaching(&self) -> CoachingContext {
        CoachingContext {
            id: self.session.coaching_id.clone(),
            owner_id: self.session.coaching_owner_id.clone(),
            role: self.session.role,
        }
    }

    pub fn user(&self) -> UserContext {
        UserContext {
            id: self.session.user_id.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs.max(1))
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tui.tick_ms.clamp(16, 1000))
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.tui.toast_secs.max(1))
    }

    /// Expand ${var} references from the environment
    fn expand_variables(&mut self) {
        let vars: HashMap<String, String> = env::vars().collect();

        self.api.endpoint = Self::expand_string(&self.api.endpoint, &vars);
        if let Some(ref token) = self.api.token {
            let expanded = Self::expand_string(token, &vars);
            // An unset variable leaves no usable token behind
            self.api.token = Some(expanded).filter(|t| !t.is_empty() && !t.contains("${"));
        }

        self.session.user_id = Self::expand_string(&self.session.user_id, &vars);
        self.session.coaching_id = Self::expand_string(&self.session.coaching_id, &vars);
        self.session.coaching_owner_id =
            Self::expand_string(&self.session.coaching_owner_id, &vars);

        if let Some(ref log_file) = self.tui.log_file {
            let expanded = Self::expand_string(&log_file.display().to_string(), &vars);
            self.tui.log_file = Some(PathBuf::from(expanded));
        }
    }

    /// Expand ${var} references in a string
    fn expand_string(s: &str, vars: &HashMap<String, String>) -> String {
        let mut result = s.to_string();

        for (key, value) in vars {
            let pattern = format!("${{{}}}", key);
            result = result.replace(&pattern, value);
        }

        result
    }

    /// Save config to its default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save config to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, toml_str)
            .context(format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }
}
