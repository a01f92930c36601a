//! Pipeline configuration.
//!
//! Loaded from a YAML file, with the API key picked up from the environment
//! after parsing so secrets never need to live in the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::model::ParamOverrides;

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Which judgment engine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JudgeKind {
    /// Deterministic rule evaluation, no network I/O.
    #[default]
    Rules,
    /// Iterative model-driven action-observation loop.
    React,
}

/// Settings for the text-generation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
    /// Filled from `OPENAI_API_KEY` when absent; never serialized back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            timeout_secs: 30,
            api_key: None,
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppraiseConfig {
    /// Checks to plan, in execution order.
    pub check_order: Vec<String>,
    /// Per-check parameter overrides applied at planning time.
    pub overrides: ParamOverrides,
    /// Halt the run on the first critical verdict.
    pub early_exit_on_critical: bool,
    pub judge: JudgeKind,
    pub llm: LlmSettings,
    /// Directory of `<check>.md` criteria documents overriding the built-ins.
    pub criteria_dir: Option<PathBuf>,
}

impl Default for AppraiseConfig {
    fn default() -> Self {
        Self {
            check_order: vec!["length_check".to_string(), "keyword_check".to_string()],
            overrides: ParamOverrides::new(),
            early_exit_on_critical: true,
            judge: JudgeKind::default(),
            llm: LlmSettings::default(),
            criteria_dir: None,
        }
    }
}

impl AppraiseConfig {
    /// Load from a YAML file and apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self =
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.apply_env();
        Ok(config)
    }

    /// Pick up the API key from the environment when the file left it unset.
    pub fn apply_env(&mut self) {
        if self.llm.api_key.is_none() {
            if let Ok(key) = std::env::var(OPENAI_API_KEY_ENV) {
                if !key.is_empty() {
                    self.llm.api_key = Some(key);
                }
            }
        }
    }
}
