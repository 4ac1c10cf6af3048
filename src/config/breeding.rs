use serde::Deserialize;
use std::path::Path;

use crate::mutation::ResolverPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct CrossbreedConfig {
    #[serde(default = "default_rule_file")]
    pub rule_file: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_trials")]
    pub trials: u32,
    #[serde(default = "default_true")]
    pub mutations_enabled: bool,
    #[serde(default = "default_true")]
    pub allow_self_mutation: bool,
    #[serde(default = "default_true")]
    pub crop_counts_as_parent: bool,
}

fn default_rule_file() -> String {
    "./rules.toml".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_trials() -> u32 {
    1
}
fn default_true() -> bool {
    true
}

impl Default for CrossbreedConfig {
    fn default() -> Self {
        CrossbreedConfig {
            rule_file: default_rule_file(),
            log_level: default_log_level(),
            seed: 0,
            trials: default_trials(),
            mutations_enabled: true,
            allow_self_mutation: true,
            crop_counts_as_parent: true,
        }
    }
}

impl CrossbreedConfig {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content, path)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self, String> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        let config: CrossbreedConfig =
            toml::from_str(content).map_err(|e| format!("{}: {}", source_path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if self.rule_file.trim().is_empty() {
            errors.push(
                "rule_file must not be empty. Example: rule_file = \"./rules.toml\"".to_string(),
            );
        }

        if self.trials == 0 {
            errors.push(format!(
                "trials must be > 0, got {}. Example: trials = 1000",
                self.trials
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level must be one of {:?}, got '{}'. Example: log_level = \"info\"",
                valid_levels, self.log_level
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }

    pub fn policy(&self) -> ResolverPolicy {
        ResolverPolicy {
            allow_self_mutation: self.allow_self_mutation,
            crop_counts_as_parent: self.crop_counts_as_parent,
        }
    }
}
