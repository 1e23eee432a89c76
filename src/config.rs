use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    enrichment::DEFAULT_RETRIES,
    error::{ConfigError, Result},
    model::{ForestParams, TreeParams},
};

/// Main configuration for tempo-run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the pipeline's flat files live
    pub storage: StorageConfig,

    /// Feature-generation service settings
    pub service: ServiceConfig,

    /// Regression model settings
    pub training: TrainingConfig,

    /// Top-songs listing settings
    pub listing: ListingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.storage.validate()?;
        self.service.validate()?;
        self.training.validate()?;
        self.listing.validate()?;
        Ok(())
    }
}

/// Flat-file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Append-only observation log
    pub observations: PathBuf,

    /// Condensed (aggregated + enriched) table
    pub condensed: PathBuf,

    /// Trained model artifact
    pub model: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            observations: PathBuf::from("training_data.json"),
            condensed: PathBuf::from("condensed_training_data.json"),
            model: PathBuf::from("pace_model.json"),
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        for (key, path) in [
            ("storage.observations", &self.observations),
            ("storage.condensed", &self.condensed),
            ("storage.model", &self.model),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: String::new()
                }.into());
            }
        }

        Ok(())
    }
}

/// Feature-generation service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,

    /// Model name sent with each request
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Additional attempts after the first failed or empty one
    pub retries: u32,

    /// Sampling temperature; the service default when unset
    pub temperature: Option<f32>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-8b-8192".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout_secs: 60,
            retries: DEFAULT_RETRIES,
            temperature: None,
        }
    }
}

impl ServiceConfig {
    fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "service.base_url".to_string(),
                value: self.base_url.clone()
            }.into());
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "service.model".to_string(),
                value: self.model.clone()
            }.into());
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "service.timeout_secs".to_string(),
                value: self.timeout_secs.to_string()
            }.into());
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::InvalidValue {
                    key: "service.temperature".to_string(),
                    value: temperature.to_string()
                }.into());
            }
        }

        Ok(())
    }
}

/// Regression trainer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of trees in the forest
    pub n_estimators: usize,

    /// Share of rows held out for evaluation
    pub test_fraction: f64,

    /// Seed for the split and for bootstrap sampling
    pub seed: u64,

    /// Maximum tree depth; unlimited when unset
    pub max_depth: Option<usize>,

    /// Minimum samples required to split a node
    pub min_samples_split: usize,

    /// Minimum samples in each leaf
    pub min_samples_leaf: usize,

    /// Worker threads used to grow trees
    pub threads: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            test_fraction: 0.2,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            threads: num_cpus::get(),
        }
    }
}

impl TrainingConfig {
    fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(ConfigError::InvalidValue {
                key: "training.n_estimators".to_string(),
                value: self.n_estimators.to_string()
            }.into());
        }

        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "training.test_fraction".to_string(),
                value: self.test_fraction.to_string()
            }.into());
        }

        if self.min_samples_split < 2 {
            return Err(ConfigError::InvalidValue {
                key: "training.min_samples_split".to_string(),
                value: self.min_samples_split.to_string()
            }.into());
        }

        if self.min_samples_leaf == 0 {
            return Err(ConfigError::InvalidValue {
                key: "training.min_samples_leaf".to_string(),
                value: self.min_samples_leaf.to_string()
            }.into());
        }

        if self.max_depth == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "training.max_depth".to_string(),
                value: "0".to_string()
            }.into());
        }

        if self.threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "training.threads".to_string(),
                value: self.threads.to_string()
            }.into());
        }

        Ok(())
    }

    /// Forest hyper-parameters derived from this configuration
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.n_estimators,
            tree: TreeParams {
                max_depth: self.max_depth,
                min_samples_split: self.min_samples_split,
                min_samples_leaf: self.min_samples_leaf,
            },
            bootstrap: true,
            seed: self.seed,
        }
    }
}

/// Top-songs listing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Number of songs to list
    pub top_n: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

impl ListingConfig {
    fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(ConfigError::InvalidValue {
                key: "listing.top_n".to_string(),
                value: self.top_n.to_string()
            }.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.service.retries, 2);
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.training.n_estimators, 100);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tempo-run.toml");

        let mut original_config = Config::default();
        original_config.training.max_depth = Some(8);
        original_config.service.temperature = Some(0.2);

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[service]\nretries = 4\n\n[listing]\ntop_n = 10\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.service.retries, 4);
        assert_eq!(config.service.model, "llama3-8b-8192");
        assert_eq!(config.listing.top_n, 10);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/definitely/not/here.toml");
        assert!(matches!(
            result,
            Err(crate::error::PaceError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_invalid_test_fraction() {
        let mut config = Config::default();
        config.training.test_fraction = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.service.base_url = "api.groq.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_forest_params_follow_config() {
        let mut training = TrainingConfig::default();
        training.n_estimators = 10;
        training.max_depth = Some(4);

        let params = training.forest_params();
        assert_eq!(params.n_estimators, 10);
        assert_eq!(params.tree.max_depth, Some(4));
        assert_eq!(params.seed, 42);
        assert!(params.bootstrap);
    }
}
