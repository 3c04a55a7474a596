//! World capacity and logging configuration

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ecs::Signature;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcsConfig {
    /// Entity pool capacity; ids live in `[0, max_entities)`.
    #[serde(default = "default_max_entities")]
    pub max_entities: usize,
    /// Number of component types a world can register. Also the number of
    /// signature bits in use.
    #[serde(default = "default_max_components")]
    pub max_components: usize,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_entities must be between 1 and {max}, got {got}")]
    EntityCapacity { got: usize, max: usize },
    #[error("max_components must be between 1 and {max}, got {got}")]
    ComponentCapacity { got: usize, max: usize },
}

fn default_max_entities() -> usize {
    EcsConfig::DEFAULT_MAX_ENTITIES
}

fn default_max_components() -> usize {
    EcsConfig::DEFAULT_MAX_COMPONENTS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for EcsConfig {
    fn default() -> Self {
        Self {
            max_entities: Self::DEFAULT_MAX_ENTITIES,
            max_components: Self::DEFAULT_MAX_COMPONENTS,
            logging: LoggingConfig::default(),
        }
    }
}

impl EcsConfig {
    pub const DEFAULT_MAX_ENTITIES: usize = 1000;
    pub const DEFAULT_MAX_COMPONENTS: usize = 32;

    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = u32::MAX as usize;
        if self.max_entities == 0 || self.max_entities > max {
            return Err(ConfigError::EntityCapacity {
                got: self.max_entities,
                max,
            });
        }
        if self.max_components == 0 || self.max_components > Signature::CAPACITY {
            return Err(ConfigError::ComponentCapacity {
                got: self.max_components,
                max: Signature::CAPACITY,
            });
        }
        Ok(())
    }

    /// Load configuration from YAML file
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: EcsConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EcsConfig::default();

        assert_eq!(config.max_entities, 1000);
        assert_eq!(config.max_components, 32);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_bounds() {
        let mut config = EcsConfig::default();
        config.max_components = 64;
        assert!(config.validate().is_ok());

        config.max_components = 65;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ComponentCapacity { got: 65, max: 64 })
        );

        config.max_components = 8;
        config.max_entities = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EntityCapacity { got: 0, .. })
        ));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: EcsConfig = serde_yaml::from_str("max_entities: 64\n").unwrap();
        assert_eq!(config.max_entities, 64);
        assert_eq!(config.max_components, 32);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_serialization() {
        let mut config = EcsConfig::default();
        config.max_entities = 250;
        config.logging.level = "debug".into();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ecs.yaml");
        config.to_yaml(&path).unwrap();

        let loaded = EcsConfig::from_yaml(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "max_components: 100\n").unwrap();

        let err = EcsConfig::from_yaml(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }
}
