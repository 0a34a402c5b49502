//! Конфигурация registry
//!
//! Источники в порядке приоритета: environment variables, TOML, defaults.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{InjectError, Result};

/// Environment prefix по умолчанию
pub const DEFAULT_ENV_PREFIX: &str = "INJECTOR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Имя registry для логов и статистики
    pub name: String,
    /// Логировать warning при замене уже зарегистрированного binding
    pub warn_on_overwrite: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            warn_on_overwrite: true,
        }
    }
}

impl RegistryConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Загрузить конфигурацию из TOML строки; отсутствующие поля берутся из defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| InjectError::Configuration {
            message: format!("Failed to parse registry config: {}", e),
        })
    }

    /// Применить `{PREFIX}_REGISTRY_NAME` и `{PREFIX}_WARN_ON_OVERWRITE`
    pub fn apply_env(mut self, prefix: &str) -> Result<Self> {
        if let Ok(name) = env::var(format!("{}_REGISTRY_NAME", prefix)) {
            self.name = name;
        }

        let warn_var = format!("{}_WARN_ON_OVERWRITE", prefix);
        if let Ok(value) = env::var(&warn_var) {
            self.warn_on_overwrite = parse_bool(&value).ok_or_else(|| InjectError::Configuration {
                message: format!("{} must be a boolean, got \"{}\"", warn_var, value),
            })?;
        }

        Ok(self)
    }

    pub fn from_env() -> Result<Self> {
        Self::default().apply_env(DEFAULT_ENV_PREFIX)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
