//! User configuration
//!
//! Read from `<config_dir>/crm-cli/config.toml`. Every section is optional.
//! Environment variables override the file, command-line flags override both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::UserRole;

pub const APP_DIR: &str = "crm-cli";
pub const CONFIG_FILE: &str = "config.toml";
pub const DATA_FILE: &str = "records.json";

pub const ENV_USER: &str = "CRM_CLI_USER";
pub const ENV_ROLE: &str = "CRM_CLI_ROLE";
pub const ENV_DATA_FILE: &str = "CRM_CLI_DATA_FILE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub user: UserConfig,
    pub storage: StorageConfig,
    pub import: ImportConfig,
    pub export: ExportConfig,
}

/// Who is operating the tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub name: String,
    pub role: UserRole,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            name: "admin".to_string(),
            role: UserRole::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Defaults to `<data_dir>/crm-cli/records.json`
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Reject rows with problems instead of importing them with defaults
    pub strict: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where templates and exports are written; defaults to the working directory
    pub directory: Option<PathBuf>,
}

impl Config {
    /// `<config_dir>/crm-cli/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }

    /// Load the config file if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::default_path())?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load a config file; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config TOML")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Apply `CRM_CLI_*` overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(user) = lookup(ENV_USER) {
            self.user.name = user;
        }
        if let Some(role) = lookup(ENV_ROLE) {
            self.user.role = UserRole::from_label(&role);
        }
        if let Some(path) = lookup(ENV_DATA_FILE) {
            self.storage.data_file = Some(PathBuf::from(path));
        }
    }

    pub fn data_file(&self) -> PathBuf {
        self.storage.data_file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join(DATA_FILE)
        })
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.user.name, "admin");
        assert_eq!(config.user.role, UserRole::SalesExecutive);
        assert!(!config.import.strict);
        assert_eq!(config.export_dir(), PathBuf::from("."));
        assert!(config.data_file().ends_with("crm-cli/records.json"));
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::from_toml(
            r#"
[user]
name = "maya"
role = "Delivery Manager"

[import]
strict = true
"#,
        )
        .unwrap();
        assert_eq!(config.user.name, "maya");
        assert_eq!(config.user.role, UserRole::DeliveryManager);
        assert!(config.import.strict);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_unknown_role_kept() {
        let config = Config::from_toml("[user]\nrole = \"Presales Intern\"\n").unwrap();
        assert_eq!(config.user.role, UserRole::Other("Presales Intern".to_string()));
        assert!(config.user.role.is_presales());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_USER, "tom"),
            (ENV_ROLE, "super admin"),
            (ENV_DATA_FILE, "/tmp/crm.json"),
        ]);
        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.user.name, "tom");
        assert_eq!(config.user.role, UserRole::SuperAdmin);
        assert_eq!(config.data_file(), PathBuf::from("/tmp/crm.json"));
    }

    #[test]
    fn test_blank_env_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == ENV_USER).then(|| "  ".to_string()));
        assert_eq!(config.user.name, "admin");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.export.directory = Some(PathBuf::from("/srv/exports"));
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("crm-cli-no-such-config.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }
}
