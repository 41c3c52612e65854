// src/config.rs
// =============================================================================
// The user's config file, ~/.katacli (YAML).
//
// Example:
//
//   KataGRepo:
//     User: swkBerlin
//     Repo: kata-bootstrap
//   HasTemplateAtRoot:
//     java: false
//   Auth:
//     SkipNotLoggedInWarning: false
//     Token: ghp_xxx            # optional
//   Network:                    # optional
//     MaxWorkers: 100
//     TimeoutSecs: 30
//
// On first run the file doesn't exist yet: we write the defaults and load
// them. Unknown keys, missing keys and wrong types are all reported as
// KataError::InvalidConfig.
// =============================================================================

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{KataError, Result};
use crate::grepo::DEFAULT_POOL_SIZE;

const CONFIG_FILE_NAME: &str = ".katacli";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Config {
    #[serde(rename = "KataGRepo")]
    pub kata_grepo: KataGRepo,
    pub has_template_at_root: BTreeMap<String, bool>,
    pub auth: Auth,
    #[serde(default)]
    pub network: Network,
}

/// The repository templates are downloaded from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct KataGRepo {
    pub user: String,
    pub repo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Auth {
    pub skip_not_logged_in_warning: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Network {
    /// How many GitHub requests may be in flight at once
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_workers() -> usize {
    DEFAULT_POOL_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Network {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kata_grepo: KataGRepo {
                user: "swkBerlin".to_string(),
                repo: "kata-bootstrap".to_string(),
            },
            has_template_at_root: BTreeMap::new(),
            auth: Auth {
                skip_not_logged_in_warning: false,
                token: None,
            },
            network: Network::default(),
        }
    }
}

/// A loaded config, and whether it was just created with defaults
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub created: bool,
}

impl Config {
    /// Loads `config_file`, writing the defaults there first if it's missing
    pub fn load_or_create(config_file: &Path) -> Result<LoadedConfig> {
        let created = !config_file.exists();
        if created {
            tracing::info!(path = %config_file.display(), "creating default config file");
            Self::default().save(config_file)?;
        }

        let config = Self::load(config_file)?;
        Ok(LoadedConfig { config, created })
    }

    pub fn load(config_file: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_file)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| KataError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config_file: &Path) -> Result<()> {
        if let Some(parent) = config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(config_file, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.kata_grepo.user.trim().is_empty() {
            return Err(KataError::invalid_config("KataGRepo.User must not be empty"));
        }
        if self.kata_grepo.repo.trim().is_empty() {
            return Err(KataError::invalid_config("KataGRepo.Repo must not be empty"));
        }
        if self.network.max_workers == 0 {
            return Err(KataError::invalid_config("Network.MaxWorkers must be at least 1"));
        }
        Ok(())
    }

    /// None when no token is configured (or it's empty)
    pub fn auth_token(&self) -> Option<&str> {
        self.auth.token.as_deref().filter(|token| !token.is_empty())
    }

    /// Some(true/false) if the config says so, None if it doesn't know
    pub fn has_template_at_root(&self, language: &str) -> Option<bool> {
        self.has_template_at_root.get(language).copied()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout_secs)
    }
}

/// ~/.katacli
pub fn default_config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .ok_or(KataError::HomeDirectoryNotFound)
}
