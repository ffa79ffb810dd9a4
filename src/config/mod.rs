use crate::core::path::{config_file, ensure_dir};
use crate::core::{CredentialStore, GhrelError, GhrelResult};
use crate::di::ConfigProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variables consulted for the token, in priority order
pub const TOKEN_ENV_VARS: &[&str] = &["GH_TOKEN", "GITHUB_TOKEN"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub endpoints and optional token
    #[serde(default)]
    pub github: GitHubSettings,

    /// Per-request timeout in seconds. Large uploads need a generous value.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Token picked up from the environment or keychain, never written back
    #[serde(skip)]
    resolved_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSettings {
    /// REST API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Asset upload host base URL
    #[serde(default = "default_upload_url")]
    pub upload_url: String,

    /// Token stored in the config file. `GH_TOKEN` and `GITHUB_TOKEN` win over it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_upload_url() -> String {
    "https://uploads.github.com".to_string()
}

fn default_http_timeout_secs() -> u64 {
    300
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            upload_url: default_upload_url(),
            token: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GitHubSettings::default(),
            http_timeout_secs: default_http_timeout_secs(),
            resolved_token: None,
        }
    }
}

impl Config {
    /// Load config from platform-specific config directory, creating default if it doesn't exist
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\ghrel\config.yaml
    /// - Linux: ~/.config/ghrel/config.yaml
    /// - macOS: ~/Library/Application Support/ghrel/config.yaml
    ///
    /// The returned config has its token resolved (see [`Config::resolve_token`]).
    pub fn load() -> GhrelResult<Self> {
        let config_path = config_file()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config.resolve_token());
        }

        Ok(Self::load_from(&config_path)?.resolve_token())
    }

    /// Parse a config file without resolving the token
    pub fn load_from(path: &Path) -> GhrelResult<Self> {
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| GhrelError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save config to platform-specific config directory
    pub fn save(&self) -> GhrelResult<()> {
        self.save_to(&config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> GhrelResult<()> {
        let config_dir = path
            .parent()
            .ok_or_else(|| GhrelError::Path("Invalid config path".to_string()))?;
        ensure_dir(config_dir)?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| GhrelError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the bearer token: `GH_TOKEN`, `GITHUB_TOKEN`, the config file,
    /// then the OS keychain.
    pub fn resolve_token(mut self) -> Self {
        self.resolved_token = token_from_env()
            .or_else(|| self.github.token.clone())
            .or_else(CredentialStore::github_token);

        if self.resolved_token.is_none() {
            tracing::debug!("no GitHub token found; API calls will be unauthenticated");
        }
        self
    }
}

fn token_from_env() -> Option<String> {
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

impl ConfigProvider for Config {
    fn api_url(&self) -> &str {
        self.github.api_url.trim_end_matches('/')
    }

    fn upload_url(&self) -> &str {
        self.github.upload_url.trim_end_matches('/')
    }

    fn token(&self) -> Option<&str> {
        self.resolved_token
            .as_deref()
            .or(self.github.token.as_deref())
    }

    fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
