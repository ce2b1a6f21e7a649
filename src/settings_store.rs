use std::path::PathBuf;

use config::{Config, ConfigError, File, FileFormat};

/// Settings retrieval error type
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings from {path}")]
    Load {
        path: String,
        #[source]
        source: ConfigError,
    },
}

/// External identity provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct OidcConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    /// Logout endpoint template, see [`crate::provider::construct_logout_url`]
    #[serde(default)]
    pub logout_url: String,
}

/// Live application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct AppSettings {
    /// External URL the application is reachable at
    pub url: String,
    #[serde(default)]
    pub oidc: Option<OidcConfig>,
}

impl AppSettings {
    /// Get the provider logout URL template, if one is configured
    pub fn provider_logout_url(&self) -> Option<&str> {
        self.oidc
            .as_ref()
            .map(|oidc| oidc.logout_url.as_str())
            .filter(|url| !url.is_empty())
    }
}

/// Source of the current application settings
pub trait SettingsStore: Send + Sync {
    fn get_settings(&self) -> Result<AppSettings, SettingsError>;
}

/// Settings read from a YAML file on every access
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsStore for FileSettingsStore {
    fn get_settings(&self) -> Result<AppSettings, SettingsError> {
        Config::builder()
            .add_source(File::from(self.path.as_path()).format(FileFormat::Yaml))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|source| SettingsError::Load {
                path: self.path.display().to_string(),
                source,
            })
    }
}

/// Fixed settings
#[derive(Debug, Clone)]
pub struct StaticSettingsStore(pub AppSettings);

impl SettingsStore for StaticSettingsStore {
    fn get_settings(&self) -> Result<AppSettings, SettingsError> {
        Ok(self.0.clone())
    }
}
