use std::env;

use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;

use crate::root_path::RootPath;
use crate::session::JwtVerifier;
use crate::settings_store::FileSettingsStore;

/// Settings
#[derive(Clone, serde::Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub session: SessionSettings,
}

impl Settings {
    /// Get settings from configuration files
    pub fn get_config() -> Result<Self, ConfigError> {
        let path = env::current_dir().expect("Failed to determine the current directory");
        let config_dir = path.join("config");

        // Detect the running environment (default: `dev`)
        let env: Env = env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "dev".into())
            .try_into()
            .map_err(ConfigError::Message)?;

        // Read the configuration from files and environment variables
        Config::builder()
            // Base configuration file
            .add_source(File::from(config_dir.join("base.yaml")).required(true))
            // Environment-specific configuration file
            .add_source(File::from(config_dir.join(env.as_str())).required(true))
            // Environment variables (e.g., `SIGNOFF__APPLICATION__APP_PORT=8888`
            // would set Settings.application.app_port to 8888)
            .add_source(Environment::with_prefix("SIGNOFF").separator("__"))
            .build()?
            .try_deserialize()
    }
}

/// Application settings
#[derive(Clone, serde::Deserialize)]
pub struct ApplicationSettings {
    pub app_host: String,
    pub app_port: u16,
    #[serde(default)]
    pub root_path: String,
    /// Live settings file with the application URL and identity provider configuration
    pub settings_path: String,
}

impl ApplicationSettings {
    /// Normalized root path
    pub fn root_path(&self) -> RootPath {
        RootPath::parse(&self.root_path)
    }

    /// Store backed by the live settings file
    pub fn settings_store(&self) -> FileSettingsStore {
        FileSettingsStore::new(&self.settings_path)
    }
}

/// Session token settings
#[derive(Clone, serde::Deserialize)]
pub struct SessionSettings {
    pub signing_key: SecretString,
}

impl SessionSettings {
    /// Build the session token verifier
    pub fn verifier(&self) -> JwtVerifier {
        JwtVerifier::hs256(&self.signing_key)
    }
}

/// Available runtime environments
pub enum Env {
    Development,
    Production,
}

impl Env {
    /// Represent environment as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "dev",
            Self::Production => "prd",
        }
    }
}

impl TryFrom<String> for Env {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "dev" => Ok(Self::Development),
            "prd" => Ok(Self::Production),
            other => Err(format!(
                "`{other}` is not a supported environment. Use either `dev` or `prd`"
            )),
        }
    }
}
