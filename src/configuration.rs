use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

/// Global configuration, loaded from the `configuration` directory. See
/// `get_configuration`.
#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub getresponse: GetResponseSettings,
    pub admin: AdminSettings,
    pub storage: StorageSettings,
    pub registration: RegistrationSettings,
}

/// Server configuration
#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    /// Should be localhost on dev machine, 0.0.0.0 on prod
    pub host: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,

    /// Signs the session and flash message cookies. Must be at least 64 bytes.
    pub hmac_secret: Secret<String>,

    /// Only send cookies over https. Off on dev machines.
    pub secure_cookies: bool,
}

/// Where the JSON-RPC endpoint lives, and how long we are willing to wait for
/// it
#[derive(Deserialize, Clone)]
pub struct GetResponseSettings {
    /// `http://api2.getresponse.com` in production; a wiremock server in tests
    pub base_url: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl GetResponseSettings {
    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_milliseconds) }
}

/// The single account allowed to manage the integration settings
#[derive(Deserialize, Clone)]
pub struct AdminSettings {
    pub username: String,

    /// argon2 PHC string, e.g. `$argon2id$v=19$m=15000,t=2,p=1$...`
    pub password_hash: Secret<String>,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Lost on restart
    Memory,
    /// Single JSON document at `StorageSettings::path`
    File,
}

#[derive(Deserialize, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,

    /// Ignored by the memory backend
    pub path: PathBuf,
}

#[derive(Deserialize, Clone)]
pub struct RegistrationSettings {
    /// When `true`, a member is flagged as subscribed as soon as the signup
    /// box was ticked, whatever GetResponse answered. When `false`, the flag
    /// follows the actual outcome.
    pub record_outcome_optimistically: bool,
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Display for Environment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        )
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!(
                "{e} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}

/// Load yaml configuration files at `<project_root>/configuration`.
///
/// `base.yaml` is read first, then the file named after `APP_ENVIRONMENT`
/// (`local` if unset), then any `APP_`-prefixed env vars. All fields must be
/// present after layering, otherwise initialisation fails and the server does
/// not start.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .map_err(|e| ConfigError::Message(format!("could not get current dir: {e}")))?
        .join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".to_string())
        .try_into()
        .map_err(ConfigError::Message)?;

    let settings = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        .add_source(
            // env vars are -always- parsed as String, hence `serde-aux` for the ports
            //
            // `APP_GETRESPONSE__BASE_URL=https://...` -> `Settings.getresponse.base_url`
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
