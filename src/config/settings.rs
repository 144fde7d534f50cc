/*
* Bridge Configuration
* --------------------
* Layers, lowest priority first:
*
* 1. Hardcoded defaults
* 2. <CONFIG_PATH>/default.toml
* 3. <CONFIG_PATH>/local.toml
* 4. APP__SECTION__KEY environment variables
* 5. AAP_CONTROLLER_URL / AAP_API_TOKEN, the names the deployment manifests
*    have always used for the controller connection
*
* The controller URL and token are allowed to be missing at startup. The job
* launch endpoint reports them as misconfigured per request, so the VM side
* of the bridge keeps working without AAP.
*/

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

use crate::errors::{BridgeError, BridgeResult};

pub const CONTROLLER_URL_VAR: &str = "AAP_CONTROLLER_URL";
pub const API_TOKEN_VAR: &str = "AAP_API_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub automation: AutomationSettings,
    pub cluster: ClusterSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Turning this off accepts any certificate the controller presents.
    pub verify_tls: bool,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSettings {
    pub timeout_secs: u64,
}

/// Controller connection details that are known to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub base_url: String,
    pub token: String,
}

impl AutomationSettings {
    /// Token is checked before the URL so a half-configured bridge always
    /// reports the token first.
    pub fn credentials(&self) -> BridgeResult<Credentials> {
        let token = non_empty(self.api_token.as_deref()).ok_or_else(|| {
            BridgeError::Misconfigured(format!("{} is not configured.", API_TOKEN_VAR))
        })?;
        let base_url = non_empty(self.controller_url.as_deref()).ok_or_else(|| {
            BridgeError::Misconfigured(format!("{} is not configured.", CONTROLLER_URL_VAR))
        })?;

        Ok(Credentials {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ClusterSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path = std::env::var("CONFIG_PATH")
            .unwrap_or_else(|_| "config".to_string());
        Self::load(&config_path, None)
    }

    /// Loads settings from `config_path`. With `env` set, that map stands in
    /// for the process environment.
    pub fn load(config_path: &str, env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        info!("Loading configuration from path: {}", config_path);

        let lookup = |key: &str| -> Option<String> {
            let value = match &env {
                Some(vars) => vars.get(key).cloned(),
                None => std::env::var(key).ok(),
            };
            value.filter(|v| !v.trim().is_empty())
        };
        let controller_url = lookup(CONTROLLER_URL_VAR);
        let api_token = lookup(API_TOKEN_VAR);

        let defaults = generate_default_config();

        let config = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port)?
            .set_default("server.body_limit_bytes", defaults.server.body_limit_bytes as u64)?
            .set_default("automation.verify_tls", defaults.automation.verify_tls)?
            .set_default("automation.timeout_secs", defaults.automation.timeout_secs)?
            .set_default("cluster.timeout_secs", defaults.cluster.timeout_secs)?
            .add_source(File::with_name(&format!("{}/default", config_path)).required(false))
            .add_source(File::with_name(&format!("{}/local", config_path)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option("automation.controller_url", controller_url)?
            .set_override_option("automation.api_token", api_token)?
            .build()?;

        config.try_deserialize()
    }
}

pub fn generate_default_config() -> Settings {
    Settings {
        server: ServerSettings {
            host: "0.0.0.0".to_string(),
            port: 8000,
            body_limit_bytes: 1024 * 1024,
        },
        automation: AutomationSettings {
            controller_url: None,
            api_token: None,
            verify_tls: true,
            timeout_secs: 30,
        },
        cluster: ClusterSettings { timeout_secs: 30 },
    }
}
