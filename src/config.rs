use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::factors::EmissionFactors;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub factors: EmissionFactors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub offline: bool,
    pub db_path: Option<String>,
    pub provider_url: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/household-emissions/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if overrides.offline {
            self.provider.enabled = false;
        }
        if let Some(db_path) = overrides.db_path {
            self.storage.db_path = db_path;
        }
        if let Some(url) = overrides.provider_url {
            self.provider.base_url = url;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn default_template() -> String {
        let template = r#"[provider]
enabled = true
base_url = "https://www.carboninterface.com/api/v1"
# api_key = ""
api_key_env = "CARBON_INTERFACE_API_KEY"
timeout_secs = 10
connect_timeout_secs = 5

[storage]
db_path = "~/.local/share/household-emissions/emissions.db"

[server]
host = "127.0.0.1"
port = 3000

# Local fallback factors. Omitted keys keep their built-in values.
[factors]
household_kg_per_person = 500.0
vehicle_kg_per_km = 0.192

[factors.electricity]
default = 0.5

[factors.electricity.by_country]
de = 0.485
us = 0.417
gb = 0.233
fr = 0.056
es = 0.234
it = 0.312

[factors.fuel]
default = 0.2

[factors.fuel.by_source]
ng = 0.184
dfo = 0.265
bit = 0.340
lpg = 0.214

[factors.flight]
short = 250.0
medium = 600.0
long = 1200.0

[factors.diet]
vegan = 1500.0
vegetarian = 1700.0
low-meat = 2000.0
medium-meat = 2500.0
high-meat = 3300.0

[factors.shopping]
kg_per_package = 2.0
km_per_package = 200.0
kg_co2_per_kg = 0.1
# "shipped" prices packages by weight, "flat" uses the constants below
fallback = "shipped"

[factors.shopping.packages]
minimal = 10.0
average = 30.0
frequent = 60.0

[factors.shopping.flat]
minimal = 300.0
average = 800.0
frequent = 1500.0
"#;
        template.to_string()
    }
}

impl ProviderConfig {
    /// The configured key, or the one in the environment variable named by `api_key_env`.
    pub fn resolved_api_key(&self) -> Option<String> {
        let key = self.api_key.trim();
        if !key.is_empty() {
            return Some(key.to_string());
        }
        std::env::var(&self.api_key_env)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            api_key: String::new(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://www.carboninterface.com/api/v1".to_string()
}

fn default_api_key_env() -> String {
    "CARBON_INTERFACE_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_db_path() -> String {
    "~/.local/share/household-emissions/emissions.db".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}
