//! Configuration management for fabtree

use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub explorer: ExplorerConfig,
    #[serde(default)]
    pub ca: CaConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub enrollment: EnrollmentConfig,
}

#[derive(Debug, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Deserialize)]
pub struct CaConfig {
    #[serde(default = "default_ca_url")]
    pub url: String,
    #[serde(default = "default_ca_name")]
    pub name: String,
    #[serde(default = "default_msp_id")]
    pub msp_id: String,
    #[serde(default = "default_admin_id")]
    pub admin_id: String,
    /// Left empty by default; the admin enrollment binary prompts for it.
    #[serde(default)]
    pub admin_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct WalletConfig {
    /// Empty means the per-user default under the home directory.
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct EnrollmentConfig {
    #[serde(default = "default_enroll_id")]
    pub id: String,
    #[serde(default = "default_affiliation")]
    pub affiliation: String,
    #[serde(default = "default_role")]
    pub role: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            endpoint: default_endpoint(),
        }
    }
}

impl Default for CaConfig {
    fn default() -> Self {
        CaConfig {
            url: default_ca_url(),
            name: default_ca_name(),
            msp_id: default_msp_id(),
            admin_id: default_admin_id(),
            admin_secret: String::new(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        WalletConfig {
            path: String::new(),
        }
    }
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        EnrollmentConfig {
            id: default_enroll_id(),
            affiliation: default_affiliation(),
            role: default_role(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:5252".to_string()
}

fn default_ca_url() -> String {
    "https://localhost:7054".to_string()
}

fn default_ca_name() -> String {
    "ca-org1".to_string()
}

fn default_msp_id() -> String {
    "Org1MSP".to_string()
}

fn default_admin_id() -> String {
    "admin".to_string()
}

fn default_enroll_id() -> String {
    "user1".to_string()
}

fn default_affiliation() -> String {
    "org1.department1".to_string()
}

fn default_role() -> String {
    "client".to_string()
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = fs::read_to_string("config.toml").unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        // Sane defaults when config.toml is absent
        Config {
            explorer: ExplorerConfig::default(),
            ca: CaConfig::default(),
            wallet: WalletConfig::default(),
            enrollment: EnrollmentConfig::default(),
        }
    } else {
        toml::from_str(&config_str)?
    };

    // Validate critical values
    if config.explorer.endpoint.is_empty() {
        return Err("explorer.endpoint must be set in config.toml".into());
    }

    if config.ca.url.is_empty() {
        return Err("ca.url must be set in config.toml".into());
    }

    if config.enrollment.id.is_empty() {
        return Err("enrollment.id must be set in config.toml".into());
    }

    Ok(config)
}
