// rest_api/src/config.rs

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use lib::services::hospital_service::DEFAULT_HEALTHSITES_URL;
use lib::HospitalServiceConfig;
use models::GeoPoint;

/// Looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "medialert.yaml";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8000 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    pub secret_key: String,
    pub token_ttl_minutes: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: "change-me-medialert-development-secret".to_string(),
            token_ttl_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub data_directory: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_directory: "./medialert_data".to_string() }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HospitalsConfig {
    pub healthsites_url: String,
    pub request_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub cache_capacity: u64,
    pub default_latitude: f64,
    pub default_longitude: f64,
    pub default_radius_km: f64,
    pub real_radius_km: f64,
    pub search_radius_km: f64,
    pub fallback_limit: usize,
}

impl Default for HospitalsConfig {
    fn default() -> Self {
        Self {
            healthsites_url: DEFAULT_HEALTHSITES_URL.to_string(),
            request_timeout_secs: 10,
            cache_ttl_secs: 3600,
            cache_capacity: 1_000,
            default_latitude: 4.8156,
            default_longitude: 6.9271,
            default_radius_km: 10.0,
            real_radius_km: 15.0,
            search_radius_km: 30.0,
            fallback_limit: 5,
        }
    }
}

impl HospitalsConfig {
    pub fn default_location(&self) -> GeoPoint {
        GeoPoint::new(self.default_latitude, self.default_longitude)
    }

    pub fn service_config(&self) -> HospitalServiceConfig {
        HospitalServiceConfig {
            healthsites_url: self.healthsites_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            cache_capacity: self.cache_capacity,
            fallback_limit: self.fallback_limit,
            search_radius_km: self.search_radius_km,
        }
    }
}

/// Complete service configuration. Every section falls back to defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub storage: StorageConfig,
    pub hospitals: HospitalsConfig,
}

impl AppConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml2::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Applies `SECRET_KEY`, `DATABASE_PATH`, `MEDIALERT_HOST` and `MEDIALERT_PORT`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(secret) = env::var("SECRET_KEY") {
            self.security.secret_key = secret;
        }
        if let Ok(path) = env::var("DATABASE_PATH") {
            self.storage.data_directory = path;
        }
        if let Ok(host) = env::var("MEDIALERT_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("MEDIALERT_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("MEDIALERT_PORT is not a port number: {}", port))?;
        }
        Ok(())
    }

    /// Command-line flags win over both the file and the environment.
    pub fn apply_cli_overrides(&mut self, host: Option<String>, port: Option<u16>, data_dir: Option<String>) {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        if let Some(data_dir) = data_dir {
            self.storage.data_directory = data_dir;
        }
    }
}

/// Loads the configuration file, then environment overrides.
///
/// An explicit path must exist. Without one, `medialert.yaml` is used when
/// present and built-in defaults otherwise.
pub fn load_config(config_file_path: Option<PathBuf>) -> Result<AppConfig> {
    let mut config = match config_file_path {
        Some(path) => AppConfig::from_file(&path)?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                AppConfig::from_file(&default_path)?
            } else {
                info!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                AppConfig::default()
            }
        }
    };
    config.apply_env_overrides()?;
    if config.security.secret_key == SecurityConfig::default().secret_key {
        warn!("Using the development JWT secret; set SECRET_KEY in production");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_fill_missing_sections_with_defaults() {
        let config = AppConfig::from_yaml_str("server:\n  port: 9090\n").unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.security.token_ttl_minutes, 30);
        assert_eq!(config.hospitals, HospitalsConfig::default());
    }

    #[test]
    fn should_translate_hospital_settings() {
        let config = AppConfig::from_yaml_str("hospitals:\n  cache_ttl_secs: 60\n  fallback_limit: 3\n").unwrap();
        let service = config.hospitals.service_config();
        assert_eq!(service.cache_ttl, Duration::from_secs(60));
        assert_eq!(service.fallback_limit, 3);
        assert_eq!(config.hospitals.default_location(), GeoPoint::new(4.8156, 6.9271));
    }

    #[test]
    fn should_fail_on_missing_explicit_file() {
        assert!(load_config(Some(PathBuf::from("/definitely/not/here.yaml"))).is_err());
    }

    // One test owns MEDIALERT_PORT so parallel tests never see a half-set environment.
    #[test]
    fn should_layer_cli_over_env_over_file() {
        let path = env::temp_dir().join(format!("medialert-config-{}.yaml", std::process::id()));
        fs::write(&path, "server:\n  port: 9000\n").unwrap();

        unsafe { env::remove_var("MEDIALERT_PORT") };
        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.server.port, 9000);

        unsafe { env::set_var("MEDIALERT_PORT", "9100") };
        let mut config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.server.port, 9100);

        config.apply_cli_overrides(None, Some(9200), Some("/tmp/medialert-cli".to_string()));
        assert_eq!(config.server.port, 9200);
        assert_eq!(config.storage.data_directory, "/tmp/medialert-cli");

        unsafe { env::set_var("MEDIALERT_PORT", "not-a-port") };
        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(format!("{:#}", err).contains("MEDIALERT_PORT is not a port number: not-a-port"));

        unsafe { env::remove_var("MEDIALERT_PORT") };
        fs::remove_file(&path).unwrap();
    }
}
