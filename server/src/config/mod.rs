use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{AppError, Result};

pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub admin_password: Option<String>,
    pub session_sweep_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            admin_password: None,
            session_sweep_secs: 60,
        }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// File settings (if the file exists) overlaid with environment variables.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            log::info!("No config file at '{}', using defaults", path.display());
            Self::default()
        };

        config.with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }

        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.port = port
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid SERVER_PORT: {}", port)))?;
        }

        if let Ok(password) = std::env::var("ADMIN_PASSWORD") {
            self.admin_password = Some(password);
        }

        if let Ok(secs) = std::env::var("SESSION_SWEEP_SECS") {
            self.session_sweep_secs = secs
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid SESSION_SWEEP_SECS: {}", secs)))?;
        }

        if self.session_sweep_secs == 0 {
            return Err(AppError::Config(
                "session_sweep_secs must be greater than zero".to_string(),
            ));
        }

        Ok(self)
    }

    pub fn admin_password(&self) -> &str {
        match self.admin_password.as_deref() {
            Some(password) if !password.is_empty() => password,
            _ => DEFAULT_ADMIN_PASSWORD,
        }
    }

    pub fn uses_default_password(&self) -> bool {
        self.admin_password() == DEFAULT_ADMIN_PASSWORD
    }
}
