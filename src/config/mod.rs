use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::auth_token::DEFAULT_TOKEN_TTL_SECS;
use crate::error::{LinkboardError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub token_ttl_secs: u64,
    /// Set in production so the session cookie is only sent over TLS.
    pub cookie_secure: bool,
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| LinkboardError::Config(format!("Failed to read config file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| LinkboardError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Deployment knobs win over the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(uri) = std::env::var("MONGODB_URI") {
            self.database.uri = uri;
        }
        if let Ok(name) = std::env::var("DATABASE_NAME") {
            self.database.name = name;
        }
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.token_ttl_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                uri: "mongodb://localhost:27017".to_string(),
                name: "linkboard".to_string(),
            },
            auth: AuthConfig {
                token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
                cookie_secure: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.token_ttl_secs, 604_800);
        assert!(!config.auth.cookie_secure);
    }

    #[test]
    fn parse_toml_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9090

[database]
uri = "mongodb://db.internal:27017"
name = "linkboard_prod"

[auth]
token_ttl_secs = 86400
cookie_secure = true
"#;

        let config: AppConfig = toml::from_str(toml).expect("valid config");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.name, "linkboard_prod");
        assert_eq!(config.token_ttl(), Duration::from_secs(86_400));
        assert!(config.auth.cookie_secure);
    }
}
