use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tonic::transport::{Identity, ServerTlsConfig};

use crate::{DEFAULT_TOKEN, Error, Result};

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Hostname or IP address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
    /// Call authentication settings.
    pub auth: AuthSettings,
    /// Metrics exporter configuration.
    pub metrics: MetricsSettings,
    /// TLS configuration.
    pub tls: TlsSettings,
}

/// Call authentication settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthSettings {
    /// The single shared secret every call must present as `token` metadata.
    pub token: String,
}

/// Metrics exporter settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsSettings {
    /// Whether metrics export is enabled.
    pub enabled: bool,
    /// Hostname or IP address for metrics server.
    pub host: String,
    /// Port number for metrics server.
    pub port: u16,
}

/// TLS configuration settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TlsSettings {
    /// Whether TLS is enabled.
    pub enabled: bool,
    /// Path to TLS certificate file (PEM format).
    pub cert_path: String,
    /// Path to TLS private key file (PEM format).
    pub key_path: String,
}

fn socket_addr(what: &str, host: &str, port: u16) -> Result<SocketAddr> {
    format!("{host}:{port}").parse().map_err(|e| {
        Error::Config(format!(
            "invalid {what} address (host: {host}, port: {port}): {e}"
        ))
    })
}

impl ServerConfig {
    /// Converts host and port into a socket address.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the pair does not form a socket address.
    pub fn addr(&self) -> Result<SocketAddr> {
        socket_addr("server", &self.host, self.port)
    }
}

impl MetricsSettings {
    /// Converts host and port into a socket address for metrics server.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the pair does not form a socket address.
    pub fn addr(&self) -> Result<SocketAddr> {
        socket_addr("metrics", &self.host, self.port)
    }
}

impl TlsSettings {
    /// Reads the PEM certificate and key into a tonic TLS configuration.
    ///
    /// Returns `Ok(None)` when TLS is disabled.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if either file cannot be read.
    pub fn load(&self) -> Result<Option<ServerTlsConfig>> {
        if !self.enabled {
            return Ok(None);
        }

        let read = |path: &str| {
            std::fs::read(path)
                .map_err(|e| Error::Config(format!("failed to read TLS file {path}: {e}")))
        };
        let cert = read(&self.cert_path)?;
        let key = read(&self.key_path)?;

        Ok(Some(
            ServerTlsConfig::new().identity(Identity::from_pem(cert, key)),
        ))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6000,
            auth: AuthSettings {
                token: DEFAULT_TOKEN.to_string(),
            },
            metrics: MetricsSettings {
                enabled: false,
                host: "127.0.0.1".to_string(),
                port: 9090,
            },
            tls: TlsSettings {
                enabled: false,
                cert_path: String::new(),
                key_path: String::new(),
            },
        }
    }
}

impl ServerConfig {
    /// Loads configuration from `.env` file, TOML file, and environment variables.
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables with `SERVER_` prefix, nested with `__`
    ///    (e.g., `SERVER_PORT=8080`, `SERVER_AUTH__TOKEN=...`)
    /// 2. TOML configuration file (if exists)
    /// 3. `.env` file (if exists)
    /// 4. Built-in defaults
    ///
    /// The TOML file path can be set via `SERVER_CONFIG_PATH` environment variable.
    /// If not set, defaults to `./config/server.toml`. A missing file is skipped.
    ///
    /// # Environment Variable Examples
    /// ```bash
    /// SERVER_HOST=0.0.0.0
    /// SERVER_PORT=6000
    /// SERVER_AUTH__TOKEN=valid-token
    /// SERVER_METRICS__ENABLED=true
    /// SERVER_TLS__ENABLED=true
    /// SERVER_TLS__CERT_PATH=/etc/certs/server-cert.pem
    /// SERVER_TLS__KEY_PATH=/etc/certs/server-key.pem
    /// ```
    ///
    /// # Errors
    /// Returns [`Error::Config`] if any source is malformed or holds a value of
    /// the wrong type. There is no fallback to the defaults in that case.
    pub fn from_env() -> Result<Self> {
        // Attempt to load .env file (silently ignore if it doesn't exist)
        let _ = dotenvy::dotenv();

        let config_path = std::env::var("SERVER_CONFIG_PATH")
            .unwrap_or_else(|_| "config/server.toml".to_string());

        Self::figment(&config_path)
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }

    fn figment(config_path: &str) -> figment::Figment {
        use figment::Figment;
        use figment::providers::{Env, Format, Serialized, Toml};

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_path))
            .merge(
                Env::prefixed("SERVER_")
                    .ignore(&["CONFIG_PATH"])
                    .split("__"),
            )
    }

    /// Validates the configuration before the server starts.
    ///
    /// # Errors
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.auth.token.is_empty() {
            return Err(Error::Config("auth token cannot be empty".to_string()));
        }

        if self.tls.enabled {
            if self.tls.cert_path.is_empty() {
                return Err(Error::Config(
                    "TLS is enabled but cert_path is empty".to_string(),
                ));
            }
            if self.tls.key_path.is_empty() {
                return Err(Error::Config(
                    "TLS is enabled but key_path is empty".to_string(),
                ));
            }
            if !Path::new(&self.tls.cert_path).exists() {
                return Err(Error::Config(format!(
                    "TLS certificate file does not exist: {}",
                    self.tls.cert_path
                )));
            }
            if !Path::new(&self.tls.key_path).exists() {
                return Err(Error::Config(format!(
                    "TLS key file does not exist: {}",
                    self.tls.key_path
                )));
            }
        }

        self.addr()?;
        if self.metrics.enabled {
            self.metrics.addr()?;
        }

        Ok(())
    }
}
