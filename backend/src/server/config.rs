//! Server settings loaded via OrthoConfig, and the resolved runtime config.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::Key;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_MIN_IDLE: u32 = 2;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Raw settings from CLI flags, `ARENA_*` environment variables and config
/// files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ARENA")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// File holding the cookie signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a random key when the key file is unreadable.
    pub session_allow_ephemeral: Option<bool>,
    /// Mark the session cookie `Secure`. Defaults to `true`.
    pub cookie_secure: Option<bool>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Connections kept open while idle; `0` keeps none.
    pub db_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub db_connect_timeout_secs: Option<u64>,
}

/// Invalid or unusable settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    /// The session key could not be read and ephemeral keys are disallowed.
    #[error("failed to read session key at {path}: {message}")]
    SessionKey { path: String, message: String },
}

impl From<SettingsError> for std::io::Error {
    fn from(value: SettingsError) -> Self {
        Self::other(value.to_string())
    }
}

impl ServerSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Path of the session key file.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Pool size cap.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Idle connections to keep warm, capped at the pool size.
    pub fn db_min_idle(&self) -> Option<u32> {
        match self.db_min_idle.unwrap_or(DEFAULT_DB_MIN_IDLE) {
            0 => None,
            idle => Some(idle.min(self.db_max_connections())),
        }
    }

    /// Pool checkout timeout; `0` falls back to the default.
    pub fn db_connect_timeout(&self) -> Duration {
        let secs = self
            .db_connect_timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_DB_CONNECT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Whether an unreadable key file may fall back to a random key.
    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral.unwrap_or(false)
    }

    /// Whether the session cookie carries the `Secure` attribute.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Load the cookie signing key.
    ///
    /// Debug builds and `session_allow_ephemeral` tolerate a missing file by
    /// generating a throwaway key; sessions then do not survive restarts.
    pub fn session_key(&self) -> Result<Key, SettingsError> {
        let path = self.session_key_file();
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Key::derive_from(&bytes)),
            Err(err) if cfg!(debug_assertions) || self.session_allow_ephemeral() => {
                warn!(path = %path.display(), error = %err, "using temporary session key");
                Ok(Key::generate())
            }
            Err(err) => Err(SettingsError::SessionKey {
                path: path.display().to_string(),
                message: err.to_string(),
            }),
        }
    }
}

/// Resolved configuration handed to [`super::create_server`].
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database_url: Option<String>,
    pub(crate) db_max_connections: u32,
    pub(crate) db_min_idle: Option<u32>,
    pub(crate) db_connect_timeout: Duration,
}

impl ServerConfig {
    /// Resolve settings into a runnable configuration.
    pub fn from_settings(settings: &ServerSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            key: settings.session_key()?,
            cookie_secure: settings.cookie_secure(),
            bind_addr: settings.bind_addr()?,
            database_url: settings
                .database_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
            db_max_connections: settings.db_max_connections(),
            db_min_idle: settings.db_min_idle(),
            db_connect_timeout: settings.db_connect_timeout(),
        })
    }
}
