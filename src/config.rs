// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the settings objects built from
//! them once at startup. Nothing here is mutated afterwards; the settings are
//! handed to the components that need them.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH_JWT_SECRET` | HMAC secret for session tokens (at least 32 bytes) | Required |
//! | `AUTH_JWT_ISSUER` | Issuer written into and required from tokens | `portal-server` |
//! | `AUTH_TOKEN_TTL_SECS` | Session token lifetime in seconds | `3600` |
//! | `AUTH_JWT_AUDIENCE` | Expected audience claim | Optional |
//! | `AUTH_CLOCK_SKEW_SECS` | Leeway applied to `exp` checks | `0` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `SEED_ADMIN_EMAIL` | Admin account created at startup | Optional |
//! | `SEED_ADMIN_PASSWORD` | Password for the seeded admin | Optional |

use std::net::SocketAddr;

pub const AUTH_SECRET_ENV: &str = "AUTH_JWT_SECRET";
pub const AUTH_ISSUER_ENV: &str = "AUTH_JWT_ISSUER";
pub const AUTH_TOKEN_TTL_ENV: &str = "AUTH_TOKEN_TTL_SECS";
pub const AUTH_AUDIENCE_ENV: &str = "AUTH_JWT_AUDIENCE";
pub const AUTH_CLOCK_SKEW_ENV: &str = "AUTH_CLOCK_SKEW_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const SEED_ADMIN_EMAIL_ENV: &str = "SEED_ADMIN_EMAIL";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";

pub const DEFAULT_ISSUER: &str = "portal-server";
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
/// Longest accepted token lifetime (30 days).
pub const MAX_TOKEN_TTL_SECS: i64 = 30 * 24 * 3600;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Shortest HMAC secret accepted for HS256.
pub const MIN_SECRET_LEN: usize = 32;

/// Configuration errors. All of them abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("{var} has invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("AUTH_JWT_SECRET must be at least 32 bytes")]
    WeakSecret,
}

/// Session token settings shared by the issuer and the verifier.
#[derive(Clone)]
pub struct AuthSettings {
    secret: Vec<u8>,
    issuer: String,
    token_ttl_secs: i64,
    audience: Option<String>,
    leeway_secs: u64,
}

impl AuthSettings {
    /// Create settings with the default lifetime and no audience.
    pub fn new(secret: impl Into<Vec<u8>>, issuer: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }
        Ok(Self {
            secret,
            issuer: issuer.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            audience: None,
            leeway_secs: 0,
        })
    }

    pub fn with_token_ttl_secs(mut self, ttl: i64) -> Self {
        self.token_ttl_secs = ttl;
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_leeway_secs(mut self, leeway: u64) -> Self {
        self.leeway_secs = leeway;
        self
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(AUTH_SECRET_ENV).ok_or(ConfigError::Missing(AUTH_SECRET_ENV))?;
        let issuer = lookup(AUTH_ISSUER_ENV).unwrap_or_else(|| DEFAULT_ISSUER.to_string());

        let mut settings = Self::new(secret.into_bytes(), issuer)?;

        if let Some(raw) = lookup(AUTH_TOKEN_TTL_ENV) {
            let ttl = raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|ttl| (1..=MAX_TOKEN_TTL_SECS).contains(ttl))
                .ok_or(ConfigError::Invalid {
                    var: AUTH_TOKEN_TTL_ENV,
                    value: raw.clone(),
                })?;
            settings = settings.with_token_ttl_secs(ttl);
        }

        if let Some(raw) = lookup(AUTH_CLOCK_SKEW_ENV) {
            let leeway = raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                var: AUTH_CLOCK_SKEW_ENV,
                value: raw.clone(),
            })?;
            settings = settings.with_leeway_secs(leeway);
        }

        if let Some(audience) = lookup(AUTH_AUDIENCE_ENV).filter(|a| !a.trim().is_empty()) {
            settings = settings.with_audience(audience);
        }

        Ok(settings)
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl_secs
    }

    pub fn audience(&self) -> Option<&str> {
        self.audience.as_deref()
    }

    pub fn leeway_secs(&self) -> u64 {
        self.leeway_secs
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Listener and logging settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub bind_addr: SocketAddr,
    pub log_format: LogFormat,
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup(PORT_ENV).unwrap_or_else(|| "8080".to_string());
        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::Invalid {
                var: PORT_ENV,
                value: format!("{host}:{port}"),
            })?;

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            bind_addr,
            log_format,
        })
    }
}

/// Optional admin account created at startup.
#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl AdminSeed {
    /// Both variables must be set for a seed to be returned.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var(SEED_ADMIN_EMAIL_ENV).ok()?;
        let password = std::env::var(SEED_ADMIN_PASSWORD_ENV).ok()?;
        Some(Self { email, password })
    }
}
