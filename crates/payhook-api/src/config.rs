//! Configuration management for the payhook service.

use std::{fmt, net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use axum::http::HeaderName;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use payhook_core::{signature::DEFAULT_SIGNATURE_HEADER, SignaturePolicy, DEFAULT_HISTORY_CAPACITY};
use serde::{de, Deserialize, Deserializer, Serialize};

const CONFIG_FILE: &str = "config.toml";

/// Shared HMAC secret, redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wraps a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_text(deserializer).map(Self)
    }
}

/// Reads a string setting, keeping the text form of numeric values.
///
/// The environment provider types `123456` as an integer, which must still
/// be usable as a secret, host or header name.
fn deserialize_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct TextVisitor;

    impl de::Visitor<'_> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or number")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<String, E> {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// # Example
///
/// ```no_run
/// use payhook_api::Config;
///
/// let config = Config::load().expect("Failed to load configuration");
/// println!("Listening on {}:{}", config.host, config.port);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST", deserialize_with = "deserialize_text")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
    /// HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,
    /// Largest accepted request body in bytes.
    ///
    /// Environment variable: `MAX_PAYLOAD_BYTES`
    #[serde(default = "default_max_payload_bytes", alias = "MAX_PAYLOAD_BYTES")]
    pub max_payload_bytes: usize,

    // History
    /// Number of notifications kept in memory.
    ///
    /// Environment variable: `HISTORY_CAPACITY`
    #[serde(default = "default_history_capacity", alias = "HISTORY_CAPACITY")]
    pub history_capacity: usize,

    // Signatures
    /// Reject notifications without a valid HMAC signature.
    ///
    /// Environment variable: `SIGNATURE_VERIFICATION`
    #[serde(default, alias = "SIGNATURE_VERIFICATION")]
    pub signature_verification: bool,
    /// Shared HMAC secret. Required when verification is enabled.
    ///
    /// Environment variable: `WEBHOOK_SECRET`
    #[serde(default, alias = "WEBHOOK_SECRET", skip_serializing)]
    pub webhook_secret: Option<Secret>,
    /// Header carrying the hex signature.
    ///
    /// Environment variable: `SIGNATURE_HEADER`
    #[serde(
        default = "default_signature_header",
        alias = "SIGNATURE_HEADER",
        deserialize_with = "deserialize_text"
    )]
    pub signature_header: String,

    // Logging
    /// Log level configuration.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
}

impl Config {
    /// Load configuration from defaults, config file, and environment
    /// variable overrides.
    ///
    /// # Errors
    ///
    /// Fails if a source cannot be parsed or the result does not pass
    /// validation, e.g. verification enabled without `WEBHOOK_SECRET`.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse server socket address from host and port configuration.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// HTTP request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Builds the signature policy for the ingestor.
    ///
    /// # Errors
    ///
    /// Fails if verification is enabled but no non-empty secret is set.
    pub fn signature_policy(&self) -> Result<SignaturePolicy> {
        if !self.signature_verification {
            return Ok(SignaturePolicy::Disabled);
        }

        match &self.webhook_secret {
            Some(secret) if !secret.expose().is_empty() => {
                Ok(SignaturePolicy::required(&self.signature_header, secret.expose()))
            },
            _ => anyhow::bail!("WEBHOOK_SECRET must be set when SIGNATURE_VERIFICATION is enabled"),
        }
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.max_payload_bytes == 0 {
            anyhow::bail!("max_payload_bytes must be greater than 0");
        }

        if self.history_capacity == 0 {
            anyhow::bail!("history_capacity must be greater than 0");
        }

        HeaderName::from_str(&self.signature_header)
            .with_context(|| format!("invalid signature_header: {:?}", self.signature_header))?;

        self.signature_policy()?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            max_payload_bytes: default_max_payload_bytes(),
            history_capacity: default_history_capacity(),
            signature_verification: false,
            webhook_secret: None,
            signature_header: default_signature_header(),
            rust_log: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_payload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_signature_header() -> String {
    DEFAULT_SIGNATURE_HEADER.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
