use crate::error::ConfigError;
use config::{Config, Environment};
use serde::Deserialize;
use std::net::{AddrParseError, SocketAddr};

#[derive(Debug, Default, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    /// The bind address. `host` comes from the environment, so a value that
    /// is not an IP address is reported as an error instead of a panic.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpstreamSettings {
    #[serde(default = "default_upstream_host")]
    pub host: String,
    /// The provider credential. Left as `None` when unset so the relay can
    /// fail closed per request instead of refusing to boot.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        UpstreamSettings {
            host: default_upstream_host(),
            api_key: None,
            model: default_model(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("upstream.host", default_upstream_host())?
            .set_default("upstream.model", default_model())?
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("DIGILAD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upstream_host() -> String {
    "https://api.groq.com/openai".to_string()
}

fn default_model() -> String {
    "openai/gpt-oss-120b".to_string()
}
