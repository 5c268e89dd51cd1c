//! Server settings, read from an optional `server.{toml,yaml,json}` file and
//! `JIVVY_SERVER__*` environment variables.

use jivvy::{ConceptMatchConfig, TaggerConfig, DEFAULT_MAX_MATCHES};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;

const DEMO_API_KEY: &str = "demo-key-12345";

/// Server configuration
///
/// Missing fields fall back to [`ServerConfig::default`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub timeout_secs: u64,
    pub max_body_size_mb: usize,

    /// Requests per minute per API key
    pub rate_limit_per_minute: u32,
    pub api_keys: HashSet<String>,
    pub enable_cors: bool,
    pub log_level: String,
    pub metrics_enabled: bool,

    /// Match cap used when a request does not send `max_matches`
    pub default_max_matches: usize,

    /// Largest concept list accepted in one request
    pub max_concepts: usize,

    /// Largest number of questions accepted by the batch tagging route
    pub max_batch_size: usize,

    /// Batches at least this large are tagged across the rayon pool
    pub parallel_threshold: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            timeout_secs: 30,
            max_body_size_mb: 10,
            rate_limit_per_minute: 100,
            api_keys: HashSet::new(),
            enable_cors: true,
            log_level: "info".to_string(),
            metrics_enabled: true,
            default_max_matches: DEFAULT_MAX_MATCHES,
            max_concepts: 5_000,
            max_batch_size: 1_000,
            parallel_threshold: 64,
        }
    }
}

impl ServerConfig {
    /// Load and validate the configuration.
    ///
    /// Without configured keys the server accepts a single demo key.
    pub fn load() -> anyhow::Result<Self> {
        let mut config: ServerConfig = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(config::Environment::with_prefix("JIVVY_SERVER").separator("__"))
            .build()?
            .try_deserialize()?;

        if config.api_keys.is_empty() {
            tracing::warn!("No API keys configured, using demo key '{DEMO_API_KEY}'");
            config.api_keys.insert(DEMO_API_KEY.to_string());
        }

        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Reject limits that would make every matching request fail.
    pub fn validate(&self) -> Result<(), String> {
        self.match_config(None)
            .validate()
            .map_err(|err| format!("default_max_matches: {err}"))?;

        for (name, value) in [
            ("max_concepts", self.max_concepts),
            ("max_batch_size", self.max_batch_size),
            ("parallel_threshold", self.parallel_threshold),
        ] {
            if value == 0 {
                return Err(format!("{name} must be >= 1"));
            }
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.bind_addr, self.port).parse()?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Body limit in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }

    /// Match configuration for a request, honoring an explicit cap.
    pub fn match_config(&self, max_matches: Option<usize>) -> ConceptMatchConfig {
        ConceptMatchConfig::with_max_matches(max_matches.unwrap_or(self.default_max_matches))
    }

    /// Tagger configuration for one batch request.
    pub fn tagger_config(&self, max_matches: Option<usize>) -> TaggerConfig {
        TaggerConfig {
            matching: self.match_config(max_matches),
            parallel: true,
            parallel_threshold: self.parallel_threshold,
        }
    }
}
