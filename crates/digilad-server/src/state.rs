use std::time::Duration;

use crate::configuration::Settings;

/// Upstream provider coordinates, injected per request so the fail-closed
/// missing-credential path is testable without touching process env.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub host: String,
    pub api_key: Option<String>,
    pub model: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub upstream: UpstreamConfig,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(AppState {
            http,
            upstream: UpstreamConfig {
                host: settings.upstream.host.clone(),
                api_key: settings.upstream.api_key.clone(),
                model: settings.upstream.model.clone(),
            },
        })
    }
}
