//! Live implementations of the engine's data-source boundary

mod ollama;
mod telemetry;

pub use ollama::OllamaClient;
pub use telemetry::SystemProbe;

use std::time::Duration;

use async_trait::async_trait;

use llmtop_core::config::BackendConfig;
use llmtop_core::model::{RawEntity, ResourceUsage};
use llmtop_core::source::{DataSource, FetchError};

/// The production data source: model listings and logs from the HTTP API,
/// resource gauges from the local host.
pub struct LiveDataSource {
    client: OllamaClient,
    probe: SystemProbe,
}

impl LiveDataSource {
    pub fn new(config: &BackendConfig) -> Result<Self, String> {
        let client = OllamaClient::new(&config.url, Duration::from_secs(config.timeout_secs))?;
        Ok(Self {
            client,
            probe: SystemProbe::new(),
        })
    }
}

#[async_trait]
impl DataSource for LiveDataSource {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn list_entities(&self) -> Result<Vec<RawEntity>, FetchError> {
        self.client.fetch_models().await
    }

    async fn resource_usage(&self) -> Result<ResourceUsage, FetchError> {
        Ok(self.probe.sample().await)
    }

    async fn entity_logs(&self, id: &str) -> Result<Vec<String>, FetchError> {
        self.client.fetch_logs(id).await
    }
}
