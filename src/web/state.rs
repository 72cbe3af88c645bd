// src/web/state.rs
// Shared application state

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::chat::ChatReportService;
use crate::config::EnvConfig;
use crate::http::create_shared_client;
use crate::llm::{GeminiClient, ImagenClient, OpenAiClient, Provider};
use crate::report::ArtifactStore;

/// Shared application state; immutable after startup
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ChatReportService>,
    pub config: Arc<EnvConfig>,
}

impl AppState {
    pub fn new(service: ChatReportService, config: EnvConfig) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }

    /// Build the provider clients described by `config`. All clients share
    /// one connection pool.
    pub fn from_config(config: EnvConfig) -> Result<Self> {
        let openai_key = config
            .api_keys
            .openai
            .clone()
            .with_context(|| format!("{} is not set", Provider::OpenAi.api_key_env_var()))?;
        let google_key = config
            .api_keys
            .google
            .clone()
            .with_context(|| format!("{} is not set", Provider::Imagen.api_key_env_var()))?;

        let client = create_shared_client(config.provider_timeout);

        let mut text =
            OpenAiClient::with_http_client(openai_key, config.models.text.clone(), client.clone());
        if let Some(base) = &config.openai_base_url {
            text = text.with_base_url(base.clone());
        }

        let mut image = ImagenClient::with_http_client(
            google_key.clone(),
            config.models.image.clone(),
            client.clone(),
        );
        let mut multimodal =
            GeminiClient::with_http_client(google_key, config.models.multimodal.clone(), client);
        if let Some(base) = &config.google_api_base {
            image = image.with_base_url(base.clone());
            multimodal = multimodal.with_base_url(base.clone());
        }

        let store = ArtifactStore::new(config.output_dir.clone(), config.artifact_base_url.clone());
        store
            .ensure_dir()
            .with_context(|| format!("creating output dir {}", config.output_dir.display()))?;

        let service = ChatReportService::new(
            Arc::new(text),
            Arc::new(image),
            Arc::new(multimodal),
            store,
        );
        Ok(Self::new(service, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKeys;

    #[test]
    fn test_from_config_requires_keys() {
        let err = AppState::from_config(EnvConfig::default()).err().unwrap();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_from_config_creates_output_dir() {
        let temp = tempfile::tempdir().unwrap();
        let config = EnvConfig {
            api_keys: ApiKeys {
                openai: Some("sk-test".into()),
                google: Some("g-test".into()),
            },
            output_dir: temp.path().join("generated"),
            ..EnvConfig::default()
        };

        let state = AppState::from_config(config).unwrap();
        assert!(state.config.output_dir.is_dir());
    }
}
