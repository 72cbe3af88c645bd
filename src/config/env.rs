// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::http::DEFAULT_TIMEOUT;
use crate::llm::Provider;

const DEFAULT_OUTPUT_DIR: &str = "generated";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:8000";
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// API keys loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// OpenAI API key (OPENAI_API_KEY)
    pub openai: Option<String>,
    /// Google API key for Imagen and Gemini (GOOGLE_API_KEY or GEMINI_API_KEY)
    pub google: Option<String>,
}

impl ApiKeys {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let keys = Self {
            openai: read_key(lookup, "OPENAI_API_KEY"),
            google: read_key(lookup, "GOOGLE_API_KEY")
                .or_else(|| read_key(lookup, "GEMINI_API_KEY")),
        };
        keys.log_status();
        keys
    }

    /// Log which API keys are available (without exposing values)
    fn log_status(&self) {
        let mut available = Vec::new();
        if self.openai.is_some() {
            available.push("OpenAI");
        }
        if self.google.is_some() {
            available.push("Google");
        }

        if available.is_empty() {
            warn!("No API keys configured - every request will fail");
        } else {
            debug!(keys = ?available, "API keys loaded");
        }
    }

    /// Get a summary of available providers
    pub fn summary(&self) -> String {
        let mut providers = Vec::new();
        if self.openai.is_some() {
            providers.push("OpenAI");
        }
        if self.google.is_some() {
            providers.push("Imagen, Gemini");
        }
        if providers.is_empty() {
            "None".to_string()
        } else {
            providers.join(", ")
        }
    }
}

/// Model names per capability
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Text completion model (OPENAI_MODEL)
    pub text: String,
    /// Primary image model (IMAGEN_MODEL)
    pub image: String,
    /// Secondary multimodal model (GEMINI_IMAGE_MODEL)
    pub multimodal: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            text: Provider::OpenAi.default_model().to_string(),
            image: Provider::Imagen.default_model().to_string(),
            multimodal: Provider::Gemini.default_model().to_string(),
        }
    }
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Environment configuration, loaded once at startup and read-only after
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub api_keys: ApiKeys,
    pub models: ModelConfig,
    /// Override for the OpenAI API base (OPENAI_BASE_URL)
    pub openai_base_url: Option<String>,
    /// Override for the Google models API base (GOOGLE_API_BASE)
    pub google_api_base: Option<String>,
    /// Where rendered reports are written (ESTATEOS_OUTPUT_DIR)
    pub output_dir: PathBuf,
    /// URL prefix under which artifacts are reachable (GENERATED_ASSETS_URL,
    /// else `<ESTATEOS_PUBLIC_URL>/generated`)
    pub artifact_base_url: String,
    /// Per-call provider timeout (ESTATEOS_PROVIDER_TIMEOUT_SECS)
    pub provider_timeout: Duration,
    /// Allowed browser origins (ESTATEOS_CORS_ORIGINS, comma separated)
    pub cors_origins: Vec<String>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            api_keys: ApiKeys::default(),
            models: ModelConfig::default(),
            openai_base_url: None,
            google_api_base: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            artifact_base_url: format!("{}/generated", DEFAULT_PUBLIC_URL),
            provider_timeout: DEFAULT_TIMEOUT,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    pub fn load() -> Self {
        info!("Loading environment configuration");
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let models = ModelConfig {
            text: read_key(&lookup, "OPENAI_MODEL").unwrap_or(defaults.models.text),
            image: read_key(&lookup, "IMAGEN_MODEL").unwrap_or(defaults.models.image),
            multimodal: read_key(&lookup, "GEMINI_IMAGE_MODEL")
                .unwrap_or(defaults.models.multimodal),
        };

        let artifact_base_url = read_key(&lookup, "GENERATED_ASSETS_URL")
            .or_else(|| {
                read_key(&lookup, "ESTATEOS_PUBLIC_URL")
                    .map(|url| format!("{}/generated", url.trim_end_matches('/')))
            })
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.artifact_base_url);

        let provider_timeout = read_key(&lookup, "ESTATEOS_PROVIDER_TIMEOUT_SECS")
            .and_then(|secs| match secs.parse::<u64>() {
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    warn!(value = %secs, "Invalid ESTATEOS_PROVIDER_TIMEOUT_SECS, using default");
                    None
                }
            })
            .unwrap_or(defaults.provider_timeout);

        let cors_origins = read_key(&lookup, "ESTATEOS_CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        Self {
            api_keys: ApiKeys::from_lookup(&lookup),
            models,
            openai_base_url: read_key(&lookup, "OPENAI_BASE_URL"),
            google_api_base: read_key(&lookup, "GOOGLE_API_BASE"),
            output_dir: read_key(&lookup, "ESTATEOS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            artifact_base_url,
            provider_timeout,
            cors_origins,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        if self.api_keys.openai.is_none() {
            validation.add_error(format!(
                "{} is not set; classification and text generation need it.",
                Provider::OpenAi.api_key_env_var()
            ));
        }
        if self.api_keys.google.is_none() {
            validation.add_error(format!(
                "{} (or GEMINI_API_KEY) is not set; schematic generation needs it.",
                Provider::Imagen.api_key_env_var()
            ));
        }

        if self.provider_timeout.is_zero() {
            validation.add_warning("ESTATEOS_PROVIDER_TIMEOUT_SECS is 0; every provider call will time out.");
        }

        if !self.artifact_base_url.starts_with("http://")
            && !self.artifact_base_url.starts_with("https://")
            && !self.artifact_base_url.starts_with('/')
        {
            validation.add_warning(format!(
                "Artifact URL '{}' is neither absolute nor root-relative.",
                self.artifact_base_url
            ));
        }

        for origin in &self.cors_origins {
            if origin.parse::<axum::http::HeaderValue>().is_err() {
                validation.add_error(format!("CORS origin '{}' is not a valid header value.", origin));
            }
        }

        validation
    }
}

/// Read a single variable, filtering empty values
fn read_key(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|k| !k.trim().is_empty())
}
