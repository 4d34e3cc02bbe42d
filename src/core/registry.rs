//! Model registry
//!
//! Static table of the generation models this tool can drive, embedded from
//! builtin_models.toml. Read-only; there is no mutation API.

use serde::Deserialize;

use crate::core::constants::{PROVIDER_GOOGLE, PROVIDER_OPENAI};

#[derive(Debug, Clone, Deserialize)]
pub struct ModelDescriptor {
    /// Registry key the user selects (e.g. "imagen-standard")
    pub key: String,
    /// Model id the provider expects on the wire
    pub remote_id: String,
    pub display_name: String,
    /// Provider tag the adapter factory dispatches on
    pub provider: String,
    pub base_url: String,
    /// Endpoint shape: "predict" for Google prediction endpoints,
    /// "generations" for the OpenAI images endpoint
    pub endpoint: String,
    pub tier: String,
    pub price: f64,
    pub price_display: String,
    pub quality: Option<String>,
    pub description: String,
}

impl ModelDescriptor {
    pub fn is_google(&self) -> bool {
        self.provider == PROVIDER_GOOGLE
    }

    pub fn is_openai(&self) -> bool {
        self.provider == PROVIDER_OPENAI
    }
}

#[derive(Debug, Deserialize)]
struct BuiltinModelsConfig {
    models: Vec<ModelDescriptor>,
}

/// Load the full registry from the embedded configuration
pub fn load_builtin_models() -> Vec<ModelDescriptor> {
    const CONFIG_CONTENT: &str = include_str!("../builtin_models.toml");

    let config: BuiltinModelsConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_models.toml");

    config.models
}

/// Find a model by registry key
pub fn resolve(model_key: &str) -> Option<ModelDescriptor> {
    load_builtin_models()
        .into_iter()
        .find(|m| m.key.eq_ignore_ascii_case(model_key))
}

/// Human name for a provider tag, for messages and listings.
pub fn provider_display_name(provider: &str) -> &str {
    match provider {
        PROVIDER_GOOGLE => "Google",
        PROVIDER_OPENAI => "OpenAI",
        other => other,
    }
}
