use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;

use crate::core::config::Orientation;

pub mod adapters;

pub use adapters::{create_adapter, AdapterFactory, HttpAdapterFactory, ImageAdapter};

/// Options carried alongside the composed prompt. Derived from persisted
/// settings at request time; never stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    pub orientation: Orientation,
}

/// Normalized output of a successful generation, whichever provider
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub image_base64: String,
    pub mime_type: String,
}

// Google prediction endpoint payloads

#[derive(Serialize)]
pub struct ImagenRequest {
    pub instances: Vec<ImagenInstance>,
    pub parameters: ImagenParameters,
}

#[derive(Serialize)]
pub struct ImagenInstance {
    pub prompt: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenParameters {
    pub sample_count: u32,
    pub aspect_ratio: String,
}

#[derive(Deserialize)]
pub struct ImagenResponse {
    #[serde(default)]
    pub predictions: Vec<ImagenPrediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenPrediction {
    pub bytes_base64_encoded: String,
    pub mime_type: Option<String>,
}

// OpenAI images endpoint payloads

#[derive(Serialize)]
pub struct ImagesRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    pub response_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

#[derive(Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
pub struct ImageDatum {
    pub b64_json: String,
}

/// Error envelope both providers use for non-success responses.
#[derive(Deserialize)]
pub struct ErrorEnvelope {
    pub error: Option<ErrorBody>,
}

#[derive(Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

/// Failures raised between selecting a model and receiving a usable image.
#[derive(Debug)]
pub enum GenerateError {
    /// Model key absent from the registry
    UnknownModel(String),
    /// Registry entry carries a provider tag no adapter implements
    UnsupportedProvider { model: String, provider: String },
    /// Provider answered with a non-success status; carries the provider's
    /// own message when its error envelope had one
    RemoteApi { provider: String, message: String },
    /// Provider answered 2xx but returned no image entries
    EmptyResult { provider: String },
    /// Transport-level failure before any provider answer arrived
    Network(reqwest::Error),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::UnknownModel(key) => write!(f, "Unknown model: {key}"),
            GenerateError::UnsupportedProvider { model, provider } => {
                write!(f, "Model '{model}' names unsupported provider '{provider}'")
            }
            GenerateError::RemoteApi { message, .. } => write!(f, "{message}"),
            GenerateError::EmptyResult { .. } => write!(f, "No image generated"),
            GenerateError::Network(source) => write!(f, "Network error: {source}"),
        }
    }
}

impl StdError for GenerateError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            GenerateError::Network(source) => Some(source),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GenerateError {
    fn from(err: reqwest::Error) -> Self {
        GenerateError::Network(err)
    }
}
