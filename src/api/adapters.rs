//! Provider adapters
//!
//! One variant per provider behind the [`ImageAdapter`] capability. Each
//! builds its provider's request shape, issues a single POST, and
//! normalizes the answer into a [`GenerationResult`]. Adapter selection is
//! driven by the registry's provider tag, not by anything in the prompt.

use async_trait::async_trait;

use crate::api::{
    ErrorEnvelope, GenerateError, GenerateOptions, GenerationResult, ImageDatum, ImagenInstance,
    ImagenParameters, ImagenRequest, ImagenResponse, ImagesRequest, ImagesResponse,
};
use crate::core::config::Orientation;
use crate::core::constants::{PROVIDER_GOOGLE, PROVIDER_OPENAI};
use crate::core::registry::{self, ModelDescriptor};
use crate::utils::url::{construct_api_url, prediction_url};

const FALLBACK_MIME_TYPE: &str = "image/png";

#[async_trait]
pub trait ImageAdapter: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GenerationResult, GenerateError>;
}

/// Creates adapters bound to live HTTP transport. The trait exists so the
/// session controller can be driven with test doubles.
pub trait AdapterFactory {
    fn create(
        &self,
        model_key: &str,
        api_key: &str,
    ) -> Result<Box<dyn ImageAdapter>, GenerateError>;
}

pub struct HttpAdapterFactory {
    client: reqwest::Client,
}

impl HttpAdapterFactory {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpAdapterFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterFactory for HttpAdapterFactory {
    fn create(
        &self,
        model_key: &str,
        api_key: &str,
    ) -> Result<Box<dyn ImageAdapter>, GenerateError> {
        create_adapter(self.client.clone(), model_key, api_key)
    }
}

/// Resolve a model key and build the adapter variant its provider tag
/// selects.
pub fn create_adapter(
    client: reqwest::Client,
    model_key: &str,
    api_key: &str,
) -> Result<Box<dyn ImageAdapter>, GenerateError> {
    let model = registry::resolve(model_key)
        .ok_or_else(|| GenerateError::UnknownModel(model_key.to_string()))?;
    adapter_for(client, model, api_key)
}

fn adapter_for(
    client: reqwest::Client,
    model: ModelDescriptor,
    api_key: &str,
) -> Result<Box<dyn ImageAdapter>, GenerateError> {
    if model.is_google() {
        return Ok(Box::new(GoogleImagenAdapter {
            client,
            model,
            api_key: api_key.to_string(),
        }));
    }
    if model.is_openai() {
        return Ok(Box::new(OpenAiImagesAdapter {
            client,
            model,
            api_key: api_key.to_string(),
        }));
    }
    Err(GenerateError::UnsupportedProvider {
        provider: model.provider,
        model: model.key,
    })
}

/// Google's prediction endpoints take an aspect ratio rather than pixel
/// dimensions.
fn google_aspect_ratio(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Landscape => "16:9",
        Orientation::Portrait => "9:16",
    }
}

/// The OpenAI images endpoint wants a concrete size string.
fn openai_size(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Landscape => "1792x1024",
        Orientation::Portrait => "1024x1792",
    }
}

/// Extract the provider's own message from a non-success body, with the
/// generic fallback when the envelope is absent or unreadable.
fn remote_error(provider: &str, body: &str) -> GenerateError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .unwrap_or_else(|| "Failed to generate image".to_string());

    GenerateError::RemoteApi {
        provider: provider.to_string(),
        message,
    }
}

fn malformed_response(provider: &str, err: serde_json::Error) -> GenerateError {
    GenerateError::RemoteApi {
        provider: provider.to_string(),
        message: format!("Malformed provider response: {err}"),
    }
}

fn normalize_imagen_response(body: &str) -> Result<GenerationResult, GenerateError> {
    let response: ImagenResponse =
        serde_json::from_str(body).map_err(|e| malformed_response(PROVIDER_GOOGLE, e))?;

    let prediction = response
        .predictions
        .into_iter()
        .next()
        .ok_or_else(|| GenerateError::EmptyResult {
            provider: PROVIDER_GOOGLE.to_string(),
        })?;

    Ok(GenerationResult {
        image_base64: prediction.bytes_base64_encoded,
        mime_type: prediction
            .mime_type
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string()),
    })
}

fn normalize_images_response(body: &str) -> Result<GenerationResult, GenerateError> {
    let response: ImagesResponse =
        serde_json::from_str(body).map_err(|e| malformed_response(PROVIDER_OPENAI, e))?;

    let ImageDatum { b64_json } =
        response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| GenerateError::EmptyResult {
                provider: PROVIDER_OPENAI.to_string(),
            })?;

    Ok(GenerationResult {
        image_base64: b64_json,
        mime_type: FALLBACK_MIME_TYPE.to_string(),
    })
}

pub struct GoogleImagenAdapter {
    client: reqwest::Client,
    model: ModelDescriptor,
    api_key: String,
}

#[async_trait]
impl ImageAdapter for GoogleImagenAdapter {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GenerationResult, GenerateError> {
        let url = prediction_url(&self.model.base_url, &self.model.remote_id, &self.model.endpoint);
        let request = ImagenRequest {
            instances: vec![ImagenInstance {
                prompt: prompt.to_string(),
            }],
            parameters: ImagenParameters {
                sample_count: 1,
                aspect_ratio: google_aspect_ratio(options.orientation).to_string(),
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(remote_error(PROVIDER_GOOGLE, &body));
        }

        normalize_imagen_response(&body)
    }
}

pub struct OpenAiImagesAdapter {
    client: reqwest::Client,
    model: ModelDescriptor,
    api_key: String,
}

#[async_trait]
impl ImageAdapter for OpenAiImagesAdapter {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GenerationResult, GenerateError> {
        let url = construct_api_url(&self.model.base_url, &format!("images/{}", self.model.endpoint));
        let request = ImagesRequest {
            model: self.model.remote_id.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: openai_size(options.orientation).to_string(),
            response_format: "b64_json".to_string(),
            quality: self.model.quality.clone(),
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(remote_error(PROVIDER_OPENAI, &body));
        }

        normalize_images_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(provider: &str) -> ModelDescriptor {
        ModelDescriptor {
            key: "test-model".to_string(),
            remote_id: "test-model-001".to_string(),
            display_name: "Test Model".to_string(),
            provider: provider.to_string(),
            base_url: "https://api.test.example".to_string(),
            endpoint: "predict".to_string(),
            tier: "standard".to_string(),
            price: 0.01,
            price_display: "$0.01".to_string(),
            quality: None,
            description: String::new(),
        }
    }

    #[test]
    fn create_adapter_rejects_unknown_model_keys() {
        let err = create_adapter(reqwest::Client::new(), "no-such-model", "key")
            .err()
            .expect("should fail");
        assert!(matches!(err, GenerateError::UnknownModel(key) if key == "no-such-model"));
    }

    #[test]
    fn create_adapter_builds_variants_for_registry_models() {
        assert!(create_adapter(reqwest::Client::new(), "imagen-standard", "key").is_ok());
        assert!(create_adapter(reqwest::Client::new(), "dalle-3", "key").is_ok());
    }

    #[test]
    fn unrecognized_provider_tags_are_rejected() {
        let err = adapter_for(reqwest::Client::new(), descriptor("midjourney"), "key")
            .err()
            .expect("should fail");
        match err {
            GenerateError::UnsupportedProvider { model, provider } => {
                assert_eq!(model, "test-model");
                assert_eq!(provider, "midjourney");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn imagen_success_normalizes_bytes_and_mime_type() {
        let body = r#"{"predictions":[{"bytesBase64Encoded":"AAAA","mimeType":"image/png"}]}"#;
        let result = normalize_imagen_response(body).expect("should parse");
        assert_eq!(
            result,
            GenerationResult {
                image_base64: "AAAA".to_string(),
                mime_type: "image/png".to_string(),
            }
        );
    }

    #[test]
    fn imagen_mime_type_defaults_to_png() {
        let body = r#"{"predictions":[{"bytesBase64Encoded":"QUJD"}]}"#;
        let result = normalize_imagen_response(body).expect("should parse");
        assert_eq!(result.mime_type, "image/png");
    }

    #[test]
    fn imagen_empty_predictions_is_an_empty_result() {
        for body in [r#"{"predictions":[]}"#, r#"{}"#] {
            let err = normalize_imagen_response(body).err().expect("should fail");
            assert!(matches!(err, GenerateError::EmptyResult { .. }));
        }
    }

    #[test]
    fn openai_empty_data_is_an_empty_result() {
        let err = normalize_images_response(r#"{"data":[]}"#)
            .err()
            .expect("should fail");
        assert!(matches!(
            err,
            GenerateError::EmptyResult { ref provider } if provider == "openai"
        ));
    }

    #[test]
    fn openai_success_carries_the_b64_payload() {
        let body = r#"{"data":[{"b64_json":"ZmFrZQ=="}]}"#;
        let result = normalize_images_response(body).expect("should parse");
        assert_eq!(result.image_base64, "ZmFrZQ==");
        assert_eq!(result.mime_type, "image/png");
    }

    #[test]
    fn remote_error_prefers_the_provider_message() {
        let err = remote_error("google", r#"{"error":{"message":"Quota exceeded"}}"#);
        assert_eq!(err.to_string(), "Quota exceeded");
    }

    #[test]
    fn remote_error_falls_back_when_the_envelope_is_absent() {
        for body in ["", "<html>502</html>", r#"{"error":{}}"#] {
            let err = remote_error("openai", body);
            assert_eq!(err.to_string(), "Failed to generate image");
        }
    }

    #[test]
    fn orientation_maps_to_provider_geometry() {
        assert_eq!(google_aspect_ratio(Orientation::Landscape), "16:9");
        assert_eq!(google_aspect_ratio(Orientation::Portrait), "9:16");
        assert_eq!(openai_size(Orientation::Landscape), "1792x1024");
        assert_eq!(openai_size(Orientation::Portrait), "1024x1792");
    }
}
