//! URL utilities for consistent endpoint handling
//!
//! Normalizes base URLs so endpoint construction never produces double
//! slashes, and builds the two endpoint shapes the providers use.

/// Normalize a base URL by removing trailing slashes
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct a complete API endpoint URL from a base URL and endpoint path
///
/// # Examples
///
/// ```
/// use crayonbox::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://api.openai.com/v1/", "images/generations"),
///     "https://api.openai.com/v1/images/generations"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Construct a Google-style per-model prediction URL,
/// `{base}/models/{model}:{verb}`.
///
/// # Examples
///
/// ```
/// use crayonbox::utils::url::prediction_url;
///
/// assert_eq!(
///     prediction_url(
///         "https://generativelanguage.googleapis.com/v1beta",
///         "imagen-4.0-generate-001",
///         "predict"
///     ),
///     "https://generativelanguage.googleapis.com/v1beta/models/imagen-4.0-generate-001:predict"
/// );
/// ```
pub fn prediction_url(base_url: &str, remote_model_id: &str, verb: &str) -> String {
    construct_api_url(base_url, &format!("models/{}:{}", remote_model_id, verb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_any_number_of_trailing_slashes() {
        assert_eq!(
            normalize_base_url("https://api.example.com/v1"),
            "https://api.example.com/v1"
        );
        assert_eq!(
            normalize_base_url("https://api.example.com/v1///"),
            "https://api.example.com/v1"
        );
        assert_eq!(normalize_base_url(""), "");
    }

    #[test]
    fn construct_handles_slashes_on_either_side() {
        assert_eq!(
            construct_api_url("https://api.example.com/v1/", "/images/generations"),
            "https://api.example.com/v1/images/generations"
        );
        assert_eq!(
            construct_api_url("https://api.example.com/v1", "images/generations"),
            "https://api.example.com/v1/images/generations"
        );
    }

    #[test]
    fn prediction_url_uses_the_colon_verb_shape() {
        assert_eq!(
            prediction_url("https://example.test/v1beta/", "some-model", "predict"),
            "https://example.test/v1beta/models/some-model:predict"
        );
    }
}
