use crate::core::config::data::{Config, Orientation, PageSize};
use crate::core::constants::{DEFAULT_MODEL_KEY, DEFAULT_STYLE_TAG_IDS, DEFAULT_THEME_ID};

impl Config {
    pub fn effective_page_size(&self) -> PageSize {
        self.page_size.unwrap_or_default()
    }

    pub fn effective_orientation(&self) -> Orientation {
        self.orientation.unwrap_or_default()
    }

    pub fn selected_model_key(&self) -> &str {
        self.default_model.as_deref().unwrap_or(DEFAULT_MODEL_KEY)
    }

    pub fn selected_theme_id(&self) -> &str {
        self.selected_theme.as_deref().unwrap_or(DEFAULT_THEME_ID)
    }

    /// Active style tag ids, falling back to the built-in default when the
    /// user has never toggled anything.
    pub fn active_style_tag_ids(&self) -> Vec<String> {
        match &self.active_style_tags {
            Some(ids) => ids.clone(),
            None => DEFAULT_STYLE_TAG_IDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Stored API key for a provider. Blank entries count as absent so a
    /// cleared key never authorizes a request.
    pub fn api_key_for(&self, provider: &str) -> Option<&str> {
        self.api_keys
            .get(provider)
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, provider: &str, key: &str) {
        self.api_keys
            .insert(provider.to_lowercase(), key.trim().to_string());
    }

    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        self.api_keys.remove(&provider.to_lowercase()).is_some()
    }
}
