//! Theme store
//!
//! Merges the built-in content themes with user-created ones from the
//! settings file and composes the final generation prompt. All reads and
//! writes go through the [`SettingsStore`] handle the store is constructed
//! with.

use std::error::Error;
use std::fmt;

use crate::core::builtin_themes::{self, StyleTag, ThemeSpec};
use crate::core::config::data::CustomTheme;
use crate::core::config::SettingsStore;
use crate::core::constants::DEFAULT_THEME_ID;

/// Unified view over built-in and custom themes.
#[derive(Debug, Clone)]
pub struct ContentTheme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub prompt: String,
    pub built_in: bool,
}

impl ContentTheme {
    fn from_builtin(spec: ThemeSpec) -> Self {
        Self {
            id: spec.id,
            name: spec.name,
            description: spec.description,
            prompt: spec.prompt,
            built_in: true,
        }
    }

    fn from_custom(theme: &CustomTheme) -> Self {
        Self {
            id: theme.id.clone(),
            name: theme.name.clone(),
            description: theme.description.clone(),
            prompt: theme.prompt.clone(),
            built_in: false,
        }
    }
}

/// Fields of a custom theme that `update_theme` may change. `None` leaves
/// the field untouched.
#[derive(Debug, Default)]
pub struct ThemeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Debug)]
pub enum ThemeError {
    /// Empty name or prompt on create/update
    Validation(String),
    /// Id is absent, or names a builtin where an editable theme is required
    NotFound(String),
    /// Builtins cannot be deleted
    Builtin(String),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::Validation(message) => write!(f, "{message}"),
            ThemeError::NotFound(id) => write!(f, "No editable theme with id '{id}'"),
            ThemeError::Builtin(id) => write!(f, "Built-in theme '{id}' cannot be deleted"),
        }
    }
}

impl Error for ThemeError {}

pub struct ThemeStore {
    store: SettingsStore,
}

impl ThemeStore {
    pub fn new(store: SettingsStore) -> Self {
        Self { store }
    }

    /// All themes: built-ins first, then custom themes in creation order.
    pub fn list_themes(&self) -> Result<Vec<ContentTheme>, Box<dyn Error>> {
        let config = self.store.load()?;
        let mut themes: Vec<ContentTheme> = builtin_themes::load_builtin_themes()
            .into_iter()
            .map(ContentTheme::from_builtin)
            .collect();
        themes.extend(config.custom_themes.iter().map(ContentTheme::from_custom));
        Ok(themes)
    }

    pub fn get_theme(&self, id: &str) -> Result<Option<ContentTheme>, Box<dyn Error>> {
        if let Some(spec) = builtin_themes::find_builtin_theme(id) {
            return Ok(Some(ContentTheme::from_builtin(spec)));
        }
        let config = self.store.load()?;
        Ok(config.get_custom_theme(id).map(ContentTheme::from_custom))
    }

    /// The fixed style tag list, in composition order.
    pub fn style_tags(&self) -> Vec<StyleTag> {
        builtin_themes::load_style_tags()
    }

    pub fn active_theme(&self) -> Result<ContentTheme, Box<dyn Error>> {
        let config = self.store.load()?;
        let selected = config.selected_theme_id().to_string();
        if let Some(theme) = self.get_theme(&selected)? {
            return Ok(theme);
        }
        // Selection points at a theme that no longer exists; fall back to
        // the default builtin rather than failing the whole session.
        let spec = builtin_themes::find_builtin_theme(DEFAULT_THEME_ID)
            .expect("default builtin theme must exist");
        Ok(ContentTheme::from_builtin(spec))
    }

    pub fn set_active_theme(&self, id: &str) -> Result<(), Box<dyn Error>> {
        if self.get_theme(id)?.is_none() {
            return Err(Box::new(ThemeError::NotFound(id.to_string())));
        }
        let id = id.to_string();
        self.store.mutate(move |config| {
            config.selected_theme = Some(id);
            Ok(())
        })
    }

    pub fn active_style_tag_ids(&self) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(self.store.load()?.active_style_tag_ids())
    }

    /// Create a custom theme with a fresh time-based id and persist it.
    pub fn create_theme(
        &self,
        name: &str,
        description: &str,
        prompt: &str,
    ) -> Result<ContentTheme, Box<dyn Error>> {
        if name.trim().is_empty() {
            return Err(Box::new(ThemeError::Validation(
                "Theme name is required".to_string(),
            )));
        }
        if prompt.trim().is_empty() {
            return Err(Box::new(ThemeError::Validation(
                "Theme prompt is required".to_string(),
            )));
        }

        let name = name.trim().to_string();
        let description = description.trim().to_string();
        let prompt = prompt.trim().to_string();

        let custom = self.store.mutate(move |config| {
            let mut id = format!("custom-{}", chrono::Utc::now().timestamp_millis());
            // Two creations inside the same millisecond must not collide.
            let mut bump = 0u32;
            while config.get_custom_theme(&id).is_some() {
                bump += 1;
                id = format!(
                    "custom-{}-{}",
                    chrono::Utc::now().timestamp_millis(),
                    bump
                );
            }

            let custom = CustomTheme {
                id,
                name,
                description,
                prompt,
            };
            config.custom_themes.push(custom.clone());
            Ok(custom)
        })?;

        Ok(ContentTheme::from_custom(&custom))
    }

    /// Update a custom theme. Builtin ids are reported as not found, the
    /// same as ids that do not exist at all.
    pub fn update_theme(
        &self,
        id: &str,
        fields: ThemeUpdate,
    ) -> Result<ContentTheme, Box<dyn Error>> {
        if builtin_themes::find_builtin_theme(id).is_some() {
            return Err(Box::new(ThemeError::NotFound(id.to_string())));
        }
        if let Some(name) = &fields.name {
            if name.trim().is_empty() {
                return Err(Box::new(ThemeError::Validation(
                    "Theme name is required".to_string(),
                )));
            }
        }
        if let Some(prompt) = &fields.prompt {
            if prompt.trim().is_empty() {
                return Err(Box::new(ThemeError::Validation(
                    "Theme prompt is required".to_string(),
                )));
            }
        }

        let id_owned = id.to_string();
        let updated = self.store.mutate(move |config| {
            let theme = config
                .get_custom_theme_mut(&id_owned)
                .ok_or_else(|| Box::new(ThemeError::NotFound(id_owned.clone())) as Box<dyn Error>)?;

            if let Some(name) = fields.name {
                theme.name = name.trim().to_string();
            }
            if let Some(description) = fields.description {
                theme.description = description.trim().to_string();
            }
            if let Some(prompt) = fields.prompt {
                theme.prompt = prompt.trim().to_string();
            }
            Ok(theme.clone())
        })?;

        Ok(ContentTheme::from_custom(&updated))
    }

    /// Delete a custom theme. If it was the active theme, the selection
    /// resets to the default builtin.
    pub fn delete_theme(&self, id: &str) -> Result<(), Box<dyn Error>> {
        if builtin_themes::find_builtin_theme(id).is_some() {
            return Err(Box::new(ThemeError::Builtin(id.to_string())));
        }

        let id_owned = id.to_string();
        self.store.mutate(move |config| {
            if !config.remove_custom_theme(&id_owned) {
                return Err(Box::new(ThemeError::NotFound(id_owned.clone())) as Box<dyn Error>);
            }
            if config.selected_theme.as_deref() == Some(id_owned.as_str()) {
                config.selected_theme = Some(DEFAULT_THEME_ID.to_string());
            }
            Ok(())
        })
    }

    /// Compose the final prompt: the theme's text with each active style
    /// tag's modifier appended in fixed built-in-list order. The toggle
    /// history never affects the output. Unresolvable theme ids compose to
    /// the empty string.
    pub fn compose_prompt(
        &self,
        theme_id: &str,
        active_tag_ids: &[String],
    ) -> Result<String, Box<dyn Error>> {
        let Some(theme) = self.get_theme(theme_id)? else {
            return Ok(String::new());
        };

        let mut prompt = theme.prompt;
        for tag in builtin_themes::load_style_tags() {
            if active_tag_ids.iter().any(|id| id == &tag.id) {
                prompt.push_str(&tag.modifier);
            }
        }
        Ok(prompt)
    }

    /// Flip a style tag's membership in the active set and persist the new
    /// set. Returns whether the tag is active afterwards.
    pub fn toggle_style_tag(&self, tag_id: &str) -> Result<bool, Box<dyn Error>> {
        if builtin_themes::find_style_tag(tag_id).is_none() {
            return Err(Box::new(ThemeError::NotFound(tag_id.to_string())));
        }

        let tag_id = tag_id.to_string();
        self.store.mutate(move |config| {
            let mut active = config.active_style_tag_ids();
            let now_active = if let Some(pos) = active.iter().position(|id| *id == tag_id) {
                active.remove(pos);
                false
            } else {
                active.push(tag_id.clone());
                true
            };
            config.active_style_tags = Some(active);
            Ok(now_active)
        })
    }
}
