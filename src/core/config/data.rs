use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Paper size of the printed page.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    Letter,
    #[default]
    A4,
    Poster,
}

impl PageSize {
    pub fn id(&self) -> &'static str {
        match self {
            PageSize::Letter => "letter",
            PageSize::A4 => "a4",
            PageSize::Poster => "poster",
        }
    }

    /// Human description, also usable inside prompts.
    pub fn description(&self) -> &'static str {
        match self {
            PageSize::Letter => "Letter size (8.5x11 inches)",
            PageSize::A4 => "A4 size (210x297mm)",
            PageSize::Poster => "Large poster size (18x24 inches)",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "letter" => Some(PageSize::Letter),
            "a4" => Some(PageSize::A4),
            "poster" => Some(PageSize::Poster),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn id(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "landscape" => Some(Orientation::Landscape),
            "portrait" => Some(Orientation::Portrait),
            _ => None,
        }
    }
}

/// A user-created content theme stored in the config file. Built-in themes
/// ship inside the binary and never appear here.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CustomTheme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Provider API keys, keyed by provider id ("google", "openai").
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
    pub page_size: Option<PageSize>,
    pub orientation: Option<Orientation>,
    /// Selected model key from the registry (e.g. "imagen-standard")
    pub default_model: Option<String>,
    /// Active content theme id
    pub selected_theme: Option<String>,
    /// Active style tag ids. `None` means the user never toggled anything
    /// and the built-in default applies; an empty list means all tags off.
    pub active_style_tags: Option<Vec<String>>,
    #[serde(default)]
    pub custom_themes: Vec<CustomTheme>,

    /// v1 key slot, read once by the startup migration
    pub gemini_api_key: Option<String>,
    /// v1 editable system prompt, converted into a custom theme once
    pub system_prompt: Option<String>,
    /// Migration marker flags
    #[serde(default)]
    pub key_slot_migrated: bool,
    #[serde(default)]
    pub legacy_prompt_migrated: bool,
}

impl Config {
    pub fn get_custom_theme(&self, id: &str) -> Option<&CustomTheme> {
        self.custom_themes.iter().find(|t| t.id == id)
    }

    pub fn get_custom_theme_mut(&mut self, id: &str) -> Option<&mut CustomTheme> {
        self.custom_themes.iter_mut().find(|t| t.id == id)
    }

    pub fn remove_custom_theme(&mut self, id: &str) -> bool {
        let before = self.custom_themes.len();
        self.custom_themes.retain(|t| t.id != id);
        self.custom_themes.len() != before
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
