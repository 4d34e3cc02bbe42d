//! Built-in content themes and style tags
//!
//! Loaded from builtin_themes.toml, which is embedded at build time. Style
//! tags have no user-defined counterpart; their listed order here is also
//! the order modifiers are appended during prompt composition.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ThemeSpec {
    pub id: String,
    pub name: String,
    pub description: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StyleTag {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub description: String,
    pub modifier: String,
}

#[derive(Debug, Deserialize)]
struct BuiltinThemesConfig {
    themes: Vec<ThemeSpec>,
    style_tags: Vec<StyleTag>,
}

fn load_config() -> BuiltinThemesConfig {
    const CONFIG_CONTENT: &str = include_str!("../builtin_themes.toml");
    toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_themes.toml")
}

pub fn load_builtin_themes() -> Vec<ThemeSpec> {
    load_config().themes
}

/// The fixed style tag list, in composition order.
pub fn load_style_tags() -> Vec<StyleTag> {
    load_config().style_tags
}

pub fn find_builtin_theme(id: &str) -> Option<ThemeSpec> {
    load_builtin_themes().into_iter().find(|t| t.id == id)
}

pub fn find_style_tag(id: &str) -> Option<StyleTag> {
    load_style_tags().into_iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{DEFAULT_STYLE_TAG_IDS, DEFAULT_THEME_ID};

    #[test]
    fn load_has_expected_builtins() {
        let themes = load_builtin_themes();
        let ids: Vec<&str> = themes.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["vehicles", "animals", "nature", "people", "fantasy"]);
        assert!(ids.contains(&DEFAULT_THEME_ID));
    }

    #[test]
    fn style_tags_keep_their_composition_order() {
        let tags = load_style_tags();
        let ids: Vec<&str> = tags.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["toddler-simple", "kid-friendly", "detailed", "high-contrast"]
        );
        for default in DEFAULT_STYLE_TAG_IDS {
            assert!(ids.contains(default));
        }
    }

    #[test]
    fn every_builtin_has_a_nonempty_prompt() {
        for theme in load_builtin_themes() {
            assert!(!theme.prompt.trim().is_empty(), "theme {} is blank", theme.id);
        }
        for tag in load_style_tags() {
            assert!(!tag.modifier.trim().is_empty(), "tag {} is blank", tag.id);
        }
    }
}
