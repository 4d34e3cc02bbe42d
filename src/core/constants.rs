//! Shared constants used across the application

/// Theme the active selection falls back to when the selected custom theme
/// is deleted.
pub const DEFAULT_THEME_ID: &str = "animals";

/// Style tags active on a fresh install.
pub const DEFAULT_STYLE_TAG_IDS: &[&str] = &["kid-friendly"];

/// Model used when the user has not picked one.
pub const DEFAULT_MODEL_KEY: &str = "imagen-standard";

/// Provider ids as they appear in the model registry and the API-key map.
pub const PROVIDER_GOOGLE: &str = "google";
pub const PROVIDER_OPENAI: &str = "openai";
