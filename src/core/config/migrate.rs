//! One-shot settings migrations from the v1 layout.
//!
//! v1 kept a single Google key in `gemini_api_key` and one freely editable
//! `system_prompt` instead of content themes. Both are folded into the
//! current layout exactly once, guarded by marker flags. Order matters: the
//! key slot moves first so a half-migrated file never loses the key.

use crate::core::config::data::{Config, CustomTheme};
use crate::core::config::store::SettingsStore;
use crate::core::constants::PROVIDER_GOOGLE;
use std::error::Error;

fn needs_migration(config: &Config) -> bool {
    !config.key_slot_migrated || !config.legacy_prompt_migrated
}

/// Run the pending migrations, returning a short note per applied step.
/// Does not touch the file when every marker is already set.
pub fn run_startup_migrations(store: &SettingsStore) -> Result<Vec<String>, Box<dyn Error>> {
    let snapshot = store.load()?;
    if !needs_migration(&snapshot) {
        return Ok(Vec::new());
    }

    store.mutate(|config| {
        let mut notes = Vec::new();

        if !config.key_slot_migrated {
            if let Some(note) = migrate_key_slot(config) {
                notes.push(note);
            }
            config.key_slot_migrated = true;
        }

        if !config.legacy_prompt_migrated {
            if let Some(note) = migrate_legacy_prompt(config) {
                notes.push(note);
            }
            config.legacy_prompt_migrated = true;
        }

        Ok(notes)
    })
}

fn migrate_key_slot(config: &mut Config) -> Option<String> {
    let legacy = config.gemini_api_key.take()?;
    let legacy = legacy.trim();
    if legacy.is_empty() {
        return None;
    }

    // A key already stored in the new format wins; the legacy slot is
    // dropped without overwriting it.
    if config.api_key_for(PROVIDER_GOOGLE).is_some() {
        return Some("Dropped superseded legacy Google key".to_string());
    }

    config.set_api_key(PROVIDER_GOOGLE, legacy);
    Some("Moved legacy Google key into the provider key map".to_string())
}

fn migrate_legacy_prompt(config: &mut Config) -> Option<String> {
    let prompt = config.system_prompt.take()?;
    let prompt = prompt.trim().to_string();
    if prompt.is_empty() {
        return None;
    }

    let id = format!("custom-{}", chrono::Utc::now().timestamp_millis());
    config.custom_themes.push(CustomTheme {
        id: id.clone(),
        name: "My Style (imported)".to_string(),
        description: "Imported from your previous prompt settings".to_string(),
        prompt,
    });

    // The old prompt was the only prompt, so keep it active unless the user
    // already picked a theme.
    if config.selected_theme.is_none() {
        config.selected_theme = Some(id);
    }

    Some("Converted the legacy prompt into a custom theme".to_string())
}
