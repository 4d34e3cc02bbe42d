use std::error::Error;

use crate::core::config::SettingsStore;
use crate::core::registry::{load_builtin_models, provider_display_name};

pub fn list_models(store: &SettingsStore) -> Result<(), Box<dyn Error>> {
    let config = store.load()?;
    let current = config.selected_model_key().to_string();

    println!("Available models:\n");
    for model in load_builtin_models() {
        let mark = if model.key.eq_ignore_ascii_case(&current) {
            "*"
        } else {
            " "
        };
        println!(
            "  {} {} - {} ({}, {} tier, {} per page)",
            mark,
            model.key,
            model.display_name,
            provider_display_name(&model.provider),
            model.tier,
            model.price_display
        );
        println!("      {}", model.description);
    }

    println!("\nCurrent: {current}");
    Ok(())
}
