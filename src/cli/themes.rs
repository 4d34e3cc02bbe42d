use std::error::Error;

use clap::Subcommand;

use crate::core::config::SettingsStore;
use crate::core::themes::{ThemeStore, ThemeUpdate};

#[derive(Subcommand)]
pub enum ThemesCommand {
    /// List built-in and custom themes
    List,
    /// Create a custom theme
    Add {
        /// Display name for the theme
        name: String,
        /// Prompt text the theme contributes
        #[arg(long)]
        prompt: String,
        /// Short description shown in listings
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Edit a custom theme
    Edit {
        /// Id of the theme to edit
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Delete a custom theme
    Remove {
        /// Id of the theme to delete
        id: String,
    },
    /// Make a theme the active one
    Use {
        /// Id of the theme to activate
        id: String,
    },
}

pub fn run(store: &SettingsStore, command: ThemesCommand) -> Result<(), Box<dyn Error>> {
    let themes = ThemeStore::new(store.clone());

    match command {
        ThemesCommand::List => list_themes(store, &themes),
        ThemesCommand::Add {
            name,
            prompt,
            description,
        } => {
            let created = themes.create_theme(&name, &description, &prompt)?;
            println!("✅ Created theme '{}' ({})", created.name, created.id);
            Ok(())
        }
        ThemesCommand::Edit {
            id,
            name,
            description,
            prompt,
        } => {
            let updated = themes.update_theme(
                &id,
                ThemeUpdate {
                    name,
                    description,
                    prompt,
                },
            )?;
            println!("✅ Updated theme '{}' ({})", updated.name, updated.id);
            Ok(())
        }
        ThemesCommand::Remove { id } => {
            themes.delete_theme(&id)?;
            println!("✅ Deleted theme {id}");
            Ok(())
        }
        ThemesCommand::Use { id } => {
            themes.set_active_theme(&id)?;
            println!("✅ Active theme is now {id}");
            Ok(())
        }
    }
}

fn list_themes(store: &SettingsStore, themes: &ThemeStore) -> Result<(), Box<dyn Error>> {
    let config = store.load()?;
    let active_id = config.selected_theme_id().to_string();
    let all = themes.list_themes()?;

    println!("Available themes:\n");
    println!("Built-in:");
    for theme in all.iter().filter(|t| t.built_in) {
        let mark = if theme.id == active_id { "*" } else { " " };
        println!("  {} {} - {}", mark, theme.id, theme.description);
    }

    let customs: Vec<_> = all.iter().filter(|t| !t.built_in).collect();
    if !customs.is_empty() {
        println!("\nCustom:");
        for theme in customs {
            let mark = if theme.id == active_id { "*" } else { " " };
            println!("  {} {} - {}", mark, theme.id, theme.name);
        }
    }

    println!("\nActive: {active_id}");
    Ok(())
}
