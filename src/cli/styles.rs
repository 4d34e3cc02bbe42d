use std::error::Error;

use clap::Subcommand;

use crate::core::config::SettingsStore;
use crate::core::themes::ThemeStore;

#[derive(Subcommand)]
pub enum StylesCommand {
    /// List style tags and which are active
    List,
    /// Toggle a style tag on or off
    Toggle {
        /// Id of the style tag to toggle
        id: String,
    },
}

pub fn run(store: &SettingsStore, command: StylesCommand) -> Result<(), Box<dyn Error>> {
    let themes = ThemeStore::new(store.clone());

    match command {
        StylesCommand::List => {
            let active = themes.active_style_tag_ids()?;
            println!("Style tags:\n");
            for tag in themes.style_tags() {
                let mark = if active.contains(&tag.id) { "*" } else { " " };
                println!("  {} {} {} - {}", mark, tag.emoji, tag.id, tag.description);
            }
            println!("\nTags marked * are applied to every generated page.");
            Ok(())
        }
        StylesCommand::Toggle { id } => {
            let now_active = themes.toggle_style_tag(&id)?;
            if now_active {
                println!("✅ Style '{id}' is now on");
            } else {
                println!("✅ Style '{id}' is now off");
            }
            Ok(())
        }
    }
}
