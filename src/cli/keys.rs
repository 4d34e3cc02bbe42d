use std::error::Error;

use clap::Subcommand;

use crate::core::config::SettingsStore;
use crate::core::registry::provider_display_name;
use crate::core::share;

#[derive(Subcommand)]
pub enum KeysCommand {
    /// Store an API key for a provider
    Set {
        /// Provider id (google or openai)
        provider: String,
        /// The API key
        key: String,
    },
    /// Forget a provider's API key
    Remove {
        /// Provider id (google or openai)
        provider: String,
    },
    /// Show which providers have a stored key
    List,
    /// Import keys from a share link or fragment
    Import {
        /// Link of the form https://...#gkey=...&okey=...
        link: String,
    },
    /// Build a share link carrying the stored keys
    ShareLink {
        /// Base URL to attach the fragment to
        #[arg(long, default_value = "https://crayonbox.app")]
        base_url: String,
    },
}

pub fn run(store: &SettingsStore, command: KeysCommand) -> Result<(), Box<dyn Error>> {
    match command {
        KeysCommand::Set { provider, key } => {
            let provider = provider.to_lowercase();
            if key.trim().is_empty() {
                return Err("The key must not be empty".into());
            }
            store.mutate(|config| {
                config.set_api_key(&provider, &key);
                Ok(())
            })?;
            println!("✅ Stored {} key", provider_display_name(&provider));
            Ok(())
        }
        KeysCommand::Remove { provider } => {
            let provider = provider.to_lowercase();
            let removed = store.mutate(|config| Ok(config.remove_api_key(&provider)))?;
            if removed {
                println!("✅ Removed {} key", provider_display_name(&provider));
                Ok(())
            } else {
                Err(format!("No key stored for provider '{provider}'").into())
            }
        }
        KeysCommand::List => {
            let config = store.load()?;
            println!("Provider keys:\n");
            for provider in ["google", "openai"] {
                let status = match config.api_key_for(provider) {
                    Some(key) => format!("set ({})", mask_key(key)),
                    None => "not set".to_string(),
                };
                println!("  {} - {}", provider_display_name(provider), status);
            }
            Ok(())
        }
        KeysCommand::Import { link } => {
            let imported = share::import_shared_keys(store, &link)?;
            if imported.is_empty() {
                return Err("No keys found in that link".into());
            }
            println!("✅ Imported keys for: {}", imported.join(", "));
            Ok(())
        }
        KeysCommand::ShareLink { base_url } => {
            let config = store.load()?;
            let link = share::build_share_link(&base_url, &config)
                .ok_or("No keys are stored yet; nothing to share")?;
            eprintln!("{}", share::SHARE_WARNING);
            println!("{link}");
            Ok(())
        }
    }
}

/// Show just enough of a key to recognize it.
fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{visible}…")
}
