//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments and routes each subcommand to
//! its handler. All handlers receive the settings store explicitly; nothing
//! reads configuration ambiently.

pub mod generate;
pub mod keys;
pub mod model_list;
pub mod styles;
pub mod themes;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::core::config::SettingsStore;
use crate::core::registry;

#[derive(Parser)]
#[command(name = "crayonbox")]
#[command(about = "A terminal coloring-page generator using hosted image APIs")]
#[command(
    long_about = "Crayonbox composes kid-friendly coloring-page prompts from a content theme, \
a set of style tags, and your description, sends them to a hosted \
text-to-image API, and saves the result as a printable page.\n\n\
Getting started:\n\
  crayonbox keys set google <key>   Store your Google API key\n\
  crayonbox generate a happy robot  Generate and save a page\n\
  crayonbox themes list             See what can be drawn\n\n\
Settings live in a per-user config file; `crayonbox set` changes page \
size, orientation, and the default model."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a coloring page from a free-text description
    Generate {
        /// What you want to color
        #[arg(trailing_var_arg = true, required = true)]
        description: Vec<String>,
        /// Where to save the image (defaults to ./coloring-page.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Open the print dialog after saving
        #[arg(short, long)]
        print: bool,
    },
    /// List and manage content themes
    Themes {
        #[command(subcommand)]
        command: themes::ThemesCommand,
    },
    /// List and toggle style tags
    Styles {
        #[command(subcommand)]
        command: styles::StylesCommand,
    },
    /// List available generation models
    Models,
    /// Manage provider API keys and share links
    Keys {
        #[command(subcommand)]
        command: keys::KeysCommand,
    },
    /// Set configuration values (page-size, orientation, default-model)
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        value: String,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Open the print dialog for a previously saved image
    Print {
        /// Image file to print
        image: PathBuf,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let store = SettingsStore::open_default()?;

    match args.command {
        Commands::Generate {
            description,
            output,
            print,
        } => generate::run_generate(&store, &description.join(" "), output, print).await,
        Commands::Themes { command } => themes::run(&store, command),
        Commands::Styles { command } => styles::run(&store, command),
        Commands::Models => model_list::list_models(&store),
        Commands::Keys { command } => keys::run(&store, command),
        Commands::Set { key, value } => handle_set(&store, &key, &value),
        Commands::Unset { key } => handle_unset(&store, &key),
        Commands::Print { image } => generate::run_print(&store, &image),
    }
}

fn handle_set(store: &SettingsStore, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    match key {
        "page-size" => {
            let page_size = crate::core::config::PageSize::parse(value)
                .ok_or("Valid page sizes are: letter, a4, poster")?;
            store.mutate(|config| {
                config.page_size = Some(page_size);
                Ok(())
            })?;
            println!(
                "✅ Set page-size to: {} ({})",
                page_size.id(),
                page_size.description()
            );
        }
        "orientation" => {
            let orientation = crate::core::config::Orientation::parse(value)
                .ok_or("Valid orientations are: landscape, portrait")?;
            store.mutate(|config| {
                config.orientation = Some(orientation);
                Ok(())
            })?;
            println!("✅ Set orientation to: {}", orientation.id());
        }
        "default-model" => {
            let model = registry::resolve(value).ok_or_else(|| {
                let keys: Vec<String> = registry::load_builtin_models()
                    .into_iter()
                    .map(|m| m.key)
                    .collect();
                format!("Unknown model '{}'. Available: {}", value, keys.join(", "))
            })?;
            store.mutate(|config| {
                config.default_model = Some(model.key.clone());
                Ok(())
            })?;
            println!("✅ Set default-model to: {}", model.key);
        }
        _ => {
            return Err(format!(
                "Unknown config key: {key} (expected page-size, orientation, or default-model)"
            )
            .into());
        }
    }
    Ok(())
}

fn handle_unset(store: &SettingsStore, key: &str) -> Result<(), Box<dyn Error>> {
    match key {
        "page-size" => store.mutate(|config| {
            config.page_size = None;
            Ok(())
        })?,
        "orientation" => store.mutate(|config| {
            config.orientation = None;
            Ok(())
        })?,
        "default-model" => store.mutate(|config| {
            config.default_model = None;
            Ok(())
        })?,
        _ => {
            return Err(format!(
                "Unknown config key: {key} (expected page-size, orientation, or default-model)"
            )
            .into());
        }
    }
    println!("✅ Unset {key}");
    Ok(())
}
