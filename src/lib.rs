//! Crayonbox is a terminal-first coloring-page generator driving remote
//! text-to-image APIs.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns persisted settings, the theme store, the model registry,
//!   the session controller that runs a generation, share-link key
//!   exchange, and the print surface.
//! - [`api`] defines the provider wire payloads and the adapter variants
//!   that translate a composed prompt into each provider's request shape.
//! - [`cli`] parses command-line arguments and routes subcommands to their
//!   handlers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod utils;
