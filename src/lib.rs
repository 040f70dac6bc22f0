//! RyCode gives each AI provider its own terminal theme and a merged view of
//! the providers and models a user can reach.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`ui`] holds the provider themes, the [`ui::registry::ThemeRegistry`]
//!   that switches between them, and the interactive switcher.
//! - [`core`] owns configuration, the auth CLI bridge, and the provider
//!   catalog that merges CLI-detected and API-served providers.
//! - [`api`] defines the wire types and HTTP client for the RyCode API server.
//! - [`cli`] parses arguments and dispatches commands.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
