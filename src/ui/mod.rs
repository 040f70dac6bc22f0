//! Terminal UI layer: provider themes and the interactive switcher.
//!
//! - [`theme`], [`builtin_themes`], and [`appearance`]: color policy.
//! - [`registry`] and [`telemetry`]: which theme is active and how it got there.
//! - [`switcher`]: the ratatui event loop.

pub mod appearance;
pub mod builtin_themes;
pub mod registry;
pub mod switcher;
pub mod telemetry;
pub mod theme;
