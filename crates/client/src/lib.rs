//! Headless client for the tile runner.
//!
//! The binary assembles a [`runtime::Runtime`] from environment settings and
//! the data directory, then plays a command script against it and prints
//! what happened. The pieces are exposed here so they can be tested without
//! a terminal.

pub mod config;
pub mod driver;
pub mod render;
pub mod script;

pub use config::ClientConfig;
pub use driver::{Driver, StepReport};
pub use render::{render_map, status_line};
pub use script::{ScriptError, ScriptStep, parse_script};
