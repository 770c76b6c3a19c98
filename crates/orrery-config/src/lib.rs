//! Configuration for the orrery scene.
//!
//! Settings persist to disk as a RON file. Missing sections fall back to
//! defaults, unknown fields are ignored, and CLI flags override loaded values.
//! Bodies are validated while loading, so an invalid orbit never reaches the
//! scene.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, EyeConfig, ViewportConfig};
pub use error::ConfigError;
