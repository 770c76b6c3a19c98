//! Command-line argument parsing for the orrery.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery configuration overrides.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Orbiting-bodies scene")]
pub struct CliArgs {
    /// Viewport width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Viewport height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Fraction of the short viewport side the orbits span (clamped to 0.2-0.95).
    #[arg(long)]
    pub fill: Option<f64>,

    /// Orbital speed multiplier.
    #[arg(long)]
    pub speed: Option<f64>,

    /// Inclination exaggeration factor.
    #[arg(long)]
    pub tilt: Option<f64>,

    /// Global scale multiplier on top of the auto-fit scale.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Disable eye blinking.
    #[arg(long)]
    pub no_blink: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.viewport.width = w;
        }
        if let Some(h) = args.height {
            self.viewport.height = h;
        }
        if let Some(fill) = args.fill {
            self.orbit.fill_fraction = fill;
        }
        if let Some(speed) = args.speed {
            self.orbit.speed = speed;
        }
        if let Some(tilt) = args.tilt {
            self.orbit.tilt_scale = tilt;
        }
        if let Some(scale) = args.scale {
            self.orbit.global_scale = scale;
        }
        if args.no_blink {
            self.eyes.blink = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
