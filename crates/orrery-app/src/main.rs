//! Headless orrery runner.
//!
//! Loads (or creates) `config.ron`, builds the scene, drives it for a fixed
//! number of frames and optionally prints the final frame state as JSON.
//!
//! Run with: `cargo run -p orrery-app -- --frames 600 --resize 800x400 --dump`

use std::process;

use clap::Parser;
use glam::{DQuat, DVec3};
use orrery_app::platform::{PlatformDirs, PlatformError};
use orrery_app::scene::Scene;
use orrery_config::{CliArgs, Config, ConfigError};
use orrery_orbit::{OrbitError, PresentationHandle};
use tracing::{info, warn};

/// CLI arguments for the headless runner.
#[derive(Parser, Debug)]
#[command(name = "orrery", about = "Orbiting-bodies scene (headless)")]
struct RunArgs {
    #[command(flatten)]
    overrides: CliArgs,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Simulated frame rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Resize the viewport to WIDTHxHEIGHT halfway through the run.
    #[arg(long, value_parser = parse_size)]
    resize: Option<(u32, u32)>,

    /// Print the final frame state as JSON.
    #[arg(long)]
    dump: bool,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
    let w = w.trim().parse().map_err(|e| format!("bad width `{w}`: {e}"))?;
    let h = h.trim().parse().map_err(|e| format!("bad height `{h}`: {e}"))?;
    Ok((w, h))
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Orbit(#[from] OrbitError),
    #[error("failed to encode frame state: {0}")]
    Dump(#[from] serde_json::Error),
}

/// Stand-in for a renderable node: remembers the last transform it received.
#[derive(Default)]
struct Marker {
    position: DVec3,
    rotation: DQuat,
    writes: u64,
}

impl PresentationHandle for Marker {
    fn set_transform(&mut self, position: DVec3, rotation: DQuat) {
        self.position = position;
        self.rotation = rotation;
        self.writes += 1;
    }
}

fn main() {
    let args = RunArgs::parse();
    if let Err(e) = run(&args) {
        eprintln!("orrery: {e}");
        process::exit(1);
    }
}

fn run(args: &RunArgs) -> Result<(), RunError> {
    let dirs = match &args.overrides.config {
        Some(root) => PlatformDirs::resolve_with_root(root),
        None => PlatformDirs::resolve()?,
    };

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(&args.overrides);
    config.validate()?;

    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    info!("Orrery (headless)");
    info!(
        "Viewport: {}x{} | Config: {}",
        config.viewport.width,
        config.viewport.height,
        dirs.config_dir.display()
    );

    let mut scene: Scene<Marker> = Scene::new(&config)?;
    let ids: Vec<String> = scene
        .system()
        .bodies()
        .iter()
        .map(|body| body.id().to_string())
        .collect();
    for id in &ids {
        scene.attach(id.clone(), Marker::default())?;
    }
    scene.on_scale_change(|scale| info!(scale, "Auto-fit scale changed"));

    let fps = if args.fps.is_finite() && args.fps > 0.0 {
        args.fps
    } else {
        warn!(fps = args.fps, "Invalid frame rate, using 60");
        60.0
    };
    let delta = 1.0 / fps;
    let halfway = args.frames / 2;

    for frame in 0..args.frames {
        if frame == halfway
            && let Some((width, height)) = args.resize
        {
            scene.resize(f64::from(width), f64::from(height));
        }
        scene.frame(delta);
    }

    for id in &ids {
        if let Some(marker) = scene.handle(id) {
            info!(
                "{id}: writes={} pos=({:.2}, {:.2}, {:.2}) spin={:.3}",
                marker.writes,
                marker.position.x,
                marker.position.y,
                marker.position.z,
                marker.rotation.to_axis_angle().1,
            );
        }
    }
    info!(
        "Ran {} frames, elapsed {:.2}s, scale {:.4}",
        args.frames,
        scene.elapsed(),
        scene.fit().scale()
    );

    if args.dump {
        println!("{}", serde_json::to_string_pretty(&scene.frame_state())?);
    }
    Ok(())
}
