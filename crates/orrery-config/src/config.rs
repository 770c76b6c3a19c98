//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashSet;
use std::path::Path;

use orrery_orbit::{OrbitError, OrbitalBody, SystemSettings};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level scene configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Initial viewport settings.
    pub viewport: ViewportConfig,
    /// Orbit-wide settings: center, scales, tilt, fill fraction, speed.
    pub orbit: SystemSettings,
    /// Orbiting bodies. Empty means "use the built-in set".
    pub bodies: Vec<OrbitalBody>,
    /// Eye blink timing.
    pub eyes: EyeConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Viewport configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
}

/// Blink timing for the head's eyes. Purely cosmetic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EyeConfig {
    /// Enable random blinking.
    pub blink: bool,
    /// Seed for the blink interval generator.
    pub seed: u64,
    /// Shortest pause between blinks, in seconds.
    pub min_interval: f64,
    /// Longest pause between blinks, in seconds.
    pub max_interval: f64,
    /// Time for the lid to close, in seconds.
    pub close_duration: f64,
    /// Time for the lid to reopen, in seconds.
    pub open_duration: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for EyeConfig {
    fn default() -> Self {
        Self {
            blink: true,
            seed: 0x0bad_cafe,
            min_interval: 2.5,
            max_interval: 6.0,
            close_duration: 0.08,
            open_duration: 0.14,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Validation ---

fn require(name: &'static str, value: f64, ok: bool) -> Result<(), ConfigError> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidSetting { name, value })
    }
}

impl Config {
    /// Check cross-field constraints that the individual types cannot.
    ///
    /// Bodies are already valid individually (deserialization rejects bad
    /// elements); this checks the set and the scene-wide settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut ids = HashSet::new();
        for body in &self.bodies {
            if !ids.insert(body.id()) {
                return Err(OrbitError::DuplicateBody(body.id().to_string()).into());
            }
        }

        let orbit = &self.orbit;
        require("orbit.global_scale", orbit.global_scale, orbit.global_scale > 0.0)?;
        require("orbit.speed", orbit.speed, true)?;
        require("orbit.tilt_scale", orbit.tilt_scale, true)?;
        require("orbit.planet_size", orbit.planet_size, orbit.planet_size > 0.0)?;
        require("orbit.spin_per_tick", orbit.spin_per_tick, true)?;
        require(
            "orbit.path_segments",
            orbit.path_segments as f64,
            orbit.path_segments > 0,
        )?;
        for (i, c) in orbit.center.iter().enumerate() {
            let name = ["orbit.center.x", "orbit.center.y", "orbit.center.z"][i];
            require(name, *c, true)?;
        }

        let eyes = &self.eyes;
        require("eyes.min_interval", eyes.min_interval, eyes.min_interval > 0.0)?;
        require(
            "eyes.max_interval",
            eyes.max_interval,
            eyes.max_interval >= eyes.min_interval,
        )?;
        require("eyes.close_duration", eyes.close_duration, eyes.close_duration >= 0.0)?;
        require("eyes.open_duration", eyes.open_duration, eyes.open_duration >= 0.0)?;
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(config_path).map_err(ConfigError::ReadError)?;
        let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use orrery_orbit::presets::default_bodies;

    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("tilt_scale: 3.5"));
    }

    #[test]
    fn test_config_with_bodies_roundtrip() {
        let config = Config {
            bodies: default_bodies().unwrap(),
            ..Config::default()
        };
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let ron_str = "(viewport: (), orbit: (speed: 2.0))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.eyes, EyeConfig::default());
        assert_eq!(config.orbit.speed, 2.0);
        assert_eq!(config.orbit.fill_fraction, 0.7);
        assert!(config.bodies.is_empty());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_minimal_body_list() {
        let ron_str = r#"(bodies: [(id: "solo", semi_major_axis: 2.0, period: 10.0)])"#;
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.bodies.len(), 1);
        assert_eq!(config.bodies[0].id(), "solo");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_eccentricity_rejected_on_parse() {
        let ron_str =
            r#"(bodies: [(id: "open", semi_major_axis: 2.0, eccentricity: 1.0, period: 10.0)])"#;
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_period_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"(bodies: [(id: "still", semi_major_axis: 2.0, period: 0.0)])"#,
        )
        .unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_duplicate_bodies_rejected() {
        let ron_str = r#"(bodies: [
            (id: "twin", semi_major_axis: 2.0, period: 10.0),
            (id: "twin", semi_major_axis: 3.0, period: 12.0),
        ])"#;
        let config: Config = ron::from_str(ron_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBody(OrbitError::DuplicateBody(_)))
        ));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut config = Config::default();
        config.orbit.global_scale = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSetting { name: "orbit.global_scale", .. })
        ));

        let mut config = Config::default();
        config.orbit.path_segments = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.eyes.max_interval = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSetting { name: "eyes.max_interval", .. })
        ));

        let mut config = Config::default();
        config.orbit.center[1] = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fill_fraction_out_of_range_is_not_an_error() {
        // The scaler clamps fill fraction itself.
        let mut config = Config::default();
        config.orbit.fill_fraction = 2.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.viewport.width = 1920;
        config.viewport.height = 1080;
        config.bodies = default_bodies().unwrap();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.orbit.tilt_scale = 1.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().orbit.tilt_scale, 1.0);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_ron_comments_preserved() {
        let ron_str = "// This is a comment\n(\n  // Another comment\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }
}
