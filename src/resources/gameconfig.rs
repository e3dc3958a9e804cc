//! Game configuration resource.
//!
//! Manages engine settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [render]
//! width = 640
//! height = 360
//! target_fps = 120
//!
//! [simulation]
//! tick_rate = 60
//! max_ticks_per_frame = 5
//!
//! [camera]
//! pixels_per_unit = 16.0
//!
//! [assets]
//! root = ./assets
//! manifest = manifest.json
//!
//! [debug]
//! enabled = false
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_RENDER_WIDTH: u32 = 640;
const DEFAULT_RENDER_HEIGHT: u32 = 360;
const DEFAULT_TARGET_FPS: u32 = 120;
const DEFAULT_TICK_RATE: u32 = 60;
const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 5;
const DEFAULT_PIXELS_PER_UNIT: f32 = 16.0;
const DEFAULT_ASSETS_ROOT: &str = "./assets";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Render width in pixels.
    pub render_width: u32,
    /// Render height in pixels.
    pub render_height: u32,
    /// Frames per second the frame loop aims for.
    pub target_fps: u32,
    /// Simulation ticks per second.
    pub tick_rate: u32,
    /// Upper bound of simulation ticks per frame.
    pub max_ticks_per_frame: u32,
    /// Pixels covered by one world unit at zoom 1.
    pub pixels_per_unit: f32,
    /// Directory resource sources are relative to.
    pub assets_root: PathBuf,
    /// Optional preload manifest, relative to `assets_root`.
    pub manifest: Option<String>,
    /// Start with debug overlays on.
    pub debug: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            tick_rate: DEFAULT_TICK_RATE,
            max_ticks_per_frame: DEFAULT_MAX_TICKS_PER_FRAME,
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            assets_root: PathBuf::from(DEFAULT_ASSETS_ROOT),
            manifest: None,
            debug: false,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [render] section
        if let Some(width) = config.getuint("render", "width").ok().flatten() {
            self.render_width = width as u32;
        }
        if let Some(height) = config.getuint("render", "height").ok().flatten() {
            self.render_height = height as u32;
        }
        if let Some(fps) = config.getuint("render", "target_fps").ok().flatten() {
            self.target_fps = (fps as u32).max(1);
        }

        // [simulation] section
        if let Some(rate) = config.getuint("simulation", "tick_rate").ok().flatten() {
            self.tick_rate = (rate as u32).max(1);
        }
        if let Some(max) = config
            .getuint("simulation", "max_ticks_per_frame")
            .ok()
            .flatten()
        {
            self.max_ticks_per_frame = (max as u32).max(1);
        }

        // [camera] section
        if let Some(ppu) = config.getfloat("camera", "pixels_per_unit").ok().flatten() {
            if ppu > 0.0 {
                self.pixels_per_unit = ppu as f32;
            }
        }

        // [assets] section
        if let Some(root) = config.get("assets", "root") {
            self.assets_root = PathBuf::from(root);
        }
        if let Some(manifest) = config.get("assets", "manifest") {
            self.manifest = Some(manifest).filter(|m| !m.is_empty());
        }

        // [debug] section
        if let Some(enabled) = config.getbool("debug", "enabled").ok().flatten() {
            self.debug = enabled;
        }

        info!(
            "Loaded config: {}x{} render, fps={}, tick_rate={}, ppu={}, assets={:?}, debug={}",
            self.render_width,
            self.render_height,
            self.target_fps,
            self.tick_rate,
            self.pixels_per_unit,
            self.assets_root,
            self.debug
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("render", "width", Some(self.render_width.to_string()));
        config.set("render", "height", Some(self.render_height.to_string()));
        config.set("render", "target_fps", Some(self.target_fps.to_string()));

        config.set("simulation", "tick_rate", Some(self.tick_rate.to_string()));
        config.set(
            "simulation",
            "max_ticks_per_frame",
            Some(self.max_ticks_per_frame.to_string()),
        );

        config.set(
            "camera",
            "pixels_per_unit",
            Some(self.pixels_per_unit.to_string()),
        );

        config.set(
            "assets",
            "root",
            Some(self.assets_root.to_string_lossy().into_owned()),
        );
        if let Some(manifest) = &self.manifest {
            config.set("assets", "manifest", Some(manifest.clone()));
        }

        config.set("debug", "enabled", Some(self.debug.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Full path of the preload manifest, if one is configured.
    pub fn manifest_path(&self) -> Option<PathBuf> {
        self.manifest.as_ref().map(|m| self.assets_root.join(m))
    }

    /// Seconds per frame for the configured target rate.
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    /// Get the render size.
    pub fn render_size(&self) -> (u32, u32) {
        (self.render_width, self.render_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::new();
        assert_eq!(config.render_size(), (640, 360));
        assert_eq!(config.tick_rate, 60);
        assert!(config.manifest_path().is_none());
        assert!(!config.debug);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(
            &path,
            "[simulation]\ntick_rate = 30\n\n[assets]\nroot = data\nmanifest = preload.json\n",
        )
        .unwrap();

        let mut config = GameConfig::with_path(&path);
        config.load_from_file().unwrap();
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.render_width, 640);
        assert_eq!(config.assets_root, PathBuf::from("data"));
        assert_eq!(
            config.manifest_path(),
            Some(PathBuf::from("data").join("preload.json"))
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GameConfig::with_path(dir.path().join("absent.ini"));
        assert!(config.load_from_file().is_err());
        assert_eq!(config.tick_rate, 60);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let mut saved = GameConfig::with_path(&path);
        saved.render_width = 320;
        saved.render_height = 200;
        saved.pixels_per_unit = 8.0;
        saved.manifest = Some("manifest.json".into());
        saved.debug = true;
        saved.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_frame_delta() {
        let mut config = GameConfig::new();
        config.target_fps = 50;
        assert!((config.frame_delta() - 0.02).abs() < 1e-6);
    }
}
