//! Toolkit settings with persistence
//!
//! Settings are saved to `~/.config/prism/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use prism_core::{Camera, ClockConfig};
use prism_scene::OrbitConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All toolkit settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub viewport: ViewportSettings,
    pub camera: CameraSettings,
    pub clock: ClockConfig,
    pub orbit: OrbitConfig,
    pub assets: AssetSettings,
    pub demo: DemoSettings,
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("prism"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load settings from `path`. Missing or malformed files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = Self::settings_path() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&path)
    }

    /// Save settings to `path`, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Output surface settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl ViewportSettings {
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Default camera for new scenes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Use an orthographic projection instead of perspective
    pub orthographic: bool,
    /// Vertical field of view in degrees (perspective)
    pub fov: f32,
    /// Half extent along Y (orthographic)
    pub half_height: f32,
    pub near: f32,
    /// Far plane; omitted means infinitely far (perspective only)
    pub far: Option<f32>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            orthographic: false,
            fov: 60.0,
            half_height: 5.0,
            near: 0.1,
            far: None,
        }
    }
}

impl CameraSettings {
    /// Build a camera for a viewport of the given aspect ratio
    pub fn to_camera(&self, aspect: f32) -> Camera {
        if self.orthographic {
            Camera::orthographic(self.half_height, aspect, self.near, self.far.unwrap_or(1000.0))
        } else {
            Camera::perspective(
                self.fov.to_radians(),
                aspect,
                self.near,
                self.far.unwrap_or(f32::INFINITY),
            )
        }
    }
}

/// Asset lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSettings {
    /// Directory relative asset paths are resolved against
    pub base_path: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("assets"),
        }
    }
}

/// Headless demo loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoSettings {
    /// Number of frames to simulate
    pub frames: u32,
    /// Simulated frames per second
    pub frame_rate: f32,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            frames: 240,
            frame_rate: 60.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("prism-settings-{}-{}", name, std::process::id()))
            .join("settings.toml")
    }

    #[test]
    fn missing_file_gives_defaults() {
        let settings = Settings::load_from(Path::new("/nonexistent/prism/settings.toml"));
        assert_eq!(settings.viewport.width, 1280);
        assert_eq!(settings.demo.frames, 240);
    }

    #[test]
    fn save_then_load() {
        let path = scratch_path("roundtrip");
        let mut settings = Settings::default();
        settings.viewport.width = 640;
        settings.camera.far = Some(50.0);
        settings.clock.time_scale = 2.0;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.viewport.width, 640);
        assert_eq!(loaded.camera.far, Some(50.0));
        assert_eq!(loaded.clock.time_scale, 2.0);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let path = scratch_path("partial");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[viewport]\nwidth = 800\nheight = 600\n").unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.viewport.width, 800);
        assert_eq!(loaded.camera.fov, 60.0);
        assert_eq!(loaded.assets.base_path, PathBuf::from("assets"));
    }

    #[test]
    fn partial_nested_sections_keep_other_fields() {
        let path = scratch_path("nested");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[clock]\ntime_scale = 0.5\n\n[orbit]\nzoom_speed = 3.0\n").unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.clock.time_scale, 0.5);
        assert_eq!(loaded.clock.max_delta_time, ClockConfig::default().max_delta_time);
        assert_eq!(loaded.orbit.zoom_speed, 3.0);
        assert_eq!(loaded.orbit.max_distance, OrbitConfig::default().max_distance);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let path = scratch_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "viewport = 12 [[[").unwrap();
        assert_eq!(Settings::load_from(&path).viewport.height, 720);
    }

    #[test]
    fn camera_settings_pick_projection() {
        let mut cam = CameraSettings::default();
        assert!(!cam.to_camera(1.5).is_orthographic());
        assert!(cam.to_camera(1.5).far.is_infinite());
        cam.orthographic = true;
        let ortho = cam.to_camera(2.0);
        assert!(ortho.is_orthographic());
        assert_eq!(ortho.aspect, 2.0);
    }
}
