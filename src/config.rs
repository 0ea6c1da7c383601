//! Viewer configuration: built-in defaults, optionally overridden by a TOML
//! file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::input::KeyCode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub textures: Vec<TextureSource>,
    pub keys: KeyConfig,
    /// Directory relative texture paths are resolved against. Not read from
    /// the file; set to the file's directory by [`SceneConfig::load`].
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            textures: default_textures(),
            keys: KeyConfig::default(),
            base_dir: None,
        }
    }
}

impl SceneConfig {
    /// Reads a TOML file. Missing sections and fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config = Self::from_toml(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.keys.resolve()?;
        if config.window.width == 0 || config.window.height == 0 {
            return Err(anyhow!("window size must be non-zero"));
        }
        config.camera.validate()?;
        config.projection.validate()?;
        Ok(config)
    }

    /// Texture list with relative paths joined onto the config directory.
    pub fn texture_sources(&self) -> Vec<(PathBuf, String)> {
        self.textures
            .iter()
            .map(|source| {
                let path = match &self.base_dir {
                    Some(base) if source.path.is_relative() => base.join(&source.path),
                    _ => source.path.clone(),
                };
                (path, source.tag.clone())
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tabletop Still Life".to_string(),
            width: 1000,
            height: 800,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_speed: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
}

impl CameraConfig {
    fn validate(&self) -> Result<()> {
        let scalars = [
            ("yaw", self.yaw),
            ("pitch", self.pitch),
            ("zoom", self.zoom),
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("zoom_speed", self.zoom_speed),
            ("movement_speed", self.movement_speed),
            ("mouse_sensitivity", self.mouse_sensitivity),
        ];
        if let Some((name, value)) = scalars.iter().find(|(_, value)| !value.is_finite()) {
            return Err(anyhow!("camera.{name} must be finite, got {value}"));
        }
        if !self.position.is_finite() || !self.up.is_finite() {
            return Err(anyhow!("camera position and up must be finite"));
        }
        if self.min_zoom > self.max_zoom {
            return Err(anyhow!(
                "camera.min_zoom ({}) exceeds camera.max_zoom ({})",
                self.min_zoom,
                self.max_zoom
            ));
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 20.0),
            up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            zoom: 80.0,
            min_zoom: 1.0,
            max_zoom: 90.0,
            zoom_speed: 1.0,
            movement_speed: 20.0,
            mouse_sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub ortho_half_extent: f32,
    pub near: f32,
    pub far: f32,
}

impl ProjectionConfig {
    fn validate(&self) -> Result<()> {
        if !(self.near.is_finite() && self.far.is_finite() && self.near < self.far) {
            return Err(anyhow!(
                "projection.near ({}) must be below projection.far ({})",
                self.near,
                self.far
            ));
        }
        if !(self.ortho_half_extent > 0.0 && self.ortho_half_extent.is_finite()) {
            return Err(anyhow!(
                "projection.ortho_half_extent must be positive, got {}",
                self.ortho_half_extent
            ));
        }
        Ok(())
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            ortho_half_extent: 10.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSource {
    pub path: PathBuf,
    pub tag: String,
}

impl TextureSource {
    pub fn new(path: impl Into<PathBuf>, tag: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tag: tag.into(),
        }
    }
}

fn default_textures() -> Vec<TextureSource> {
    vec![
        TextureSource::new("textures/marbletexture.jpg", "marble"),
        TextureSource::new("textures/woodtexture.jpg", "wood"),
    ]
}

/// Key names as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub up: String,
    pub down: String,
    pub perspective: String,
    pub orthographic: String,
    pub quit: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            forward: "W".into(),
            backward: "S".into(),
            left: "A".into(),
            right: "D".into(),
            up: "Q".into(),
            down: "E".into(),
            perspective: "P".into(),
            orthographic: "O".into(),
            quit: "Escape".into(),
        }
    }
}

impl KeyConfig {
    pub fn resolve(&self) -> Result<KeyBindings> {
        let key = |action: &str, name: &str| {
            KeyCode::from_name(name).ok_or_else(|| anyhow!("unknown key '{name}' for {action}"))
        };
        Ok(KeyBindings {
            forward: key("forward", &self.forward)?,
            backward: key("backward", &self.backward)?,
            left: key("left", &self.left)?,
            right: key("right", &self.right)?,
            up: key("up", &self.up)?,
            down: key("down", &self.down)?,
            perspective: key("perspective", &self.perspective)?,
            orthographic: key("orthographic", &self.orthographic)?,
            quit: key("quit", &self.quit)?,
        })
    }
}

/// Resolved key for each viewer action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
    pub perspective: KeyCode,
    pub orthographic: KeyCode,
    pub quit: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use crate::input::NamedKey;
        Self {
            forward: KeyCode::Character('W'),
            backward: KeyCode::Character('S'),
            left: KeyCode::Character('A'),
            right: KeyCode::Character('D'),
            up: KeyCode::Character('Q'),
            down: KeyCode::Character('E'),
            perspective: KeyCode::Character('P'),
            orthographic: KeyCode::Character('O'),
            quit: KeyCode::Named(NamedKey::Escape),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::NamedKey;

    #[test]
    fn defaults_match_the_still_life_viewer() {
        let config = SceneConfig::default();
        assert_eq!((config.window.width, config.window.height), (1000, 800));
        assert_eq!(config.camera.position, Vec3::new(0.0, 5.0, 20.0));
        assert_eq!(config.camera.movement_speed, 20.0);
        assert_eq!(config.projection.ortho_half_extent, 10.0);
        let tags: Vec<_> = config.textures.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, ["marble", "wood"]);
        assert_eq!(config.keys.resolve().unwrap(), KeyBindings::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = SceneConfig::from_toml(
            r#"
            [camera]
            movement_speed = 5.0
            position = [1.0, 2.0, 3.0]

            [keys]
            quit = "Q"
            up = "Space"
            "#,
        )
        .unwrap();
        assert_eq!(config.camera.movement_speed, 5.0);
        assert_eq!(config.camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.camera.zoom, 80.0);
        assert_eq!(config.window.width, 1000);
        assert_eq!(config.textures.len(), 2);

        let keys = config.keys.resolve().unwrap();
        assert_eq!(keys.quit, KeyCode::Character('Q'));
        assert_eq!(keys.up, KeyCode::Named(NamedKey::Space));
        assert_eq!(keys.forward, KeyCode::Character('W'));
    }

    #[test]
    fn unknown_key_name_is_rejected() {
        let err = SceneConfig::from_toml("[keys]\nforward = \"Hyper\"\n").unwrap_err();
        assert!(err.to_string().contains("Hyper"));
    }

    #[test]
    fn zero_window_size_is_rejected() {
        assert!(SceneConfig::from_toml("[window]\nwidth = 0\n").is_err());
    }

    #[test]
    fn inverted_zoom_bounds_are_rejected() {
        let err = SceneConfig::from_toml("[camera]\nmin_zoom = 60.0\nmax_zoom = 30.0\n").unwrap_err();
        assert!(err.to_string().contains("min_zoom"));
    }

    #[test]
    fn non_finite_camera_values_are_rejected() {
        for field in ["zoom", "max_zoom", "zoom_speed", "movement_speed", "mouse_sensitivity"] {
            let text = format!("[camera]\n{field} = nan\n");
            let err = SceneConfig::from_toml(&text).unwrap_err();
            assert!(err.to_string().contains(field), "{field}: {err}");
        }
        assert!(SceneConfig::from_toml("[camera]\nmin_zoom = -inf\n").is_err());
    }

    #[test]
    fn near_plane_must_sit_before_far_plane() {
        assert!(SceneConfig::from_toml("[projection]\nnear = 100.0\nfar = 100.0\n").is_err());
        assert!(SceneConfig::from_toml("[projection]\nnear = 5.0\nfar = 1.0\n").is_err());
        assert!(SceneConfig::from_toml("[projection]\nnear = 1.0\nfar = 50.0\n").is_ok());
    }

    #[test]
    fn ortho_extent_must_be_positive() {
        assert!(SceneConfig::from_toml("[projection]\northo_half_extent = 0.0\n").is_err());
        assert!(SceneConfig::from_toml("[projection]\northo_half_extent = -2.0\n").is_err());
    }

    #[test]
    fn relative_texture_paths_follow_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.toml");
        fs::write(
            &path,
            r#"
            [[textures]]
            path = "img/marble.png"
            tag = "marble"
            "#,
        )
        .unwrap();

        let config = SceneConfig::load(&path).unwrap();
        let sources = config.texture_sources();
        assert_eq!(sources, vec![(dir.path().join("img/marble.png"), "marble".to_string())]);
    }

    #[test]
    fn missing_config_file_reports_the_path() {
        let err = SceneConfig::load(Path::new("no/such/scene.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("no/such/scene.toml"));
    }
}
