use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::assets::color::Color;
use crate::assets::resolver::ModelRequest;
use crate::foundation::core::{DVec3, SurfaceSize};
use crate::foundation::error::{TwinviewError, TwinviewResult};
use crate::scene::graph::SceneKind;
use crate::timeline::section::TimelineDef;
use crate::timeline::trigger::ScrollTrigger;
use crate::view::viewport::Viewport;

/// Static startup configuration for a [`crate::Stage`].
///
/// Every field has a default; an empty JSON object yields the witch/bear scroll page.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageConfig {
    /// Models to resolve, in registration order.
    pub models: Vec<ModelRequest>,
    pub colors: Palette,
    /// Parameters shared by every viewport camera.
    pub camera: CameraConfig,
    /// Initial shared look-at target.
    pub look_at: DVec3,
    /// Draw order; one camera is created per viewport.
    pub viewports: Vec<Viewport>,
    pub fog: FogConfig,
    pub lights: LightsConfig,
    /// Edge length of the ground plane; `0` disables it.
    pub floor_size: f64,
    /// Upper bound applied to the device pixel ratio.
    pub pixel_ratio_cap: f64,
    /// Device pixel ratio reported at startup, before any resize.
    pub device_pixel_ratio: f64,
    /// Initial logical surface size.
    pub surface: SurfaceSize,
    pub timeline: TimelineDef,
    pub trigger: ScrollTrigger,
}

/// Named color constants.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    /// Shaded scene background and fog color.
    pub background: Color,
    pub light: Color,
    pub sky: Color,
    /// Hemisphere ground color and floor color.
    pub ground: Color,
    /// Wireframe scene background.
    pub blue: Color,
    /// Wireframe edge color.
    pub wireframe: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb8(255, 255, 255),
            light: Color::from_rgb8(255, 255, 255),
            sky: Color::from_rgb8(0xaa, 0xaa, 0xff),
            ground: Color::from_rgb8(0x88, 0xff, 0x88),
            blue: Color::from_rgb8(70, 130, 180),
            wireframe: Color::from_rgb8(255, 255, 255),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
    pub position: DVec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 75.0,
            near: 0.1,
            far: 100.0,
            position: DVec3::new(0.0, 1.0, 0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FogConfig {
    pub near: f64,
    pub far: f64,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            near: 15.0,
            far: 20.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightsConfig {
    pub directional_position: DVec3,
    pub directional_intensity: f64,
    pub directional_shadow: bool,
    pub hemisphere_intensity: f64,
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            directional_position: DVec3::new(2.0, 5.0, 3.0),
            directional_intensity: 2.0,
            directional_shadow: true,
            hemisphere_intensity: 0.5,
        }
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            models: vec![
                ModelRequest {
                    name: "witch".to_owned(),
                    source: "builtin:cone".to_owned(),
                    shadows: true,
                },
                ModelRequest {
                    name: "bear".to_owned(),
                    source: "builtin:sphere".to_owned(),
                    shadows: true,
                },
            ],
            colors: Palette::default(),
            camera: CameraConfig::default(),
            look_at: DVec3::new(0.0, 3.0, 0.0),
            viewports: vec![
                Viewport {
                    scene: SceneKind::Shaded,
                    camera: 0,
                    bottom: 0.0,
                    height: 1.0,
                },
                Viewport {
                    scene: SceneKind::Wireframe,
                    camera: 1,
                    bottom: 0.0,
                    height: 0.0,
                },
            ],
            fog: FogConfig::default(),
            lights: LightsConfig::default(),
            floor_size: 100.0,
            pixel_ratio_cap: 2.0,
            device_pixel_ratio: 1.0,
            surface: SurfaceSize {
                width: 1280,
                height: 720,
            },
            timeline: TimelineDef::scroll_story(),
            trigger: ScrollTrigger {
                top: 0.0,
                height: 4320.0,
            },
        }
    }
}

impl StageConfig {
    /// Startup device pixel ratio after the cap.
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(self.pixel_ratio_cap)
    }

    pub fn from_path(path: &Path) -> TwinviewResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            TwinviewError::validation(format!("open config {}: {e}", path.display()))
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> TwinviewResult<Self> {
        let cfg: Self = serde_json::from_reader(reader)
            .map_err(|e| TwinviewError::serde(format!("config json parse failed: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> TwinviewResult<()> {
        let mut names = HashSet::new();
        for m in &self.models {
            if m.name.trim().is_empty() {
                return Err(TwinviewError::validation("model name must be non-empty"));
            }
            if !names.insert(m.name.as_str()) {
                return Err(TwinviewError::validation(format!(
                    "model \"{}\" listed twice",
                    m.name
                )));
            }
        }
        if self.viewports.is_empty() {
            return Err(TwinviewError::validation(
                "at least one viewport is required",
            ));
        }
        for (i, v) in self.viewports.iter().enumerate() {
            if v.camera >= self.viewports.len() {
                return Err(TwinviewError::validation(format!(
                    "viewport {i} references camera {} but only {} exist",
                    v.camera,
                    self.viewports.len()
                )));
            }
        }
        if !(self.fog.near >= 0.0 && self.fog.far >= self.fog.near) {
            return Err(TwinviewError::validation(
                "fog must satisfy 0 <= near <= far",
            ));
        }
        if !(self.floor_size.is_finite() && self.floor_size >= 0.0) {
            return Err(TwinviewError::validation("floor_size must be >= 0"));
        }
        if !(self.pixel_ratio_cap.is_finite() && self.pixel_ratio_cap > 0.0) {
            return Err(TwinviewError::validation("pixel_ratio_cap must be > 0"));
        }
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            return Err(TwinviewError::validation("device_pixel_ratio must be > 0"));
        }
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err(TwinviewError::validation("surface size must be non-zero"));
        }
        if !(self.trigger.height.is_finite() && self.trigger.top.is_finite()) {
            return Err(TwinviewError::validation("trigger geometry must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
