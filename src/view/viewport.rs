use crate::foundation::core::{Region, SurfaceSize};
use crate::foundation::error::{TwinviewError, TwinviewResult};
use crate::scene::graph::SceneKind;

/// One split-screen band: which scene, through which camera, into which vertical slice.
///
/// `bottom` and `height` are fractions of the surface height and are animated by the
/// timeline. They are clamped into `[0, 1]` when a region is computed, never when written.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub scene: SceneKind,
    /// Index into the stage's camera list.
    pub camera: usize,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default = "full_height")]
    pub height: f64,
}

fn full_height() -> f64 {
    1.0
}

impl Viewport {
    /// Pixel region for the current surface size (bottom-left origin).
    ///
    /// The band always spans the full width and never extends above the surface top.
    pub fn region(&self, size: SurfaceSize) -> Region {
        let w = f64::from(size.width);
        let h = f64::from(size.height);
        let y = h * unit(self.bottom);
        let height = (h * unit(self.height)).min(h - y);
        Region {
            x: 0.0,
            y,
            width: w,
            height: height.max(0.0),
        }
    }
}

fn unit(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

/// Ordered viewport list. Order is draw order: later viewports paint over earlier ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewportSet {
    views: Vec<Viewport>,
}

impl ViewportSet {
    pub fn new(views: Vec<Viewport>) -> TwinviewResult<Self> {
        if views.is_empty() {
            return Err(TwinviewError::validation(
                "at least one viewport is required",
            ));
        }
        Ok(Self { views })
    }

    /// Regions of every viewport, in draw order. Recomputed from scratch on every call.
    pub fn compute_regions(&self, size: SurfaceSize) -> Vec<Region> {
        self.views.iter().map(|v| v.region(size)).collect()
    }

    pub fn get(&self, index: usize) -> Option<&Viewport> {
        self.views.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Viewport> {
        self.views.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Viewport> {
        self.views.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/viewport.rs"]
mod tests;
