use crate::foundation::core::{SurfaceSize, WindowSize};
use crate::foundation::error::TwinviewResult;
use crate::render::backend::Renderer;
use crate::stage::Stage;

/// Resyncs surface size, camera aspect and the backing buffer after a window resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeHandler {
    pixel_ratio_cap: f64,
}

impl Default for ResizeHandler {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl ResizeHandler {
    pub fn new(pixel_ratio_cap: f64) -> Self {
        let cap = if pixel_ratio_cap.is_finite() && pixel_ratio_cap > 0.0 {
            pixel_ratio_cap
        } else {
            1.0
        };
        Self {
            pixel_ratio_cap: cap,
        }
    }

    /// Effective pixel ratio for a reported device ratio.
    pub fn pixel_ratio(&self, device_pixel_ratio: f64) -> f64 {
        if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(self.pixel_ratio_cap)
        } else {
            1.0
        }
    }

    /// Apply a resize. Returns `false` for degenerate (zero-area) windows, which are ignored.
    ///
    /// The renderer is resized first; if it rejects the size, the stage is left untouched.
    pub fn handle(
        &self,
        stage: &mut Stage,
        renderer: &mut dyn Renderer,
        window: WindowSize,
    ) -> TwinviewResult<bool> {
        let Ok(size) = SurfaceSize::new(window.width, window.height) else {
            tracing::debug!(
                width = window.width,
                height = window.height,
                "ignoring zero-area resize"
            );
            return Ok(false);
        };
        let ratio = self.pixel_ratio(window.device_pixel_ratio);
        renderer.resize(size, ratio)?;

        stage.set_surface(size, ratio);
        let aspect = size.aspect();
        for cam in &mut stage.cameras {
            cam.aspect = aspect;
            cam.update_projection();
        }
        tracing::debug!(
            width = size.width,
            height = size.height,
            pixel_ratio = ratio,
            "resized"
        );
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/resize.rs"]
mod tests;
