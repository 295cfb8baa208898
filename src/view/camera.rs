use crate::foundation::core::{DMat4, DVec3};
use crate::foundation::error::{TwinviewError, TwinviewResult};

/// Perspective camera oriented toward a look-at point.
///
/// `aspect` must track the surface size; the resize handler keeps it equal to
/// `width / height` and calls [`PerspectiveCamera::update_projection`].
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_deg: f64,
    /// Width / height.
    pub aspect: f64,
    /// Near clip distance.
    pub near: f64,
    /// Far clip distance.
    pub far: f64,
    /// World-space position.
    pub position: DVec3,
    target: DVec3,
    projection: DMat4,
}

impl PerspectiveCamera {
    /// Create a camera at the origin looking down `-Z`.
    pub fn new(fov_deg: f64, aspect: f64, near: f64, far: f64) -> TwinviewResult<Self> {
        if !(fov_deg > 0.0 && fov_deg < 180.0) {
            return Err(TwinviewError::validation("camera fov must be in (0, 180)"));
        }
        if !(near > 0.0 && far > near) {
            return Err(TwinviewError::validation(
                "camera planes must satisfy 0 < near < far",
            ));
        }
        let mut cam = Self {
            fov_deg,
            aspect: if aspect > 0.0 { aspect } else { 1.0 },
            near,
            far,
            position: DVec3::ZERO,
            target: DVec3::NEG_Z,
            projection: DMat4::IDENTITY,
        };
        cam.update_projection();
        Ok(cam)
    }

    /// Recompute the projection matrix from fov/aspect/near/far.
    pub fn update_projection(&mut self) {
        self.projection =
            DMat4::perspective_rh_gl(self.fov_deg.to_radians(), self.aspect, self.near, self.far);
    }

    /// Orient the camera toward `target`.
    pub fn look_at(&mut self, target: DVec3) {
        self.target = target;
    }

    /// Point the camera is oriented toward.
    pub fn target(&self) -> DVec3 {
        self.target
    }

    /// Current projection matrix.
    pub fn projection(&self) -> DMat4 {
        self.projection
    }

    /// World-to-view matrix.
    ///
    /// When the view direction is parallel to world up, `+Z` is used as the up hint instead.
    pub fn view(&self) -> DMat4 {
        let dir = self.target - self.position;
        if dir.length_squared() < 1e-18 {
            return DMat4::from_translation(-self.position);
        }
        let up = if dir.normalize().cross(DVec3::Y).length_squared() < 1e-12 {
            DVec3::Z
        } else {
            DVec3::Y
        };
        DMat4::look_at_rh(self.position, self.target, up)
    }

    /// `projection * view`.
    pub fn view_projection(&self) -> DMat4 {
        self.projection * self.view()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/camera.rs"]
mod tests;
