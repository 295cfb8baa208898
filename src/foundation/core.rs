use crate::foundation::error::{TwinviewError, TwinviewResult};

pub use glam::{DMat4, DVec3, DVec4};
pub use kurbo::Rect;

/// One component of a 3-vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// X component.
    X,
    /// Y component.
    Y,
    /// Z component.
    Z,
}

impl Axis {
    /// All axes in `x, y, z` order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Read this component of `v`.
    pub fn get(self, v: DVec3) -> f64 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }

    /// Write this component of `v`.
    pub fn set(self, v: &mut DVec3, value: f64) {
        match self {
            Self::X => v.x = value,
            Self::Y => v.y = value,
            Self::Z => v.z = value,
        }
    }

    /// Parse `"x"`, `"y"` or `"z"`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            _ => None,
        }
    }
}

/// Logical (CSS pixel) size of the drawable surface.
///
/// Written only by the resize handler; read by viewport region and camera aspect computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Create a validated, non-empty surface size.
    pub fn new(width: u32, height: u32) -> TwinviewResult<Self> {
        if width == 0 || height == 0 {
            return Err(TwinviewError::validation(
                "SurfaceSize width and height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// `width / height`, the aspect every camera must carry.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }

    /// Size of the backing pixel buffer for a (capped) device pixel ratio.
    pub fn scaled(self, pixel_ratio: f64) -> (u32, u32) {
        let r = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        let w = (f64::from(self.width) * r).round().max(1.0) as u32;
        let h = (f64::from(self.height) * r).round().max(1.0) as u32;
        (w, h)
    }
}

/// A window resize notification as delivered by the windowing layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WindowSize {
    /// Inner width in logical pixels.
    pub width: u32,
    /// Inner height in logical pixels.
    pub height: u32,
    /// Physical pixels per logical pixel reported by the platform.
    pub device_pixel_ratio: f64,
}

/// Pixel rectangle in surface space, origin at the bottom-left corner (GL convention).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    /// Left edge.
    pub x: f64,
    /// Bottom edge, measured upward from the bottom of the surface.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Region {
    /// Region covering the whole surface.
    pub fn full(size: SurfaceSize) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: f64::from(size.width),
            height: f64::from(size.height),
        }
    }

    /// Multiply every edge by `factor` (logical to backing pixels).
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Return `true` when the region covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Convert to a top-left origin rectangle for a surface `surface_height` pixels tall.
    pub fn to_top_left(self, surface_height: f64) -> Rect {
        let top = surface_height - (self.y + self.height);
        Rect::new(self.x, top, self.x + self.width, top + self.height)
    }

    /// Integer pixel span `[x0, x1) x [y0, y1)` in top-left coordinates, clipped to the surface.
    pub fn pixel_bounds(self, surface_w: u32, surface_h: u32) -> (u32, u32, u32, u32) {
        let r = self.to_top_left(f64::from(surface_h));
        let clip = |v: f64, max: u32| v.round().clamp(0.0, f64::from(max)) as u32;
        let x0 = clip(r.x0, surface_w);
        let x1 = clip(r.x1, surface_w).max(x0);
        let y0 = clip(r.y0, surface_h);
        let y1 = clip(r.y1, surface_h).max(y0);
        (x0, y0, x1, y1)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Opaque color from 8-bit channels.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Byte array in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear blend toward `other` by `t` in `[0, 1]`.
    pub fn mix(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let m = |a: u8, b: u8| {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Self {
            r: m(self.r, other.r),
            g: m(self.g, other.g),
            b: m(self.b, other.b),
            a: m(self.a, other.a),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
