use crate::foundation::core::{Region, SurfaceSize};
use crate::foundation::error::{TwinviewError, TwinviewResult};
use crate::scene::graph::SceneGraph;
use crate::view::camera::PerspectiveCamera;

/// A rendered surface as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. The `premultiplied` flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, top row first.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)` with `y` measured from the top row.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        self.data
            .get(i..i + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Encode as PNG (straight alpha).
    pub fn write_png(&self, path: &std::path::Path) -> TwinviewResult<()> {
        let mut data = self.data.clone();
        if self.premultiplied {
            for px in data.chunks_exact_mut(4) {
                let a = px[3];
                if a != 0 && a != 255 {
                    for c in &mut px[..3] {
                        *c = ((u16::from(*c) * 255 + u16::from(a) / 2) / u16::from(a))
                            .min(255) as u8;
                    }
                }
            }
        }
        let img = image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| TwinviewError::render("frame buffer size mismatch"))?;
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| TwinviewError::render(format!("write {}: {e}", path.display())))
    }
}

/// Draw-call interface consumed by the render loop.
///
/// Rectangles are in logical pixels with a bottom-left origin. The viewport maps normalized
/// device coordinates; the scissor (when enabled) bounds every pixel a call may modify,
/// including its background clear.
pub trait Renderer {
    /// Resize the drawable surface to `size` at `pixel_ratio`; the backing buffer is
    /// `size * pixel_ratio`. On error the previous size and ratio stay in effect.
    fn resize(&mut self, size: SurfaceSize, pixel_ratio: f64) -> TwinviewResult<()>;

    fn set_viewport(&mut self, region: Region);

    fn set_scissor(&mut self, region: Region);

    fn set_scissor_test(&mut self, enabled: bool);

    /// Draw `scene` through `camera` into the current viewport.
    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> TwinviewResult<()>;

    /// Copy the current surface contents.
    fn read_frame(&self) -> TwinviewResult<FrameRGBA>;
}
