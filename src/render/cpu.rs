use crate::foundation::core::{DMat4, DVec3, DVec4, Region, Rgba8Premul, SurfaceSize};
use crate::foundation::error::{TwinviewError, TwinviewResult};
use crate::render::backend::{FrameRGBA, Renderer};
use crate::scene::graph::{OverrideMaterial, SceneGraph};
use crate::view::camera::PerspectiveCamera;

const EXPOSURE: f64 = 2.0;
const SHADOW_ALPHA: u8 = 90;
const WIRE_WIDTH: f64 = 1.0;

/// Counters for the most recent draw call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Triangles submitted to the rasterizer after clipping.
    pub triangles: usize,
    /// Triangles projected onto shadow receivers.
    pub shadow_triangles: usize,
}

/// Software renderer built on `vello_cpu`.
///
/// Each draw is rasterized into a scratch pixmap and then copied into the shared surface
/// through the scissor rectangle, so pixels outside the scissor are never touched.
/// Shaded scenes are painter-sorted per triangle with ground receivers drawn first.
pub struct CpuRenderer {
    size: SurfaceSize,
    pixel_ratio: f64,
    viewport: Region,
    scissor: Region,
    scissor_test: bool,
    surface: vello_cpu::Pixmap,
    scratch: Option<vello_cpu::Pixmap>,
    ctx: Option<vello_cpu::RenderContext>,
    last: DrawStats,
}

impl CpuRenderer {
    /// Create a renderer with a transparent surface of `size` at pixel ratio 1.
    pub fn new(size: SurfaceSize) -> TwinviewResult<Self> {
        let (w, h) = backing_dims(size, 1.0)?;
        Ok(Self {
            size,
            pixel_ratio: 1.0,
            viewport: Region::full(size),
            scissor: Region::full(size),
            scissor_test: false,
            surface: vello_cpu::Pixmap::new(w, h),
            scratch: None,
            ctx: None,
            last: DrawStats::default(),
        })
    }

    /// Logical size.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Effective pixel ratio.
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Backing buffer dimensions.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            u32::from(self.surface.width()),
            u32::from(self.surface.height()),
        )
    }

    /// Stats of the last `render` call.
    pub fn last_stats(&self) -> DrawStats {
        self.last
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> R,
    ) -> R {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx);
        self.ctx = Some(ctx);
        out
    }
}

fn backing_dims(size: SurfaceSize, pixel_ratio: f64) -> TwinviewResult<(u16, u16)> {
    let (w, h) = size.scaled(pixel_ratio);
    let w = u16::try_from(w)
        .map_err(|_| TwinviewError::render(format!("surface width {w} exceeds u16")))?;
    let h = u16::try_from(h)
        .map_err(|_| TwinviewError::render(format!("surface height {h} exceeds u16")))?;
    Ok((w.max(1), h.max(1)))
}

impl Renderer for CpuRenderer {
    fn resize(&mut self, size: SurfaceSize, pixel_ratio: f64) -> TwinviewResult<()> {
        if !(pixel_ratio.is_finite() && pixel_ratio > 0.0) {
            return Err(TwinviewError::validation("pixel ratio must be finite and > 0"));
        }
        let (w, h) = backing_dims(size, pixel_ratio)?;

        self.size = size;
        self.pixel_ratio = pixel_ratio;
        self.viewport = Region::full(size);
        self.scissor = Region::full(size);
        if self.surface.width() != w || self.surface.height() != h {
            tracing::debug!(width = w, height = h, "surface reallocated");
            self.surface = vello_cpu::Pixmap::new(w, h);
            self.scratch = None;
            self.ctx = None;
        }
        Ok(())
    }

    fn set_viewport(&mut self, region: Region) {
        self.viewport = region;
    }

    fn set_scissor(&mut self, region: Region) {
        self.scissor = region;
    }

    fn set_scissor_test(&mut self, enabled: bool) {
        self.scissor_test = enabled;
    }

    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> TwinviewResult<()> {
        let (w, h) = (self.surface.width(), self.surface.height());
        let (sw, sh) = (u32::from(w), u32::from(h));
        let bounds = if self.scissor_test {
            self.scissor.scale(self.pixel_ratio).pixel_bounds(sw, sh)
        } else {
            (0, 0, sw, sh)
        };
        if bounds.0 >= bounds.2 || bounds.1 >= bounds.3 {
            self.last = DrawStats::default();
            return Ok(());
        }

        let view = ViewMapping {
            region: self.viewport.scale(self.pixel_ratio),
            surface_height: f64::from(h),
            view_proj: camera.view_projection(),
            eye: camera.position,
        };
        let frame = match scene.override_material {
            Some(OverrideMaterial::Wireframe { color }) => wireframe_draw(scene, &view, color),
            None => shaded_draw(scene, &view),
        };
        let stats = frame.stats;

        let mut scratch = match self.scratch.take() {
            Some(p) if p.width() == w && p.height() == h => p,
            _ => vello_cpu::Pixmap::new(w, h),
        };
        let stroke_width = WIRE_WIDTH * self.pixel_ratio;
        self.with_ctx_mut(w, h, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            set_color(ctx, scene.background, 255);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
            frame.paint(ctx, stroke_width);
            ctx.flush();
            ctx.render_to_pixmap(&mut scratch);
        });

        copy_bounds(&mut self.surface, &scratch, bounds);
        self.scratch = Some(scratch);
        self.last = stats;
        tracing::trace!(
            triangles = stats.triangles,
            shadows = stats.shadow_triangles,
            "draw"
        );
        Ok(())
    }

    fn read_frame(&self) -> TwinviewResult<FrameRGBA> {
        Ok(FrameRGBA {
            width: u32::from(self.surface.width()),
            height: u32::from(self.surface.height()),
            data: self.surface.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn set_color(ctx: &mut vello_cpu::RenderContext, c: Rgba8Premul, alpha: u8) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, alpha));
}

/// Copy `[x0, x1) x [y0, y1)` of `src` into `dst`. Both pixmaps share dimensions.
fn copy_bounds(
    dst: &mut vello_cpu::Pixmap,
    src: &vello_cpu::Pixmap,
    (x0, y0, x1, y1): (u32, u32, u32, u32),
) {
    let stride = usize::from(dst.width()) * 4;
    let (a, b) = (x0 as usize * 4, x1 as usize * 4);
    let src = src.data_as_u8_slice();
    let dst = dst.data_as_u8_slice_mut();
    for y in y0 as usize..y1 as usize {
        let row = y * stride;
        if let (Some(d), Some(s)) = (dst.get_mut(row + a..row + b), src.get(row + a..row + b)) {
            d.copy_from_slice(s);
        }
    }
}

/// Clip space to backing-pixel mapping for one draw.
struct ViewMapping {
    region: Region,
    surface_height: f64,
    view_proj: DMat4,
    eye: DVec3,
}

impl ViewMapping {
    /// Project a world triangle, clipped against the near plane, to top-left pixel space.
    fn project(&self, tri: &[DVec3; 3]) -> Vec<(f64, f64)> {
        let clip: Vec<DVec4> = tri
            .iter()
            .map(|p| self.view_proj * p.extend(1.0))
            .collect();
        clip_near(&clip)
            .into_iter()
            .map(|c| {
                let nx = c.x / c.w;
                let ny = c.y / c.w;
                let x = self.region.x + (nx + 1.0) * 0.5 * self.region.width;
                let y_up = self.region.y + (ny + 1.0) * 0.5 * self.region.height;
                (x, self.surface_height - y_up)
            })
            .collect()
    }
}

/// Sutherland-Hodgman against the GL near plane `z + w >= 0`.
fn clip_near(poly: &[DVec4]) -> Vec<DVec4> {
    let dist = |v: &DVec4| v.z + v.w;
    let mut out = Vec::with_capacity(poly.len() + 2);
    for i in 0..poly.len() {
        let cur = poly[i];
        let next = poly[(i + 1) % poly.len()];
        let (dc, dn) = (dist(&cur), dist(&next));
        if dc >= 0.0 {
            out.push(cur);
        }
        if (dc >= 0.0) != (dn >= 0.0) {
            let t = dc / (dc - dn);
            out.push(cur + (next - cur) * t);
        }
    }
    if out.len() < 3 { Vec::new() } else { out }
}

fn polygon_path(poly: &[(f64, f64)], path: &mut vello_cpu::kurbo::BezPath) {
    let Some(&(x, y)) = poly.first() else {
        return;
    };
    path.move_to((x, y));
    for &(x, y) in &poly[1..] {
        path.line_to((x, y));
    }
    path.close_path();
}

struct ShadedPoly {
    layer: u8,
    depth: f64,
    color: Rgba8Premul,
    points: Vec<(f64, f64)>,
}

enum FrameDraw {
    Shaded {
        ground: Vec<ShadedPoly>,
        shadow: Option<vello_cpu::kurbo::BezPath>,
        rest: Vec<ShadedPoly>,
    },
    Wire {
        edges: vello_cpu::kurbo::BezPath,
        color: Rgba8Premul,
    },
}

struct PreparedFrame {
    draw: FrameDraw,
    stats: DrawStats,
}

impl PreparedFrame {
    fn paint(&self, ctx: &mut vello_cpu::RenderContext, stroke_width: f64) {
        match &self.draw {
            FrameDraw::Shaded {
                ground,
                shadow,
                rest,
            } => {
                let fill = |ctx: &mut vello_cpu::RenderContext, polys: &[ShadedPoly]| {
                    for p in polys {
                        let mut path = vello_cpu::kurbo::BezPath::new();
                        polygon_path(&p.points, &mut path);
                        set_color(ctx, p.color, 255);
                        ctx.fill_path(&path);
                    }
                };
                fill(ctx, ground.as_slice());
                if let Some(path) = shadow {
                    set_color(ctx, Rgba8Premul::opaque(0, 0, 0), SHADOW_ALPHA);
                    ctx.fill_path(path);
                }
                fill(ctx, rest.as_slice());
            }
            FrameDraw::Wire { edges, color } => {
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(stroke_width));
                set_color(ctx, *color, 255);
                ctx.stroke_path(edges);
            }
        }
    }
}

fn wireframe_draw(scene: &SceneGraph, view: &ViewMapping, color: Rgba8Premul) -> PreparedFrame {
    let mut edges = vello_cpu::kurbo::BezPath::new();
    let mut stats = DrawStats::default();
    scene.visit_meshes(|node, world| {
        let Some(mesh) = node.mesh.as_deref() else {
            return;
        };
        for tri in mesh.triangle_positions() {
            let tri = tri.map(|p| world.transform_point3(p));
            let poly = view.project(&tri);
            if !poly.is_empty() {
                polygon_path(&poly, &mut edges);
                stats.triangles += 1;
            }
        }
    });
    PreparedFrame {
        draw: FrameDraw::Wire { edges, color },
        stats,
    }
}

fn shaded_draw(scene: &SceneGraph, view: &ViewMapping) -> PreparedFrame {
    let mut stats = DrawStats::default();
    let mut polys = Vec::<ShadedPoly>::new();
    let mut casters = Vec::<[DVec3; 3]>::new();
    let mut has_receiver = false;

    scene.visit_meshes(|node, world| {
        let Some(mesh) = node.mesh.as_deref() else {
            return;
        };
        has_receiver |= node.receive_shadow;
        let base = mesh.color.to_rgba8_premul();
        // Receivers that cast nothing are ground: drawn before everything else.
        let layer = u8::from(node.cast_shadow || !node.receive_shadow);
        for tri in mesh.triangle_positions() {
            let tri = tri.map(|p| world.transform_point3(p));
            if node.cast_shadow {
                casters.push(tri);
            }
            let points = view.project(&tri);
            if points.is_empty() {
                continue;
            }
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            let depth = centroid.distance(view.eye);
            let color = shade(scene, base, &tri, view.eye, depth);
            polys.push(ShadedPoly {
                layer,
                depth,
                color,
                points,
            });
        }
    });

    polys.sort_by(|a, b| {
        a.layer
            .cmp(&b.layer)
            .then(b.depth.total_cmp(&a.depth))
    });
    let split = polys.partition_point(|p| p.layer == 0);
    let rest = polys.split_off(split);
    stats.triangles = polys.len() + rest.len();

    let shadow = match scene.directional {
        Some(light) if light.cast_shadow && has_receiver && !casters.is_empty() => {
            let dir = -light.position.normalize_or_zero();
            if dir.y < -1e-6 {
                let mut path = vello_cpu::kurbo::BezPath::new();
                for tri in &casters {
                    let flat = tri.map(|p| p - dir * (p.y / dir.y) + DVec3::Y * 1e-3);
                    let poly = view.project(&flat);
                    if !poly.is_empty() {
                        polygon_path(&poly, &mut path);
                        stats.shadow_triangles += 1;
                    }
                }
                Some(path)
            } else {
                None
            }
        }
        _ => None,
    };

    PreparedFrame {
        draw: FrameDraw::Shaded {
            ground: polys,
            shadow,
            rest,
        },
        stats,
    }
}

/// Two-sided lambert + hemisphere lighting, Reinhard tone mapping, then linear fog.
fn shade(
    scene: &SceneGraph,
    base: Rgba8Premul,
    tri: &[DVec3; 3],
    eye: DVec3,
    distance: f64,
) -> Rgba8Premul {
    let mut n = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero();
    if n.dot(eye - tri[0]) < 0.0 {
        n = -n;
    }

    let mut light = DVec3::ZERO;
    if let Some(hemi) = scene.hemisphere {
        let t = n.y * 0.5 + 0.5;
        light += rgb(hemi.ground).lerp(rgb(hemi.sky), t) * hemi.intensity;
    }
    if let Some(dir) = scene.directional {
        let l = dir.position.normalize_or_zero();
        light += rgb(dir.color) * dir.intensity * n.dot(l).max(0.0);
    }
    if scene.hemisphere.is_none() && scene.directional.is_none() {
        light = DVec3::ONE;
    }

    let lit = rgb(base) * light * EXPOSURE;
    let toned = lit / (DVec3::ONE + lit);
    let mut out = Rgba8Premul::opaque(
        (toned.x * 255.0).round().clamp(0.0, 255.0) as u8,
        (toned.y * 255.0).round().clamp(0.0, 255.0) as u8,
        (toned.z * 255.0).round().clamp(0.0, 255.0) as u8,
    );
    if let Some(fog) = scene.fog {
        out = out.mix(fog.color, fog.factor(distance));
    }
    out
}

fn rgb(c: Rgba8Premul) -> DVec3 {
    DVec3::new(f64::from(c.r), f64::from(c.g), f64::from(c.b)) / 255.0
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
