use super::*;
use crate::assets::model::builtin_model;
use crate::scene::graph::{DirectionalLight, SceneGraph};

const WHITE: Rgba8Premul = Rgba8Premul {
    r: 255,
    g: 255,
    b: 255,
    a: 255,
};
const STEEL: Rgba8Premul = Rgba8Premul {
    r: 70,
    g: 130,
    b: 180,
    a: 255,
};

fn size(w: u32, h: u32) -> SurfaceSize {
    SurfaceSize::new(w, h).unwrap()
}

fn camera(aspect: f64) -> PerspectiveCamera {
    let mut cam = PerspectiveCamera::new(75.0, aspect, 0.1, 100.0).unwrap();
    cam.position = DVec3::new(0.0, 1.0, 4.0);
    cam.look_at(DVec3::new(0.0, 0.5, 0.0));
    cam
}

fn band(y: f64, height: f64, width: f64) -> Region {
    Region {
        x: 0.0,
        y,
        width,
        height,
    }
}

#[test]
fn background_fills_whole_surface_without_scissor() {
    let mut r = CpuRenderer::new(size(16, 8)).unwrap();
    r.render(&SceneGraph::new(WHITE), &camera(2.0)).unwrap();
    let f = r.read_frame().unwrap();
    assert_eq!((f.width, f.height), (16, 8));
    assert!(f.premultiplied);
    assert_eq!(f.pixel(0, 0), Some(WHITE.to_array()));
    assert_eq!(f.pixel(15, 7), Some(WHITE.to_array()));
}

#[test]
fn scissor_limits_writes_to_its_band() {
    let mut r = CpuRenderer::new(size(16, 8)).unwrap();
    r.render(&SceneGraph::new(WHITE), &camera(2.0)).unwrap();

    // Bottom half only (bottom-left origin), overlapping the first draw.
    r.set_viewport(band(0.0, 8.0, 16.0));
    r.set_scissor(band(0.0, 4.0, 16.0));
    r.set_scissor_test(true);
    r.render(&SceneGraph::new(STEEL), &camera(2.0)).unwrap();

    let f = r.read_frame().unwrap();
    for x in [0, 7, 15] {
        assert_eq!(f.pixel(x, 0), Some(WHITE.to_array()));
        assert_eq!(f.pixel(x, 3), Some(WHITE.to_array()));
        assert_eq!(f.pixel(x, 4), Some(STEEL.to_array()));
        assert_eq!(f.pixel(x, 7), Some(STEEL.to_array()));
    }
}

#[test]
fn empty_scissor_draws_nothing() {
    let mut r = CpuRenderer::new(size(4, 4)).unwrap();
    r.set_scissor(band(0.0, 0.0, 4.0));
    r.set_scissor_test(true);
    r.render(&SceneGraph::new(WHITE), &camera(1.0)).unwrap();
    let f = r.read_frame().unwrap();
    assert!(f.data.iter().all(|&b| b == 0));
}

#[test]
fn pixel_ratio_scales_backing_buffer() {
    let mut r = CpuRenderer::new(size(10, 5)).unwrap();
    r.resize(size(10, 5), 2.0).unwrap();
    assert_eq!(r.backing_size(), (20, 10));
    r.resize(size(30, 10), 2.0).unwrap();
    assert_eq!(r.backing_size(), (60, 20));
    assert!(r.resize(size(30, 10), 0.0).is_err());
    assert_eq!(r.pixel_ratio(), 2.0);
}

#[test]
fn oversized_surface_is_rejected_without_changes() {
    let mut r = CpuRenderer::new(size(10, 10)).unwrap();
    assert!(r.resize(size(70_000, 10), 1.0).is_err());
    // Fits at ratio 1 but not at 2.
    assert!(r.resize(size(40_000, 10), 2.0).is_err());
    assert_eq!(r.size(), size(10, 10));
    assert_eq!(r.pixel_ratio(), 1.0);
    assert_eq!(r.backing_size(), (10, 10));
}

#[test]
fn mesh_in_front_of_camera_is_drawn() {
    let mut scene = SceneGraph::new(WHITE);
    scene.add(None, &builtin_model("box").unwrap());
    let mut r = CpuRenderer::new(size(32, 32)).unwrap();
    r.render(&scene, &camera(1.0)).unwrap();
    assert_eq!(r.last_stats().triangles, 12);

    let f = r.read_frame().unwrap();
    assert_ne!(f.pixel(16, 16), Some(WHITE.to_array()));
}

#[test]
fn mesh_behind_camera_is_clipped() {
    let mut scene = SceneGraph::new(WHITE);
    let mut model = builtin_model("box").unwrap();
    model.transform.position = DVec3::new(0.0, 0.0, 10.0);
    scene.add(None, &model);
    let mut r = CpuRenderer::new(size(8, 8)).unwrap();
    r.render(&scene, &camera(1.0)).unwrap();
    assert_eq!(r.last_stats().triangles, 0);
}

#[test]
fn wireframe_override_strokes_edges() {
    let mut scene = SceneGraph::new(STEEL);
    scene.override_material = Some(OverrideMaterial::Wireframe { color: WHITE });
    scene.add(None, &builtin_model("box").unwrap());
    let mut r = CpuRenderer::new(size(32, 32)).unwrap();
    r.render(&scene, &camera(1.0)).unwrap();
    assert_eq!(r.last_stats().triangles, 12);
    assert_eq!(r.last_stats().shadow_triangles, 0);

    let f = r.read_frame().unwrap();
    // Corners stay background.
    assert_eq!(f.pixel(0, 0), Some(STEEL.to_array()));
}

#[test]
fn casters_project_shadows_onto_receivers() {
    let mut scene = SceneGraph::new(WHITE);
    scene.directional = Some(DirectionalLight {
        color: WHITE,
        intensity: 2.0,
        position: DVec3::new(2.0, 5.0, 3.0),
        cast_shadow: true,
    });
    let mut caster = builtin_model("box").unwrap();
    caster.set_shadows(true, true);
    scene.add(None, &caster);

    let mut r = CpuRenderer::new(size(16, 16)).unwrap();
    r.render(&scene, &camera(1.0)).unwrap();
    assert_eq!(r.last_stats().shadow_triangles, 12);
}

#[test]
fn png_export_writes_a_file() {
    let mut r = CpuRenderer::new(size(4, 4)).unwrap();
    r.render(&SceneGraph::new(STEEL), &camera(1.0)).unwrap();
    let path = std::env::temp_dir().join(format!("twinview-cpu-{}.png", std::process::id()));
    r.read_frame().unwrap().write_png(&path).unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(1, 1).0, STEEL.to_array());
    std::fs::remove_file(&path).unwrap();
}
