use super::*;
use crate::config::StageConfig;
use crate::render::cpu::CpuRenderer;

fn setup() -> (Stage, CpuRenderer) {
    let stage = Stage::from_config(&StageConfig::default()).unwrap();
    let r = CpuRenderer::new(stage.surface()).unwrap();
    (stage, r)
}

#[test]
fn resize_updates_aspect_and_keeps_fov() {
    let (mut stage, mut r) = setup();
    let applied = ResizeHandler::default()
        .handle(
            &mut stage,
            &mut r,
            WindowSize {
                width: 800,
                height: 600,
                device_pixel_ratio: 1.0,
            },
        )
        .unwrap();
    assert!(applied);
    assert_eq!(stage.surface(), SurfaceSize::new(800, 600).unwrap());
    for cam in &stage.cameras {
        assert_eq!(cam.aspect, 800.0 / 600.0);
        assert_eq!(cam.fov_deg, 75.0);
    }
    assert_eq!(r.backing_size(), (800, 600));
}

#[test]
fn device_pixel_ratio_is_capped() {
    let (mut stage, mut r) = setup();
    ResizeHandler::new(2.0)
        .handle(
            &mut stage,
            &mut r,
            WindowSize {
                width: 100,
                height: 50,
                device_pixel_ratio: 3.0,
            },
        )
        .unwrap();
    assert_eq!(stage.pixel_ratio(), 2.0);
    assert_eq!(r.backing_size(), (200, 100));
}

#[test]
fn zero_area_resize_is_ignored() {
    let (mut stage, mut r) = setup();
    let before = stage.surface();
    let applied = ResizeHandler::default()
        .handle(
            &mut stage,
            &mut r,
            WindowSize {
                width: 0,
                height: 600,
                device_pixel_ratio: 1.0,
            },
        )
        .unwrap();
    assert!(!applied);
    assert_eq!(stage.surface(), before);
}

#[test]
fn rejected_resize_leaves_stage_and_renderer_in_step() {
    let (mut stage, mut r) = setup();
    let before = stage.surface();
    let aspects: Vec<f64> = stage.cameras.iter().map(|c| c.aspect).collect();

    let res = ResizeHandler::default().handle(
        &mut stage,
        &mut r,
        WindowSize {
            width: 40_000,
            height: 36,
            device_pixel_ratio: 2.0,
        },
    );
    assert!(res.is_err());

    assert_eq!(stage.surface(), before);
    assert_eq!(stage.pixel_ratio(), 1.0);
    let after: Vec<f64> = stage.cameras.iter().map(|c| c.aspect).collect();
    assert_eq!(after, aspects);
    assert_eq!(r.size(), before);
    assert_eq!(r.pixel_ratio(), 1.0);
    assert_eq!(r.backing_size(), (before.width, before.height));
}

#[test]
fn garbage_ratios_fall_back_to_one() {
    let h = ResizeHandler::new(f64::NAN);
    assert_eq!(h.pixel_ratio(1.5), 1.0);
    let h = ResizeHandler::new(2.0);
    assert_eq!(h.pixel_ratio(-3.0), 1.0);
    assert_eq!(h.pixel_ratio(1.5), 1.5);
}
