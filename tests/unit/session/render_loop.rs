use super::*;
use crate::config::StageConfig;
use crate::foundation::core::{DVec3, SurfaceSize};
use crate::foundation::error::{TwinviewError, TwinviewResult};
use crate::render::backend::FrameRGBA;
use crate::scene::graph::{SceneGraph, SceneKind};
use crate::view::camera::PerspectiveCamera;

#[derive(Debug, PartialEq)]
enum Call {
    Viewport(Region),
    Scissor(Region),
    ScissorTest(bool),
    Render { wireframe: bool, target: DVec3 },
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
    fail_wireframe: bool,
}

impl Renderer for Recorder {
    fn resize(&mut self, _size: SurfaceSize, _pixel_ratio: f64) -> TwinviewResult<()> {
        Ok(())
    }
    fn set_viewport(&mut self, region: Region) {
        self.calls.push(Call::Viewport(region));
    }
    fn set_scissor(&mut self, region: Region) {
        self.calls.push(Call::Scissor(region));
    }
    fn set_scissor_test(&mut self, enabled: bool) {
        self.calls.push(Call::ScissorTest(enabled));
    }
    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> TwinviewResult<()> {
        let wireframe = scene.override_material.is_some();
        self.calls.push(Call::Render {
            wireframe,
            target: camera.target(),
        });
        if wireframe && self.fail_wireframe {
            return Err(TwinviewError::render("boom"));
        }
        Ok(())
    }
    fn read_frame(&self) -> TwinviewResult<FrameRGBA> {
        Err(TwinviewError::render("recorder has no pixels"))
    }
}

fn stage() -> Stage {
    Stage::from_config(&StageConfig::default()).unwrap()
}

#[test]
fn one_scissored_draw_per_viewport_in_order() {
    let mut stage = stage();
    stage.viewports.get_mut(1).unwrap().height = 0.5;
    let mut r = Recorder::default();
    let report = RenderLoop::render_frame(&mut stage, &mut r, Duration::ZERO);
    assert_eq!(report, FrameReport { draws: 2, failures: 0 });

    let full = Region::full(stage.surface());
    let target = DVec3::new(0.0, 3.0, 0.0);
    assert_eq!(
        r.calls,
        vec![
            Call::Viewport(full),
            Call::Scissor(full),
            Call::ScissorTest(true),
            Call::Render {
                wireframe: false,
                target
            },
            Call::Viewport(full),
            Call::Scissor(Region {
                x: 0.0,
                y: 0.0,
                width: 1280.0,
                height: 360.0
            }),
            Call::ScissorTest(true),
            Call::Render {
                wireframe: true,
                target
            },
        ]
    );
}

#[test]
fn cameras_follow_the_shared_target_each_frame() {
    let mut stage = stage();
    stage.look_at = DVec3::new(1.0, 2.0, 3.0);
    let mut r = Recorder::default();
    RenderLoop::render_frame(&mut stage, &mut r, Duration::ZERO);
    assert!(stage.cameras.iter().all(|c| c.target() == stage.look_at));
}

#[test]
fn failed_draw_does_not_stop_the_frame() {
    let mut stage = stage();
    let mut r = Recorder {
        fail_wireframe: true,
        ..Recorder::default()
    };
    let report = RenderLoop::render_frame(&mut stage, &mut r, Duration::ZERO);
    assert_eq!(report, FrameReport { draws: 2, failures: 1 });
}

#[test]
fn stop_token_ends_the_loop() {
    let mut stage = stage();
    let mut r = Recorder::default();
    let token = StopToken::new();
    let mut one = FixedFrames::new(1, Duration::from_millis(16));
    assert_eq!(RenderLoop::run(&mut stage, &mut r, &mut one, &token), 1);

    token.stop();
    let mut many = FixedFrames::new(10, Duration::from_millis(16));
    assert_eq!(RenderLoop::run(&mut stage, &mut r, &mut many, &token), 0);
}

#[test]
fn interval_scheduler_respects_stop() {
    let token = StopToken::new();
    let mut s = IntervalScheduler::new(Duration::from_millis(1));
    assert!(s.next_frame(&token).is_some());
    token.stop();
    assert!(s.next_frame(&token).is_none());
}

#[test]
fn scene_kind_matches_viewport() {
    let stage = stage();
    let kinds: Vec<SceneKind> = stage.viewports.iter().map(|v| v.scene).collect();
    assert_eq!(kinds, [SceneKind::Shaded, SceneKind::Wireframe]);
}
