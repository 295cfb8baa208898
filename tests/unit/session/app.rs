use super::*;
use crate::assets::model::builtin_model;
use crate::assets::resolver::ResolvedModels;
use crate::render::cpu::CpuRenderer;
use crate::session::render_loop::FixedFrames;

fn small_config() -> StageConfig {
    StageConfig {
        surface: crate::foundation::core::SurfaceSize {
            width: 64,
            height: 36,
        },
        ..StageConfig::default()
    }
}

fn loaded() -> PendingModels {
    PendingModels::ready(ResolvedModels {
        models: vec![
            ("witch".to_owned(), builtin_model("cone").unwrap()),
            ("bear".to_owned(), builtin_model("sphere").unwrap()),
        ],
        failures: Vec::new(),
    })
}

fn app(pending: PendingModels, motion: Option<MotionPreference>) -> App<CpuRenderer> {
    let cfg = small_config();
    let renderer = CpuRenderer::new(cfg.surface).unwrap();
    App::new(&cfg, renderer, pending, motion).unwrap()
}

fn witch_x(app: &App<CpuRenderer>) -> f64 {
    let scenes = &app.stage().scenes;
    let e = scenes.entity("witch").unwrap();
    scenes.channel(e, crate::scene::pair::Channel::Position).x
}

#[test]
fn first_frame_builds_and_binds_timeline() {
    let mut a = app(loaded(), Some(MotionPreference::NoPreference));
    assert!(!a.is_ready());
    let report = a.frame(Duration::ZERO);
    assert_eq!(report.draws, 2);
    assert!(a.is_ready());
    assert!(a.binding().is_some());
    assert_eq!(witch_x(&a), 6.0);
}

#[test]
fn scroll_before_assets_is_replayed_on_bind() {
    let mut a = app(loaded(), Some(MotionPreference::NoPreference));
    let trigger = small_config().trigger;
    let end_of_section_0 = trigger.offset_for(0.25, 36.0);
    a.handle_event(AppEvent::Scroll {
        offset: end_of_section_0,
    });
    a.frame(Duration::ZERO);
    assert!((witch_x(&a) - 1.0).abs() < 1e-9);
}

#[test]
fn reduced_motion_never_binds() {
    let mut a = app(loaded(), Some(MotionPreference::Reduce));
    a.frame(Duration::ZERO);
    assert!(a.is_ready());
    assert!(a.binding().is_none());
    a.handle_event(AppEvent::Scroll { offset: 2000.0 });
    a.frame(Duration::ZERO);
    assert_eq!(witch_x(&a), 6.0);
}

#[test]
fn run_stops_on_quit() {
    let mut a = app(loaded(), None);
    let (tx, mut rx) = mpsc::channel();
    tx.send(AppEvent::Resize(WindowSize {
        width: 32,
        height: 18,
        device_pixel_ratio: 1.0,
    }))
    .unwrap();
    let token = StopToken::new();
    let mut sched = FixedFrames::new(3, Duration::from_millis(16));
    assert_eq!(a.run(&mut rx, &mut sched, &token), 3);
    assert_eq!(a.stage().surface().width, 32);

    tx.send(AppEvent::Quit).unwrap();
    let mut sched = FixedFrames::new(3, Duration::from_millis(16));
    assert_eq!(a.run(&mut rx, &mut sched, &token), 0);
    assert!(token.is_stopped());
}

/// Hands out one batch of events per frame, then asks to quit.
struct Scripted {
    batches: std::collections::VecDeque<Vec<AppEvent>>,
    polls: usize,
}

impl EventSource for Scripted {
    fn poll_events(&mut self) -> Vec<AppEvent> {
        self.polls += 1;
        self.batches.pop_front().unwrap_or_else(|| vec![AppEvent::Quit])
    }
}

#[test]
fn run_polls_event_source_once_per_frame() {
    let mut a = app(loaded(), Some(MotionPreference::NoPreference));
    let trigger = small_config().trigger;
    let mut source = Scripted {
        batches: [0.0, 0.125, 0.25]
            .into_iter()
            .map(|p| {
                vec![AppEvent::Scroll {
                    offset: trigger.offset_for(p, 36.0),
                }]
            })
            .collect(),
        polls: 0,
    };
    let token = StopToken::new();
    let mut sched = FixedFrames::new(10, Duration::from_millis(16));
    assert_eq!(a.run(&mut source, &mut sched, &token), 3);
    assert_eq!(source.polls, 4);
    assert!(token.is_stopped());
    assert!((witch_x(&a) - 1.0).abs() < 1e-9);
}
