use std::sync::mpsc;
use std::time::Duration;

use crate::assets::resolver::PendingModels;
use crate::config::StageConfig;
use crate::foundation::core::WindowSize;
use crate::foundation::error::TwinviewResult;
use crate::render::backend::Renderer;
use crate::session::render_loop::{FrameReport, FrameScheduler, RenderLoop, StopToken};
use crate::session::resize::ResizeHandler;
use crate::stage::Stage;
use crate::timeline::section::TimelineDef;
use crate::timeline::timeline::Timeline;
use crate::timeline::trigger::{MotionPreference, ScrollBinding, ScrollTrigger};

/// Input delivered to the event loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AppEvent {
    Resize(WindowSize),
    /// Page scroll offset in pixels.
    Scroll { offset: f64 },
    Quit,
}

/// Input delivered to [`App::run`], polled once before every frame.
pub trait EventSource {
    /// Events that arrived since the previous poll, in order.
    fn poll_events(&mut self) -> Vec<AppEvent>;
}

impl EventSource for mpsc::Receiver<AppEvent> {
    fn poll_events(&mut self) -> Vec<AppEvent> {
        self.try_iter().collect()
    }
}

/// Single-threaded cooperative loop tying assets, timeline, input and rendering together.
///
/// Asset completion is polled once per frame. Until it arrives the stage renders as is and
/// scroll offsets are only remembered; once it arrives the timeline is built and, if motion is
/// allowed, bound to scroll and fast-forwarded to the last offset.
pub struct App<R: Renderer> {
    stage: Stage,
    renderer: R,
    resize: ResizeHandler,
    pending: Option<PendingModels>,
    timeline_def: TimelineDef,
    trigger: ScrollTrigger,
    motion: Option<MotionPreference>,
    binding: Option<ScrollBinding>,
    timeline_built: bool,
    scroll_y: f64,
    frames: u64,
}

impl<R: Renderer> App<R> {
    /// Build the stage from `cfg` and size `renderer` to the configured surface and pixel ratio.
    pub fn new(
        cfg: &StageConfig,
        mut renderer: R,
        pending: PendingModels,
        motion: Option<MotionPreference>,
    ) -> TwinviewResult<Self> {
        let mut stage = Stage::from_config(cfg)?;
        let resize = ResizeHandler::new(cfg.pixel_ratio_cap);
        resize.handle(
            &mut stage,
            &mut renderer,
            WindowSize {
                width: cfg.surface.width,
                height: cfg.surface.height,
                device_pixel_ratio: cfg.device_pixel_ratio,
            },
        )?;
        Ok(Self {
            stage,
            renderer,
            resize,
            pending: Some(pending),
            timeline_def: cfg.timeline.clone(),
            trigger: cfg.trigger,
            motion,
            binding: None,
            timeline_built: false,
            scroll_y: 0.0,
            frames: 0,
        })
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Scroll binding, present once assets resolved and motion is allowed.
    pub fn binding(&self) -> Option<&ScrollBinding> {
        self.binding.as_ref()
    }

    /// `true` once the asset batch arrived and the timeline was built.
    pub fn is_ready(&self) -> bool {
        self.timeline_built
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Apply one input event. Returns `false` on [`AppEvent::Quit`].
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Resize(window) => {
                if let Err(e) = self.resize.handle(&mut self.stage, &mut self.renderer, window) {
                    tracing::warn!(error = %e, "resize failed");
                }
            }
            AppEvent::Scroll { offset } => {
                self.scroll_y = offset;
                if let Some(binding) = &self.binding {
                    binding.on_scroll(&mut self.stage, offset);
                }
            }
            AppEvent::Quit => return false,
        }
        true
    }

    /// Check whether the asset batch finished and, if so, build the timeline.
    pub fn poll_assets(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let Some(resolved) = pending.try_take() else {
            if pending.is_done() {
                self.pending = None;
            }
            return;
        };
        self.pending = None;

        let entities = self.stage.populate(resolved);
        match Timeline::build(&mut self.stage, &entities, &self.timeline_def) {
            Ok(timeline) => {
                self.timeline_built = true;
                self.binding = ScrollBinding::bind(timeline, self.trigger, self.motion);
                if let Some(binding) = &self.binding {
                    binding.on_scroll(&mut self.stage, self.scroll_y);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "timeline build failed; scene stays static");
            }
        }
    }

    /// Poll assets, then draw one frame.
    pub fn frame(&mut self, elapsed: Duration) -> FrameReport {
        self.poll_assets();
        self.frames += 1;
        RenderLoop::render_frame(&mut self.stage, &mut self.renderer, elapsed)
    }

    /// Apply pending events before every frame until the scheduler stops, the token is
    /// stopped or a [`AppEvent::Quit`] arrives. Returns frames drawn in this call.
    pub fn run(
        &mut self,
        events: &mut dyn EventSource,
        scheduler: &mut dyn FrameScheduler,
        token: &StopToken,
    ) -> u64 {
        let start = self.frames;
        tracing::info!("event loop started");
        'outer: while let Some(elapsed) = scheduler.next_frame(token) {
            for ev in events.poll_events() {
                if !self.handle_event(ev) {
                    token.stop();
                    break 'outer;
                }
            }
            self.frame(elapsed);
        }
        tracing::info!(frames = self.frames - start, "event loop stopped");
        self.frames - start
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/app.rs"]
mod tests;
