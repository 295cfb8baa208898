use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::foundation::core::Region;
use crate::render::backend::Renderer;
use crate::stage::Stage;

/// Cooperative cancellation flag shared between a loop and whoever wants it to end.
#[derive(Clone, Debug, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Request-next-frame primitive.
///
/// Blocks until the next frame is due and returns the elapsed time since the scheduler
/// started, or `None` once the token is stopped or the scheduler is exhausted.
pub trait FrameScheduler {
    fn next_frame(&mut self, token: &StopToken) -> Option<Duration>;
}

/// Fixed-interval scheduler standing in for display refresh.
#[derive(Debug)]
pub struct IntervalScheduler {
    start: Instant,
    next: Instant,
    interval: Duration,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            next: now,
            interval,
        }
    }

    /// 60 Hz.
    pub fn display_rate() -> Self {
        Self::new(Duration::from_micros(16_667))
    }
}

impl FrameScheduler for IntervalScheduler {
    fn next_frame(&mut self, token: &StopToken) -> Option<Duration> {
        if token.is_stopped() {
            return None;
        }
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
        }
        // Skip missed ticks instead of bursting to catch up.
        self.next = Instant::now().max(self.next) + self.interval;
        if token.is_stopped() {
            return None;
        }
        Some(self.start.elapsed())
    }
}

/// Yields exactly `frames` frames without sleeping, advancing a synthetic clock.
#[derive(Clone, Debug)]
pub struct FixedFrames {
    remaining: u64,
    elapsed: Duration,
    step: Duration,
}

impl FixedFrames {
    pub fn new(frames: u64, step: Duration) -> Self {
        Self {
            remaining: frames,
            elapsed: Duration::ZERO,
            step,
        }
    }
}

impl FrameScheduler for FixedFrames {
    fn next_frame(&mut self, token: &StopToken) -> Option<Duration> {
        if token.is_stopped() || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let now = self.elapsed;
        self.elapsed += self.step;
        Some(now)
    }
}

/// What one frame did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Render calls issued.
    pub draws: usize,
    /// Render calls that failed (logged, not fatal).
    pub failures: usize,
}

/// Per-frame compositor: one scissored draw per viewport, in list order.
pub struct RenderLoop;

impl RenderLoop {
    /// Draw one frame of `stage`.
    ///
    /// Regions are recomputed from the current surface size and fractions, every camera is
    /// pointed at the shared look-at target, then each viewport draws into its own scissor
    /// band of the shared surface. `elapsed` is available for per-frame effects only; it
    /// never drives the timeline.
    pub fn render_frame(
        stage: &mut Stage,
        renderer: &mut dyn Renderer,
        elapsed: Duration,
    ) -> FrameReport {
        let size = stage.surface();
        let regions = stage.viewports.compute_regions(size);
        let target = stage.look_at;
        for cam in &mut stage.cameras {
            cam.look_at(target);
        }

        let mut report = FrameReport::default();
        for (i, (view, region)) in stage.viewports.iter().zip(regions).enumerate() {
            let Some(camera) = stage.cameras.get(view.camera) else {
                tracing::warn!(viewport = i, camera = view.camera, "viewport camera missing");
                report.failures += 1;
                continue;
            };
            renderer.set_viewport(Region::full(size));
            renderer.set_scissor(region);
            renderer.set_scissor_test(true);
            report.draws += 1;
            if let Err(e) = renderer.render(stage.scene(view.scene), camera) {
                tracing::warn!(viewport = i, error = %e, "viewport draw failed");
                report.failures += 1;
            }
        }
        tracing::trace!(
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            draws = report.draws,
            "frame"
        );
        report
    }

    /// Render frames until the scheduler stops. Returns the number of frames drawn.
    pub fn run(
        stage: &mut Stage,
        renderer: &mut dyn Renderer,
        scheduler: &mut dyn FrameScheduler,
        token: &StopToken,
    ) -> u64 {
        let mut frames = 0;
        while let Some(elapsed) = scheduler.next_frame(token) {
            Self::render_frame(stage, renderer, elapsed);
            frames += 1;
        }
        frames
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_loop.rs"]
mod tests;
