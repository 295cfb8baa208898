use std::str::FromStr;

use crate::stage::Stage;
use crate::timeline::timeline::{Snapshot, Timeline};

/// Environment variable consulted for the platform motion preference.
pub const MOTION_ENV: &str = "TWINVIEW_MOTION";

/// Scroll range of the page element the timeline is pinned to.
///
/// Progress runs from 0 when the element's top reaches the viewport top to 1 when its bottom
/// reaches the viewport bottom.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollTrigger {
    /// Element top in page pixels.
    #[serde(default)]
    pub top: f64,
    /// Element height in page pixels.
    pub height: f64,
}

impl ScrollTrigger {
    /// Scroll offset to progress in `[0, 1]`.
    pub fn progress(&self, scroll_y: f64, viewport_height: f64) -> f64 {
        let range = self.height - viewport_height;
        if !scroll_y.is_finite() {
            return 0.0;
        }
        if !(range > 0.0) {
            return if scroll_y >= self.top { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.top) / range).clamp(0.0, 1.0)
    }

    /// Scroll offset that produces `progress`.
    pub fn offset_for(&self, progress: f64, viewport_height: f64) -> f64 {
        let range = (self.height - viewport_height).max(0.0);
        self.top + progress.clamp(0.0, 1.0) * range
    }
}

/// User motion preference as reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotionPreference {
    NoPreference,
    Reduce,
}

impl FromStr for MotionPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no-preference" | "no_preference" | "full" => Ok(Self::NoPreference),
            "reduce" | "reduced" => Ok(Self::Reduce),
            other => Err(format!(
                "unknown motion preference \"{other}\" (expected no-preference or reduce)"
            )),
        }
    }
}

impl MotionPreference {
    /// Read [`MOTION_ENV`]. Unset or unparsable values yield `None`.
    pub fn from_env() -> Option<Self> {
        let raw = std::env::var(MOTION_ENV).ok()?;
        match raw.parse() {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring {MOTION_ENV}");
                None
            }
        }
    }

    /// Whether scroll-linked animation may run. An unknown preference counts as reduced.
    pub fn allows_motion(pref: Option<Self>) -> bool {
        match pref {
            Some(Self::NoPreference) => true,
            Some(Self::Reduce) => false,
            None => {
                tracing::warn!("motion preference unknown; scroll animation disabled");
                false
            }
        }
    }
}

/// A timeline attached to scroll input.
///
/// Only exists when motion is allowed; without one, scroll events change nothing.
#[derive(Clone, Debug)]
pub struct ScrollBinding {
    timeline: Timeline,
    trigger: ScrollTrigger,
}

impl ScrollBinding {
    /// Attach `timeline` to `trigger`, or return `None` when motion is not allowed.
    pub fn bind(
        timeline: Timeline,
        trigger: ScrollTrigger,
        preference: Option<MotionPreference>,
    ) -> Option<Self> {
        if !MotionPreference::allows_motion(preference) {
            tracing::info!("reduced motion: scroll timeline not attached");
            return None;
        }
        Some(Self { timeline, trigger })
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn trigger(&self) -> ScrollTrigger {
        self.trigger
    }

    /// Map a scroll offset to progress, evaluate and write the snapshot to the stage.
    pub fn on_scroll(&self, stage: &mut Stage, scroll_y: f64) -> Snapshot {
        let viewport_h = f64::from(stage.surface().height);
        let progress = self.trigger.progress(scroll_y, viewport_h);
        let snap = self.timeline.sample(progress);
        snap.apply(stage);
        tracing::trace!(scroll_y, progress, "scroll applied");
        snap
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/trigger.rs"]
mod tests;
