use crate::{
    animation::ease::Ease,
    foundation::error::{TwinviewError, TwinviewResult},
};

/// Interpolation contract for animated value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with factor `t`. `t` may leave `[0, 1]` for overshooting eases.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// A single `from -> to` change placed on a timeline at `[start, start + duration]`.
///
/// Time here is timeline time (one unit per section), not seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween<T> {
    /// Timeline time at which the tween begins.
    pub start: f64,
    /// Length in timeline units. Zero means an instantaneous set at `start`.
    pub duration: f64,
    /// Value at `start`.
    pub from: T,
    /// Value at `start + duration`.
    pub to: T,
    /// Easing curve applied to local progress.
    pub ease: Ease,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    /// Validate that the placement is finite and non-negative.
    pub fn validate(&self) -> TwinviewResult<()> {
        if !self.start.is_finite() || self.start < 0.0 {
            return Err(TwinviewError::animation("tween start must be finite and >= 0"));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(TwinviewError::animation(
                "tween duration must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// End of the tween in timeline time.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Return `true` once the playhead has reached the tween.
    pub fn has_started(&self, time: f64) -> bool {
        time >= self.start
    }

    /// Local progress in `[0, 1]` for a timeline time.
    pub fn local_progress(&self, time: f64) -> f64 {
        if self.duration <= 0.0 {
            return if time >= self.start { 1.0 } else { 0.0 };
        }
        ((time - self.start) / self.duration).clamp(0.0, 1.0)
    }

    /// Sample the tween at timeline time `time`, holding the end values outside the window.
    pub fn sample(&self, time: f64) -> T {
        let t = self.local_progress(time);
        if t <= 0.0 {
            return self.from.clone();
        }
        if t >= 1.0 {
            return self.to.clone();
        }
        T::lerp(&self.from, &self.to, self.ease.apply(t))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/anim.rs"]
mod tests;
