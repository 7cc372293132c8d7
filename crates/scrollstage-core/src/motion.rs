#![forbid(unsafe_code)]

//! Easing curves and the programmatic smooth-scroll tween.
//!
//! Navigation chrome raises "scroll to section" intents; the engine answers
//! with a [`ScrollTween`] that maps elapsed time to a document offset. The
//! tween is sampled, never ticked: callers ask for the position at a clock
//! reading, so a dropped frame skews nothing.
//!
//! # Invariants
//!
//! 1. `position_at` is clamped: it never leaves the `[from, to]` interval.
//! 2. Zero or negative durations complete immediately (no division by zero).
//! 3. Progress is deterministic for a given start instant and clock reading.

use web_time::{Duration, Instant};

/// An easing curve mapping normalized time to normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// Fast start, gentle landing. The default for section jumps.
    #[default]
    EaseOutCubic,
    /// Gentle at both ends.
    EaseInOutCubic,
}

impl Easing {
    /// Apply the curve to a normalized time `t` in `[0, 1]`.
    ///
    /// Input outside the unit interval is clamped first.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// A time-parameterized scroll position between two offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTween {
    from: f64,
    to: f64,
    duration: Duration,
    easing: Easing,
    started: Instant,
}

impl ScrollTween {
    /// Begin a tween at `started`.
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration, started: Instant) -> Self {
        Self {
            from,
            to,
            duration,
            easing: Easing::default(),
            started,
        }
    }

    /// Override the easing curve.
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Target offset.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Normalized progress at `now`, clamped to `[0, 1]`.
    #[must_use]
    pub fn progress_at(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Document offset at `now`.
    #[must_use]
    pub fn position_at(&self, now: Instant) -> f64 {
        let eased = self.easing.apply(self.progress_at(now));
        self.from + (self.to - self.from) * eased
    }

    /// Whether the tween has reached its target at `now`.
    #[must_use]
    pub fn is_complete(&self, now: Instant) -> bool {
        self.progress_at(now) >= 1.0
    }
}
