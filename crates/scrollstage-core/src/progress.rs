#![forbid(unsafe_code)]

//! Scroll progress math.
//!
//! Pure functions: the stateful tracker that subscribes to events lives in
//! `scrollstage-track`. Ratios are always clamped into `[0, 1]` — hosts
//! report overshoot offsets during elastic/bounce scrolling and the clamp is
//! the contract, not a convenience.

use serde::{Deserialize, Serialize};

use crate::geometry::RectPx;

/// Tuning for progress derivation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Ratio above which the page counts as "has scrolled".
    ///
    /// Distinguishes "at the very top" from "moved at all" without
    /// flickering on sub-pixel jitter at rest.
    pub epsilon: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { epsilon: 0.01 }
    }
}

/// A derived progress reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Normalized progress in `[0, 1]`.
    pub ratio: f64,
    /// Whether `ratio` exceeds the configured epsilon.
    pub past_threshold: bool,
}

impl ProgressSnapshot {
    /// Build a snapshot from a raw ratio, clamping and thresholding.
    #[must_use]
    pub fn from_ratio(ratio: f64, config: &ProgressConfig) -> Self {
        let ratio = clamp_unit(ratio);
        Self {
            ratio,
            past_threshold: ratio > config.epsilon,
        }
    }
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            ratio: 0.0,
            past_threshold: false,
        }
    }
}

/// Whole-document scroll progress.
///
/// `offset / (content_height - viewport_height)`, clamped. Content that fits
/// entirely in the viewport has no scrollable range; progress is 0 there.
#[must_use]
pub fn global_ratio(offset: f64, content_height: f64, viewport_height: f64) -> f64 {
    let range = content_height - viewport_height;
    if !(range > 0.0) {
        return 0.0;
    }
    clamp_unit(offset / range)
}

/// Progress through a single bounded region.
///
/// 0 when the region's top reaches the viewport top, 1 when its bottom
/// reaches the viewport top. `rect` is viewport-relative, so the reading is
/// simply how far the region has moved past the top edge. A zero-height
/// region is either not-yet-reached (0) or fully passed (1).
#[must_use]
pub fn bounded_ratio(rect: RectPx) -> f64 {
    if !(rect.height > 0.0) {
        return if rect.top() <= 0.0 { 1.0 } else { 0.0 };
    }
    clamp_unit(-rect.top() / rect.height)
}

/// Clamp into `[0, 1]`, mapping NaN to 0.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}
