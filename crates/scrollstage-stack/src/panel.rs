#![forbid(unsafe_code)]

//! The stacked-panel state machine.
//!
//! N full-viewport panels stack in z-order equal to their index. Each panel
//! occupies one viewport-height slot in document flow; the document offset
//! into the stack decides every panel's state:
//!
//! - `Below` — the panel's slot has not been reached.
//! - `Pinned` — the panel sits at the viewport top. Exactly one panel is
//!   pinned for any settled offset.
//! - `Covered` — a later panel has pinned on top of it.
//!
//! There is no transform interpolation; state is a pure function of offset,
//! so a momentum fling that skips panels still lands on the correct final
//! state once the offset settles.
//!
//! Wheel input is routed through [`arbitrate`]: a pinned-at-rest panel with
//! inner overflow drains (or unwinds) it before the outer offset moves.
//! [`apply_wheel`](PanelStack::apply_wheel) walks zone by zone so one large
//! delta can drain a panel, advance the stack, and start draining the next
//! panel in a single call.

use serde::{Deserialize, Serialize};

use crate::StackError;
use crate::arbitrate::arbitrate;

/// Tolerance for "at rest" and boundary comparisons, in pixels.
const REST_EPS: f64 = 1e-6;

/// Lifecycle state of one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelState {
    /// Not yet reached; sits below the viewport in normal flow.
    Below,
    /// Pinned at the viewport top, receiving scroll-through interaction.
    Pinned,
    /// Still pinned underneath, visually obscured by a later panel.
    Covered,
}

/// How one wheel delta was spent.
///
/// `inner + outer + discarded == delta`. `discarded` is the remainder that
/// hit a document end (browsers drop it or rubber-band; the stack drops it).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelOutcome {
    /// Signed pixels consumed by panels' inner overflow regions.
    pub inner: f64,
    /// Signed pixels applied to the outer stack offset.
    pub outer: f64,
    /// Signed pixels dropped at the stack's ends.
    pub discarded: f64,
}

/// Immutable view of the stack for consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSnapshot {
    /// Outer offset into the stack.
    pub offset: f64,
    /// Index of the pinned panel, `None` for an empty stack.
    pub pinned: Option<usize>,
    /// Per-panel states, index-aligned.
    pub states: Vec<PanelState>,
}

/// Ordered stack of full-viewport panels with nested-scroll arbitration.
#[derive(Debug, Clone)]
pub struct PanelStack {
    content_heights: Vec<f64>,
    inner_offsets: Vec<f64>,
    viewport_height: f64,
    offset: f64,
}

impl PanelStack {
    /// Build a stack from per-panel content heights.
    ///
    /// Content height is the panel's scrollable content, which may exceed
    /// (inner overflow) or undershoot (sparse panel, down to zero) the
    /// viewport. Non-finite or negative heights are treated as zero.
    #[must_use]
    pub fn new(content_heights: impl IntoIterator<Item = f64>, viewport_height: f64) -> Self {
        let content_heights: Vec<f64> = content_heights
            .into_iter()
            .map(|h| if h.is_finite() { h.max(0.0) } else { 0.0 })
            .collect();
        let inner_offsets = vec![0.0; content_heights.len()];
        Self {
            content_heights,
            inner_offsets,
            viewport_height: sanitize_height(viewport_height),
            offset: 0.0,
        }
    }

    /// Number of panels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content_heights.len()
    }

    /// Whether the stack has no panels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content_heights.is_empty()
    }

    /// Outer offset into the stack.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Offset at which panel `index` pins.
    #[must_use]
    pub fn pin_threshold(&self, index: usize) -> f64 {
        index as f64 * self.viewport_height
    }

    /// Maximum outer offset (last panel pinned).
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        match self.len() {
            0 => 0.0,
            n => (n - 1) as f64 * self.viewport_height,
        }
    }

    /// Index of the pinned panel, `None` for an empty stack.
    #[must_use]
    pub fn pinned_index(&self) -> Option<usize> {
        let n = self.len();
        if n == 0 {
            return None;
        }
        if self.viewport_height <= 0.0 {
            return Some(n - 1);
        }
        // Same tolerance as `state`, so a boundary offset never reports one
        // panel pinned while the snapshot states say another.
        let zone = ((self.offset + REST_EPS) / self.viewport_height).floor();
        Some((zone.max(0.0) as usize).min(n - 1))
    }

    /// State of panel `index`.
    pub fn state(&self, index: usize) -> Result<PanelState, StackError> {
        self.check(index)?;
        Ok(self.panel_state(index))
    }

    fn panel_state(&self, index: usize) -> PanelState {
        if index + 1 < self.len() && self.offset >= self.pin_threshold(index + 1) - REST_EPS {
            return PanelState::Covered;
        }
        if self.offset >= self.pin_threshold(index) - REST_EPS {
            PanelState::Pinned
        } else {
            PanelState::Below
        }
    }

    /// A panel's inner scroll position.
    pub fn inner_offset(&self, index: usize) -> Result<f64, StackError> {
        self.check(index)?;
        Ok(self.inner_offsets[index])
    }

    /// Replace a panel's content height, clamping its inner position into the
    /// new overflow range.
    pub fn set_content_height(&mut self, index: usize, height: f64) -> Result<(), StackError> {
        self.check(index)?;
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        self.content_heights[index] = height;
        let overflow = self.overflow(index);
        self.inner_offsets[index] = self.inner_offsets[index].clamp(0.0, overflow);
        Ok(())
    }

    /// Recompute thresholds for a new viewport height.
    ///
    /// Cached pixel thresholds would all be wrong after a resize, so the
    /// stack re-derives the offset from the pinned panel and its fractional
    /// progress through its zone, keeping the user where they were.
    pub fn set_viewport(&mut self, viewport_height: f64) {
        let viewport_height = sanitize_height(viewport_height);
        if viewport_height == self.viewport_height {
            return;
        }
        let pinned = self.pinned_index();
        let fraction = match pinned {
            Some(p) if self.viewport_height > 0.0 => {
                ((self.offset - self.pin_threshold(p)) / self.viewport_height).clamp(0.0, 1.0)
            }
            _ => 0.0,
        };
        tracing::debug!(
            old = self.viewport_height,
            new = viewport_height,
            "stack viewport changed, rebasing thresholds"
        );
        self.viewport_height = viewport_height;
        if let Some(p) = pinned {
            self.offset = (p as f64 + fraction) * viewport_height;
        }
        self.offset = self.offset.clamp(0.0, self.max_offset());
        for index in 0..self.len() {
            let overflow = self.overflow(index);
            self.inner_offsets[index] = self.inner_offsets[index].clamp(0.0, overflow);
        }
    }

    /// Jump the outer offset (programmatic navigation, fling settle).
    ///
    /// Clamped into `[0, max_offset]`. Inner positions are untouched.
    pub fn set_offset(&mut self, offset: f64) {
        let offset = if offset.is_finite() { offset } else { 0.0 };
        self.offset = offset.clamp(0.0, self.max_offset());
    }

    /// Route one wheel delta through the stack.
    ///
    /// Walks zone by zone: drain the pinned-at-rest panel's inner overflow in
    /// the travel direction, then move the outer offset to the next pin
    /// boundary, and repeat until the delta is spent or a document end drops
    /// the remainder.
    pub fn apply_wheel(&mut self, delta: f64) -> WheelOutcome {
        let mut outcome = WheelOutcome::default();
        let mut remaining = if delta.is_finite() { delta } else { 0.0 };
        if self.is_empty() || self.viewport_height <= 0.0 {
            outcome.discarded = remaining;
            return outcome;
        }

        let max_iters = self.len() * 4 + 16;
        let mut iters = 0;
        while remaining.abs() > REST_EPS {
            iters += 1;
            debug_assert!(iters <= max_iters, "wheel routing failed to converge");
            if iters > max_iters {
                outcome.discarded += remaining;
                remaining = 0.0;
                break;
            }

            let Some(p) = self.pinned_index() else {
                outcome.discarded += remaining;
                remaining = 0.0;
                break;
            };
            let threshold = self.pin_threshold(p);
            let at_rest = self.offset - threshold <= REST_EPS;

            if at_rest {
                let split = arbitrate(
                    remaining,
                    self.inner_offsets[p],
                    self.content_heights[p],
                    self.viewport_height,
                );
                if split.inner != 0.0 {
                    let overflow = self.overflow(p);
                    self.inner_offsets[p] =
                        (self.inner_offsets[p] + split.inner).clamp(0.0, overflow);
                    outcome.inner += split.inner;
                    tracing::trace!(panel = p, consumed = split.inner, "inner scroll");
                }
                remaining = split.outer;
                if remaining == 0.0 {
                    break;
                }
            }

            if remaining > 0.0 {
                let limit = if p + 1 < self.len() {
                    self.pin_threshold(p + 1)
                } else {
                    self.max_offset()
                };
                let room = limit - self.offset;
                if room <= REST_EPS {
                    if p + 1 >= self.len() {
                        // Last panel pinned at the stack's end.
                        outcome.discarded += remaining;
                        remaining = 0.0;
                        break;
                    }
                    // Float residue at a boundary: snap across and re-route.
                    self.offset = limit;
                    continue;
                }
                let step = remaining.min(room);
                self.offset += step;
                outcome.outer += step;
                remaining -= step;
            } else {
                let limit = if at_rest {
                    if p == 0 {
                        // First panel at rest: nothing above the stack.
                        outcome.discarded += remaining;
                        remaining = 0.0;
                        break;
                    }
                    self.pin_threshold(p - 1)
                } else {
                    threshold
                };
                let room = limit - self.offset;
                if room >= -REST_EPS {
                    self.offset = limit;
                    continue;
                }
                let step = remaining.max(room);
                self.offset += step;
                outcome.outer += step;
                remaining -= step;
            }
        }
        // Sub-tolerance residue is dropped, not silently lost.
        outcome.discarded += remaining;
        outcome
    }

    /// Current state of every panel.
    #[must_use]
    pub fn snapshot(&self) -> StackSnapshot {
        let states = (0..self.len()).map(|i| self.panel_state(i)).collect();
        StackSnapshot {
            offset: self.offset,
            pinned: self.pinned_index(),
            states,
        }
    }

    fn overflow(&self, index: usize) -> f64 {
        (self.content_heights[index] - self.viewport_height).max(0.0)
    }

    fn check(&self, index: usize) -> Result<(), StackError> {
        if index >= self.len() {
            return Err(StackError::PanelOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }
}

fn sanitize_height(height: f64) -> f64 {
    if height.is_finite() { height.max(0.0) } else { 0.0 }
}
