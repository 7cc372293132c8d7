#![forbid(unsafe_code)]

//! Host input event model.
//!
//! Hosts translate their platform's raw notifications (scroll listeners,
//! resize observers, intersection callbacks, click handlers) into [`Event`]
//! values and feed them to the runtime. The engine never talks to a platform
//! directly; this enum is the entire input surface.

use web_time::Instant;

use crate::geometry::ViewportMetrics;
use crate::section::SectionId;

/// An input event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The document scroll offset changed.
    Scrolled {
        /// New document scroll offset in pixels.
        offset: f64,
    },

    /// The viewport was resized.
    ///
    /// Carries full metrics: a resize shifts layout, so consumers must
    /// re-evaluate intersection geometry and recompute thresholds.
    Resized(ViewportMetrics),

    /// The document content height changed without a scroll or resize
    /// (images or fonts finished loading).
    ContentResized {
        /// New total scrollable height in pixels.
        content_height: f64,
    },

    /// A raw wheel/touch scroll delta aimed at the stacked-panel region,
    /// before inner/outer arbitration. Positive is downward.
    Wheel {
        /// Scroll delta in pixels.
        delta: f64,
    },

    /// A timer tick from the runtime's scheduler.
    Tick {
        /// Current time on the driving clock.
        now: Instant,
    },
}

/// A navigation intent raised by chrome (click/tap on a nav entry).
///
/// Fire-and-forget: the engine answers with a smooth-scroll effect and does
/// not report completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavIntent {
    /// The section the user asked to scroll to.
    pub target: SectionId,
}
