#![forbid(unsafe_code)]

//! Stateful scroll progress tracking.
//!
//! Wraps the pure ratio math from `scrollstage-core` with event-driven
//! recomputation and change detection. Two modes:
//!
//! - Global: progress through the whole document.
//! - Bounded: progress through one region, from its top reaching the
//!   viewport top to its bottom reaching the viewport top.
//!
//! Content-height changes recompute the ratio exactly like scroll events do —
//! late-loading images change the denominator without any scroll occurring.
//! The tracker is read-only with respect to geometry.

use scrollstage_core::{Event, ProgressConfig, ProgressSnapshot, SectionId};
use scrollstage_core::{bounded_ratio, global_ratio};

use crate::observer::GeometrySource;

/// What the tracker measures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressMode {
    /// Whole-document scroll progress.
    Global,
    /// Progress through a single region.
    Bounded(SectionId),
}

/// Event-driven scroll progress with change detection.
#[derive(Debug, Clone)]
pub struct ScrollProgressTracker {
    config: ProgressConfig,
    mode: ProgressMode,
    snapshot: ProgressSnapshot,
}

impl ScrollProgressTracker {
    /// Track whole-document progress.
    #[must_use]
    pub fn global(config: ProgressConfig) -> Self {
        Self {
            config,
            mode: ProgressMode::Global,
            snapshot: ProgressSnapshot::default(),
        }
    }

    /// Track progress through one region.
    #[must_use]
    pub fn bounded(config: ProgressConfig, region: SectionId) -> Self {
        Self {
            config,
            mode: ProgressMode::Bounded(region),
            snapshot: ProgressSnapshot::default(),
        }
    }

    /// The mode in use.
    #[must_use]
    pub fn mode(&self) -> &ProgressMode {
        &self.mode
    }

    /// Latest reading.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.snapshot
    }

    /// Feed a host event. Returns the new snapshot if it changed.
    pub fn handle_event<G: GeometrySource>(
        &mut self,
        event: &Event,
        geometry: &G,
    ) -> Option<ProgressSnapshot> {
        match event {
            Event::Scrolled { .. } | Event::Resized(_) | Event::ContentResized { .. } => {
                self.recompute(geometry)
            }
            Event::Wheel { .. } | Event::Tick { .. } => None,
        }
    }

    /// Recompute from current geometry. Returns the new snapshot if changed.
    ///
    /// In bounded mode an unmounted region keeps the last reading (silent
    /// skip, same contract as the observer).
    pub fn recompute<G: GeometrySource>(&mut self, geometry: &G) -> Option<ProgressSnapshot> {
        let viewport = geometry.viewport();
        let ratio = match &self.mode {
            ProgressMode::Global => global_ratio(
                viewport.scroll_y,
                viewport.content_height,
                viewport.height,
            ),
            ProgressMode::Bounded(region) => {
                let rect = geometry.region_rect(region)?;
                bounded_ratio(rect)
            }
        };
        let next = ProgressSnapshot::from_ratio(ratio, &self.config);
        if next == self.snapshot {
            return None;
        }
        self.snapshot = next;
        Some(next)
    }
}
