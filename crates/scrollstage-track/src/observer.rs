#![forbid(unsafe_code)]

//! Trigger-band viewport observation.
//!
//! A watched region counts as "in band" when its bounding box crosses a thin
//! horizontal strip of the viewport. The strip defaults to a zero-height line
//! at 50% viewport height, so "in band" means "crosses the viewport's
//! vertical centerline".
//!
//! The observer is edge-triggered: [`evaluate`](ViewportObserver::evaluate)
//! reports only regions whose in-band state *changed* since the previous
//! pass. It holds no timers and does no polling; the caller re-evaluates on
//! scroll and on resize (resizes shift layout, so skipping them would leave
//! stale intersection state).
//!
//! Watches detach through [`WatchHandle`] drops. A detached watch is pruned
//! before the next evaluation, so it can never produce another change.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ahash::AHashMap;
use scrollstage_core::{RectPx, SectionId, ViewportMetrics};

use crate::TrackError;

/// Geometry queries the observer needs from its host.
///
/// Production hosts adapt the platform's layout primitives; tests use
/// [`FakeGeometry`]. Region rects are viewport-relative bounding boxes.
/// Returning `None` for a region is not an error — sections mount
/// asynchronously and the observer simply retries on the next pass.
pub trait GeometrySource {
    /// Bounding box of a mounted region, viewport-relative.
    fn region_rect(&self, id: &SectionId) -> Option<RectPx>;

    /// Current viewport and document metrics.
    fn viewport(&self) -> ViewportMetrics;
}

/// Trigger band placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandConfig {
    /// Vertical placement of the band center as a fraction of viewport
    /// height. 0.5 is the viewport midline.
    pub center_fraction: f64,

    /// Half-height of the band in pixels. Zero collapses the band to a line,
    /// which keeps simultaneous multi-region hits rare (they remain possible
    /// when region edges land on the exact same pixel boundary).
    pub half_height_px: f64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            center_fraction: 0.5,
            half_height_px: 0.0,
        }
    }
}

impl BandConfig {
    /// The band's `(top, bottom)` edges for a viewport.
    #[must_use]
    pub fn strip(&self, viewport: &ViewportMetrics) -> (f64, f64) {
        let center = viewport.height * self.center_fraction;
        (center - self.half_height_px, center + self.half_height_px)
    }

    /// The band's center line for a viewport.
    #[must_use]
    pub fn center(&self, viewport: &ViewportMetrics) -> f64 {
        viewport.height * self.center_fraction
    }
}

/// An in-band state transition observed during one evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionChange {
    /// The region whose state changed.
    pub id: SectionId,
    /// New in-band state.
    pub in_band: bool,
    /// Distance from the region's vertical center to the band center, in
    /// pixels. Lets callers break simultaneous-entry ties by proximity.
    pub center_distance: f64,
}

struct WatchEntry {
    id: SectionId,
    alive: Arc<AtomicBool>,
    last_in_band: Option<bool>,
}

/// Detach handle for a watched region.
///
/// Dropping the handle detaches the watch; the observer prunes it before the
/// next evaluation pass.
#[derive(Debug)]
pub struct WatchHandle {
    id: SectionId,
    alive: Arc<AtomicBool>,
}

impl WatchHandle {
    /// The watched section id.
    #[must_use]
    pub fn id(&self) -> &SectionId {
        &self.id
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
        tracing::debug!(section = %self.id, "watch detached");
    }
}

/// Edge-triggered trigger-band observer over a set of watched regions.
pub struct ViewportObserver {
    band: BandConfig,
    watches: Vec<WatchEntry>,
}

impl ViewportObserver {
    /// Create an observer with the given band placement.
    #[must_use]
    pub fn new(band: BandConfig) -> Self {
        Self {
            band,
            watches: Vec::new(),
        }
    }

    /// Band placement in use.
    #[must_use]
    pub fn band(&self) -> BandConfig {
        self.band
    }

    /// Watch a region.
    ///
    /// Evaluation order follows registration order, which makes the
    /// last-write-wins fold over simultaneous entries deterministic for a
    /// given section list. Registering an id that is already live is a
    /// programmer error.
    pub fn watch(&mut self, id: SectionId) -> Result<WatchHandle, TrackError> {
        self.prune();
        if self.watches.iter().any(|w| w.id == id) {
            return Err(TrackError::DuplicateId(id));
        }
        let alive = Arc::new(AtomicBool::new(true));
        tracing::debug!(section = %id, "watch attached");
        self.watches.push(WatchEntry {
            id: id.clone(),
            alive: alive.clone(),
            last_in_band: None,
        });
        Ok(WatchHandle { id, alive })
    }

    /// Ids currently watched (live handles only).
    #[must_use]
    pub fn watched(&self) -> Vec<SectionId> {
        self.watches
            .iter()
            .filter(|w| w.alive.load(Ordering::Acquire))
            .map(|w| w.id.clone())
            .collect()
    }

    /// Re-evaluate every live watch against current geometry.
    ///
    /// Returns state *changes* in registration order. Regions the geometry
    /// source cannot resolve are skipped silently and keep their previous
    /// state; they are re-tried on the next pass.
    pub fn evaluate<G: GeometrySource>(&mut self, geometry: &G) -> Vec<IntersectionChange> {
        self.prune();
        let viewport = geometry.viewport();
        let (band_top, band_bottom) = self.band.strip(&viewport);
        let band_center = self.band.center(&viewport);

        let mut changes = Vec::new();
        for watch in &mut self.watches {
            let Some(rect) = geometry.region_rect(&watch.id) else {
                tracing::trace!(section = %watch.id, "region not mounted, skipping");
                continue;
            };
            let in_band = rect.crosses_band(band_top, band_bottom);
            if watch.last_in_band != Some(in_band) {
                watch.last_in_band = Some(in_band);
                changes.push(IntersectionChange {
                    id: watch.id.clone(),
                    in_band,
                    center_distance: (rect.center_y() - band_center).abs(),
                });
            }
        }
        changes
    }

    fn prune(&mut self) {
        self.watches.retain(|w| w.alive.load(Ordering::Acquire));
    }
}

/// In-memory geometry source for tests and headless simulations.
///
/// Holds one viewport-relative rect per section plus viewport metrics;
/// mutate either between evaluation passes to script a scroll session.
#[derive(Debug, Clone, Default)]
pub struct FakeGeometry {
    rects: AHashMap<SectionId, RectPx>,
    viewport: ViewportMetrics,
}

impl FakeGeometry {
    /// Create an empty source with the given viewport.
    #[must_use]
    pub fn new(viewport: ViewportMetrics) -> Self {
        Self {
            rects: AHashMap::new(),
            viewport,
        }
    }

    /// Set (or mount) a region's viewport-relative rect.
    pub fn place(&mut self, id: impl Into<SectionId>, rect: RectPx) {
        self.rects.insert(id.into(), rect);
    }

    /// Remove (unmount) a region.
    pub fn remove(&mut self, id: &SectionId) {
        self.rects.remove(id);
    }

    /// Replace the viewport metrics.
    pub fn set_viewport(&mut self, viewport: ViewportMetrics) {
        self.viewport = viewport;
    }

    /// Shift every mounted rect by `dy` (simulates a document scroll of
    /// `-dy`) and update the stored scroll offset.
    pub fn scroll_to(&mut self, offset: f64) {
        let delta = self.viewport.scroll_y - offset;
        for rect in self.rects.values_mut() {
            rect.y += delta;
        }
        self.viewport.scroll_y = offset;
    }
}

impl GeometrySource for FakeGeometry {
    fn region_rect(&self, id: &SectionId) -> Option<RectPx> {
        self.rects.get(id).copied()
    }

    fn viewport(&self) -> ViewportMetrics {
        self.viewport
    }
}
