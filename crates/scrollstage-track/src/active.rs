#![forbid(unsafe_code)]

//! Active section tracking.
//!
//! Folds trigger-band changes into a single active section id. The id is
//! always defined: it starts at a configured default and only ever moves to
//! a section that reported itself in-band. Fast flings that momentarily
//! leave no section intersecting keep the last value — the tracker never
//! falls back to the default after construction.
//!
//! When two regions enter the band in the same pass (possible only when
//! region edges meet the band at the same pixel boundary), the later event
//! wins under [`TiePolicy::LastWriteWins`]. That matches the behavior of
//! independent per-region watchers firing in order and is kept as the
//! default. [`TiePolicy::ClosestToCenter`] is the opt-in alternative that
//! prefers the region whose center sits nearest the band.

use scrollstage_core::{Event, SectionId};

use crate::TrackError;
use crate::observer::{BandConfig, GeometrySource, ViewportObserver, WatchHandle};

/// Resolution for simultaneous in-band entries within one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiePolicy {
    /// The most recently fired entry wins. Default, for parity with
    /// independent watcher callbacks.
    #[default]
    LastWriteWins,
    /// The entry whose center is closest to the band center wins.
    ClosestToCenter,
}

/// Tracks which section of an ordered set is currently active.
pub struct ActiveSectionTracker {
    observer: ViewportObserver,
    handles: Vec<WatchHandle>,
    active: SectionId,
    tie: TiePolicy,
}

impl ActiveSectionTracker {
    /// Track `ids` with `initial` as the starting active id.
    ///
    /// `initial` is usually the first section but does not have to be a
    /// member of `ids`. Duplicate ids are rejected.
    pub fn new(
        ids: impl IntoIterator<Item = SectionId>,
        initial: SectionId,
        band: BandConfig,
    ) -> Result<Self, TrackError> {
        let mut observer = ViewportObserver::new(band);
        let mut handles = Vec::new();
        for id in ids {
            handles.push(observer.watch(id)?);
        }
        Ok(Self {
            observer,
            handles,
            active: initial,
            tie: TiePolicy::default(),
        })
    }

    /// Override the tie policy.
    #[must_use]
    pub fn with_tie_policy(mut self, tie: TiePolicy) -> Self {
        self.tie = tie;
        self
    }

    /// The currently active section id. Always defined.
    #[must_use]
    pub fn active_id(&self) -> &SectionId {
        &self.active
    }

    /// Ids currently tracked, in registration order.
    #[must_use]
    pub fn sections(&self) -> Vec<SectionId> {
        self.observer.watched()
    }

    /// Feed a host event. Geometry-affecting events trigger re-evaluation;
    /// everything else is ignored. Returns the new active id if it changed.
    pub fn handle_event<G: GeometrySource>(
        &mut self,
        event: &Event,
        geometry: &G,
    ) -> Option<SectionId> {
        match event {
            Event::Scrolled { .. } | Event::Resized(_) | Event::ContentResized { .. } => {
                self.reevaluate(geometry)
            }
            Event::Wheel { .. } | Event::Tick { .. } => None,
        }
    }

    /// Re-evaluate watched regions and fold entries into the active id.
    pub fn reevaluate<G: GeometrySource>(&mut self, geometry: &G) -> Option<SectionId> {
        let changes = self.observer.evaluate(geometry);
        let entered = changes.into_iter().filter(|c| c.in_band);

        let winner = match self.tie {
            TiePolicy::LastWriteWins => entered.last(),
            TiePolicy::ClosestToCenter => entered.min_by(|a, b| {
                a.center_distance
                    .partial_cmp(&b.center_distance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
        };

        let winner = winner?;
        if winner.id == self.active {
            return None;
        }
        tracing::debug!(from = %self.active, to = %winner.id, "active section changed");
        self.active = winner.id.clone();
        Some(self.active.clone())
    }

    /// Replace the tracked set, releasing every existing watcher.
    ///
    /// The current active id is retained even when it is not in the new set;
    /// it will move on the next in-band entry.
    pub fn retrack(&mut self, ids: impl IntoIterator<Item = SectionId>) -> Result<(), TrackError> {
        let band = self.observer.band();
        let mut observer = ViewportObserver::new(band);
        let mut handles = Vec::new();
        for id in ids {
            handles.push(observer.watch(id)?);
        }
        // Old handles drop here, detaching every stale watcher.
        self.handles = handles;
        self.observer = observer;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::FakeGeometry;
    use scrollstage_core::{RectPx, ViewportMetrics};

    fn viewport() -> ViewportMetrics {
        ViewportMetrics::new(800.0, 600.0, 3000.0)
    }

    fn tracker(ids: &[&str], initial: &str) -> ActiveSectionTracker {
        ActiveSectionTracker::new(
            ids.iter().map(|s| SectionId::from(*s)),
            initial.into(),
            BandConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn starts_at_configured_default() {
        let t = tracker(&["hero", "projects"], "hero");
        assert_eq!(t.active_id().as_str(), "hero");
    }

    #[test]
    fn default_holds_with_no_intersections() {
        let mut t = tracker(&["hero", "projects"], "hero");
        let geo = FakeGeometry::new(viewport()); // nothing mounted yet
        assert_eq!(t.reevaluate(&geo), None);
        assert_eq!(t.active_id().as_str(), "hero");
    }

    #[test]
    fn entering_region_becomes_active() {
        let mut t = tracker(&["hero", "projects"], "hero");
        let mut geo = FakeGeometry::new(viewport());
        geo.place("projects", RectPx::vertical_slot(100.0, 800.0, 500.0));

        let changed = t.reevaluate(&geo);
        assert_eq!(changed, Some(SectionId::from("projects")));
        assert_eq!(t.active_id().as_str(), "projects");
    }

    #[test]
    fn last_write_wins_on_simultaneous_entry() {
        let band = BandConfig {
            center_fraction: 0.5,
            half_height_px: 50.0,
        };
        let mut t = ActiveSectionTracker::new(
            [SectionId::from("a"), SectionId::from("b")],
            "a".into(),
            band,
        )
        .unwrap();
        let mut geo = FakeGeometry::new(viewport());
        geo.place("a", RectPx::vertical_slot(250.0, 800.0, 200.0));
        geo.place("b", RectPx::vertical_slot(300.0, 800.0, 200.0));

        // Both enter in the same pass; "b" fired later in registration order.
        t.reevaluate(&geo);
        assert_eq!(t.active_id().as_str(), "b");
    }

    #[test]
    fn last_write_wins_reverse_order() {
        let band = BandConfig {
            center_fraction: 0.5,
            half_height_px: 50.0,
        };
        let mut t = ActiveSectionTracker::new(
            [SectionId::from("b"), SectionId::from("a")],
            "b".into(),
            band,
        )
        .unwrap();
        let mut geo = FakeGeometry::new(viewport());
        geo.place("a", RectPx::vertical_slot(250.0, 800.0, 200.0));
        geo.place("b", RectPx::vertical_slot(300.0, 800.0, 200.0));

        t.reevaluate(&geo);
        assert_eq!(t.active_id().as_str(), "a");
    }

    #[test]
    fn closest_to_center_policy_prefers_proximity() {
        let band = BandConfig {
            center_fraction: 0.5,
            half_height_px: 50.0,
        };
        let mut t = ActiveSectionTracker::new(
            [SectionId::from("a"), SectionId::from("b")],
            "a".into(),
            band,
        )
        .unwrap()
        .with_tie_policy(TiePolicy::ClosestToCenter);

        let mut geo = FakeGeometry::new(viewport());
        // "a" center = 310, "b" center = 350: "a" is closer to the band
        // center even though "b" fires later and would win under LWW.
        geo.place("a", RectPx::vertical_slot(260.0, 800.0, 100.0));
        geo.place("b", RectPx::vertical_slot(250.0, 800.0, 200.0));

        t.reevaluate(&geo);
        assert_eq!(t.active_id().as_str(), "a");
    }

    #[test]
    fn leaving_the_band_retains_last_value() {
        let mut t = tracker(&["hero", "projects"], "hero");
        let mut geo = FakeGeometry::new(viewport());
        geo.place("projects", RectPx::vertical_slot(100.0, 800.0, 500.0));
        t.reevaluate(&geo);
        assert_eq!(t.active_id().as_str(), "projects");

        // Fling: projects leaves, nothing else enters.
        geo.place("projects", RectPx::vertical_slot(-900.0, 800.0, 500.0));
        assert_eq!(t.reevaluate(&geo), None);
        assert_eq!(t.active_id().as_str(), "projects");
    }

    #[test]
    fn scrolled_and_resized_events_drive_reevaluation() {
        let mut t = tracker(&["hero"], "hero");
        let mut geo = FakeGeometry::new(viewport());
        geo.place("hero", RectPx::vertical_slot(0.0, 800.0, 600.0));

        // Wheel events never re-evaluate.
        assert_eq!(t.handle_event(&Event::Wheel { delta: 5.0 }, &geo), None);
        // A scroll does; hero is already the active default so no change
        // surfaces, but the watcher state is now primed.
        assert_eq!(t.handle_event(&Event::Scrolled { offset: 0.0 }, &geo), None);

        // Move hero out, bring nothing in: resize pass reports no change.
        geo.place("hero", RectPx::vertical_slot(-900.0, 800.0, 600.0));
        assert_eq!(t.handle_event(&Event::Resized(viewport()), &geo), None);
        assert_eq!(t.active_id().as_str(), "hero");
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = ActiveSectionTracker::new(
            [SectionId::from("x"), SectionId::from("x")],
            "x".into(),
            BandConfig::default(),
        );
        assert!(matches!(result, Err(TrackError::DuplicateId(_))));
    }

    #[test]
    fn retrack_releases_stale_watchers() {
        let mut t = tracker(&["hero", "projects"], "hero");
        t.retrack([SectionId::from("research"), SectionId::from("contact")])
            .unwrap();

        let names: Vec<_> = t.sections().iter().map(|s| s.as_str().to_owned()).collect();
        assert_eq!(names, vec!["research", "contact"]);

        // Old regions no longer produce activations.
        let mut geo = FakeGeometry::new(viewport());
        geo.place("projects", RectPx::vertical_slot(100.0, 800.0, 500.0));
        assert_eq!(t.reevaluate(&geo), None);
        assert_eq!(t.active_id().as_str(), "hero");
    }

    #[test]
    fn retrack_keeps_current_active() {
        let mut t = tracker(&["hero", "projects"], "hero");
        let mut geo = FakeGeometry::new(viewport());
        geo.place("projects", RectPx::vertical_slot(100.0, 800.0, 500.0));
        t.reevaluate(&geo);

        t.retrack([SectionId::from("research")]).unwrap();
        assert_eq!(t.active_id().as_str(), "projects");
    }
}
