#![forbid(unsafe_code)]

//! Section tracking for scrollstage.
//!
//! Three layers, lowest first:
//!
//! - [`ViewportObserver`] answers "which watched regions currently cross the
//!   trigger band", edge-triggered, from a [`GeometrySource`].
//! - [`ActiveSectionTracker`] folds those changes into a single always-defined
//!   active section id (last-write-wins).
//! - [`ScrollProgressTracker`] derives normalized scroll progress for the
//!   whole document or one bounded region.
//!
//! All three are event-driven: they re-evaluate when the runtime hands them a
//! scroll, resize, or content-growth event, and never poll or mutate layout.

use std::fmt;

use scrollstage_core::SectionId;

pub mod active;
pub mod observer;
pub mod progress;

pub use active::{ActiveSectionTracker, TiePolicy};
pub use observer::{
    BandConfig, FakeGeometry, GeometrySource, IntersectionChange, ViewportObserver, WatchHandle,
};
pub use progress::{ProgressMode, ScrollProgressTracker};

/// Errors surfaced at the tracking API boundary.
///
/// Runtime failure modes (missing regions, geometry races) are not errors;
/// they degrade silently per the tracking contract. These variants exist for
/// programmer mistakes only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackError {
    /// A section id was registered twice in one tracked set.
    DuplicateId(SectionId),
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "section id registered twice: {id}"),
        }
    }
}

impl std::error::Error for TrackError {}
