#![forbid(unsafe_code)]

//! scrollstage public facade.
//!
//! The stable, ergonomic surface for hosts embedding the engine. It
//! re-exports the common types from the member crates and offers a
//! lightweight prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use scrollstage_core::{
    Easing, Event, InputCoalescer, NavIntent, ProgressConfig, ProgressSnapshot, RectPx,
    ScrollTween, SectionId, ViewportMetrics,
};

// --- Tracking re-exports ---------------------------------------------------

pub use scrollstage_track::{
    ActiveSectionTracker, BandConfig, FakeGeometry, GeometrySource, IntersectionChange,
    ProgressMode, ScrollProgressTracker, TiePolicy, TrackError, ViewportObserver, WatchHandle,
};

// --- Stack re-exports ------------------------------------------------------

pub use scrollstage_stack::{
    Arbitration, PanelStack, PanelState, StackError, StackSnapshot, WheelOutcome, arbitrate,
};

// --- Runtime re-exports ----------------------------------------------------

pub use scrollstage_runtime::{
    BootConfig, BootMessages, BootPhase, BootProgress, BootSequence, BootSpec, Cmd, Effect, Every,
    Model, NavBehavior, PageConfig, PageModel, PageMsg, PageSignals, Program, ProgramSimulator,
    ScrollLock, ScrollLockGuard, StopSignal, SubId, Subscription,
};

// --- Chrome re-exports -----------------------------------------------------

pub use scrollstage_chrome::{
    ArchiveCategory, ArchiveItem, ArchiveStat, ChromeConfig, ChromeState, NavigationChrome,
    ProjectArchive, SectionManifest,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for hosts assembling a page.
#[derive(Debug)]
pub enum Error {
    /// Section registration failed.
    Track(TrackError),
    /// Panel stack misuse.
    Stack(StackError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Track(err) => write!(f, "{err}"),
            Self::Stack(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Track(err) => Some(err),
            Self::Stack(err) => Some(err),
        }
    }
}

impl From<TrackError> for Error {
    fn from(err: TrackError) -> Self {
        Self::Track(err)
    }
}

impl From<StackError> for Error {
    fn from(err: StackError) -> Self {
        Self::Stack(err)
    }
}

/// Standard result type for scrollstage APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::{
        ActiveSectionTracker, BandConfig, BootSpec, ChromeConfig, Event, FakeGeometry, NavIntent,
        NavigationChrome, PageConfig, PageModel, PageMsg, PageSignals, PanelStack, Program,
        ProgramSimulator, ScrollLock, SectionId, ViewportMetrics,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_wraps_track_errors() {
        let err: Error = TrackError::DuplicateId("hero".into()).into();
        assert!(err.to_string().contains("hero"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn error_wraps_stack_errors() {
        let err: Error = StackError::PanelOutOfRange { index: 4, len: 2 }.into();
        assert!(err.to_string().contains("4"));
    }

    #[test]
    fn prelude_assembles_a_page() {
        use crate::prelude::*;

        let geometry = FakeGeometry::new(ViewportMetrics::new(800.0, 600.0, 2400.0));
        let config = PageConfig {
            sections: vec!["hero".into(), "contact".into()],
            initial_section: "hero".into(),
            ..PageConfig::default()
        };
        let page = PageModel::new(geometry, config, ScrollLock::new()).unwrap();
        assert_eq!(page.signals().active_section.as_str(), "hero");
    }
}
