#![forbid(unsafe_code)]

//! Navigation chrome for scrollstage.
//!
//! The thin view layer over the engine's output signals: header, dock, and
//! footer state derived from the active section, scroll progress, and the
//! boot gate. Chrome never writes tracker state — its only path back into
//! the engine is a [`NavIntent`](scrollstage_core::NavIntent) raised when
//! the user picks a dock entry.
//!
//! Also hosts the content-provider data model ([`content`]): the ordered
//! section list and the project-archive mapping, which the engine iterates
//! and never validates.

pub mod chrome;
pub mod content;

pub use chrome::{ChromeConfig, ChromeState, NavigationChrome};
pub use content::{ArchiveCategory, ArchiveItem, ArchiveStat, ProjectArchive, SectionManifest};
