#![forbid(unsafe_code)]

//! scrollstage runtime
//!
//! The orchestrator: it consumes host events from `scrollstage-core`, drives
//! the trackers and the panel stack, and owns every timer and global side
//! effect in the engine.
//!
//! # Key components
//!
//! - [`Program`] — Elm-style update loop with a deterministic timer queue
//! - [`Model`] / [`Cmd`] — application state, transitions, and side effects
//! - [`Subscription`] / [`Every`] — continuous event sources with guaranteed
//!   cancellation
//! - [`ScrollLock`] — reference-counted suspension of page scrolling with
//!   RAII guards
//! - [`BootSequence`] — the cosmetic boot gate
//! - [`PageModel`] — the assembled single-page engine, ready to drive
//!
//! # Role in scrollstage
//!
//! Everything below this crate is a pure or event-fed state machine; this
//! crate is where time, cancellation, and the one piece of process-wide
//! state (the scroll lock) live. The correctness risk it owns is teardown:
//! no timer or subscription callback may mutate anything after its owner is
//! gone.

pub mod boot;
pub mod page;
pub mod program;
pub mod scroll_lock;
pub mod simulator;
pub mod subscription;

pub use boot::{BootConfig, BootMessages, BootPhase, BootProgress, BootSequence, BootSpec};
pub use page::{NavBehavior, PageConfig, PageModel, PageMsg, PageSignals};
pub use program::{Cmd, Effect, Model, Program};
pub use scroll_lock::{ScrollLock, ScrollLockGuard};
pub use simulator::ProgramSimulator;
pub use subscription::{Every, MockSubscription, StopSignal, SubId, Subscription};
