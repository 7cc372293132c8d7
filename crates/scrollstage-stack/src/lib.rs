#![forbid(unsafe_code)]

//! Stacked section transitions for scrollstage.
//!
//! Full-viewport panels pinned in z-order: as the document scrolls, each
//! panel pins to the viewport top, is scrolled through (draining any inner
//! overflow first), and is then covered by the next panel. The state machine
//! lives in [`PanelStack`]; the decision of whether a unit of scroll input
//! goes to a panel's inner overflow or to the outer stack is the pure
//! function [`arbitrate`].

use std::fmt;

pub mod arbitrate;
pub mod panel;

pub use arbitrate::{Arbitration, arbitrate};
pub use panel::{PanelStack, PanelState, StackSnapshot, WheelOutcome};

/// Errors surfaced at the stack API boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    /// A panel index past the end of the stack.
    PanelOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of panels in the stack.
        len: usize,
    },
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PanelOutOfRange { index, len } => {
                write!(f, "panel index {index} out of range for stack of {len}")
            }
        }
    }
}

impl std::error::Error for StackError {}
