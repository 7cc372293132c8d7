#![forbid(unsafe_code)]

//! The cosmetic boot gate.
//!
//! A one-shot state machine that fakes startup progress and blocks page
//! scrolling until it finishes: `Running → Completing → Done`, with `Done`
//! terminal and reached exactly once per page load.
//!
//! While `Running`, a fast tick advances `percent` by a bounded random
//! increment and a slower tick cycles a status message through every slot
//! except the last. The last slot is reserved: it shows only once `percent`
//! first reaches 100, at which point the machine enters `Completing` and the
//! caller schedules the fixed fade-out delay before calling
//! [`finish`](BootSequence::finish).
//!
//! The scroll suspension acquired at construction is held as a guard *field*:
//! tearing the sequence down in any phase releases it. Nothing here has a
//! real loading dependency, so there are no error states — only robustness
//! to being dropped mid-run.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use web_time::Duration;

use crate::scroll_lock::ScrollLockGuard;

/// Timing and increment tuning for the boot sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootConfig {
    /// Interval between progress increments.
    pub progress_interval: Duration,
    /// Interval between status-message rotations. Slower than progress.
    pub message_interval: Duration,
    /// Upper bound of the uniform random increment per progress tick.
    pub max_increment: f64,
    /// Pause between reaching 100% and dismissal.
    pub completion_delay: Duration,
    /// RNG seed. Hosts seed from entropy; tests pin it.
    pub seed: u64,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            progress_interval: Duration::from_millis(80),
            message_interval: Duration::from_millis(450),
            max_increment: 3.0,
            completion_delay: Duration::from_millis(400),
            seed: 0,
        }
    }
}

/// Status messages: a rotating list plus one reserved terminal slot.
///
/// The terminal message is its own field rather than "last element of the
/// list" so the reservation is structural, not `len - 1` arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootMessages {
    rotating: Vec<String>,
    terminal: String,
}

impl BootMessages {
    /// Build a message set. An empty rotating list is allowed; the display
    /// then sits on the terminal slot's predecessor index (0) until
    /// completion.
    #[must_use]
    pub fn new(
        rotating: impl IntoIterator<Item = impl Into<String>>,
        terminal: impl Into<String>,
    ) -> Self {
        Self {
            rotating: rotating.into_iter().map(Into::into).collect(),
            terminal: terminal.into(),
        }
    }

    /// Index of the reserved terminal slot.
    #[must_use]
    pub fn terminal_index(&self) -> usize {
        self.rotating.len()
    }

    /// Message at `index`; the terminal index and anything past it resolve
    /// to the terminal message.
    #[must_use]
    pub fn get(&self, index: usize) -> &str {
        self.rotating
            .get(index)
            .map_or(self.terminal.as_str(), String::as_str)
    }
}

impl Default for BootMessages {
    fn default() -> Self {
        Self::new(
            [
                "Initializing kernel",
                "Loading modules",
                "Mounting filesystems",
                "Starting services",
            ],
            "Ready",
        )
    }
}

/// Config plus content, bundled for page assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct BootSpec {
    /// Timing and increments.
    pub config: BootConfig,
    /// Status message set.
    pub messages: BootMessages,
}

impl Default for BootSpec {
    fn default() -> Self {
        Self {
            config: BootConfig::default(),
            messages: BootMessages::default(),
        }
    }
}

/// Lifecycle phase of the boot sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPhase {
    /// Ticking progress and rotating messages.
    Running,
    /// Reached 100%; waiting out the dismissal delay.
    Completing,
    /// Dismissed. Terminal.
    Done,
}

/// Observable boot state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootProgress {
    /// Progress percentage, monotonically non-decreasing in `[0, 100]`.
    pub percent: f64,
    /// Index into the message set (terminal index once complete).
    pub message_index: usize,
    /// True exactly from the `Done` transition onward.
    pub is_complete: bool,
}

/// The boot state machine.
pub struct BootSequence {
    config: BootConfig,
    messages: BootMessages,
    phase: BootPhase,
    percent: f64,
    message_index: usize,
    rng: SmallRng,
    guard: Option<ScrollLockGuard>,
}

impl BootSequence {
    /// Start a run, holding `guard` until the sequence finishes or is
    /// dropped.
    #[must_use]
    pub fn new(spec: BootSpec, guard: ScrollLockGuard) -> Self {
        tracing::debug!(seed = spec.config.seed, "boot sequence started");
        Self {
            rng: SmallRng::seed_from_u64(spec.config.seed),
            config: spec.config,
            messages: spec.messages,
            phase: BootPhase::Running,
            percent: 0.0,
            message_index: 0,
            guard: Some(guard),
        }
    }

    /// Timing configuration.
    #[must_use]
    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    /// Current observable state.
    #[must_use]
    pub fn progress(&self) -> BootProgress {
        BootProgress {
            percent: self.percent,
            message_index: self.message_index,
            is_complete: self.phase == BootPhase::Done,
        }
    }

    /// Current status message text.
    #[must_use]
    pub fn message(&self) -> &str {
        self.messages.get(self.message_index)
    }

    /// One progress tick.
    ///
    /// Returns `true` the single time `percent` first reaches 100: the
    /// caller schedules the completion delay then. Ticks in any other phase
    /// are no-ops — a timer that outlives the run mutates nothing.
    pub fn advance_progress(&mut self) -> bool {
        if self.phase != BootPhase::Running {
            return false;
        }
        let increment = self.rng.random_range(0.0..=self.config.max_increment);
        self.percent = (self.percent + increment).min(100.0);
        if self.percent < 100.0 {
            return false;
        }
        self.phase = BootPhase::Completing;
        self.message_index = self.messages.terminal_index();
        tracing::debug!("boot progress reached 100, completing");
        true
    }

    /// One message tick: rotate through the non-terminal slots.
    pub fn advance_message(&mut self) {
        if self.phase != BootPhase::Running {
            return;
        }
        let rotating = self.messages.terminal_index();
        if rotating > 0 {
            self.message_index = (self.message_index + 1) % rotating;
        }
    }

    /// Enter `Done` and release the scroll suspension. Idempotent.
    pub fn finish(&mut self) {
        if self.phase == BootPhase::Done {
            return;
        }
        self.phase = BootPhase::Done;
        self.percent = 100.0;
        self.message_index = self.messages.terminal_index();
        self.guard = None;
        tracing::debug!("boot sequence done");
    }
}
