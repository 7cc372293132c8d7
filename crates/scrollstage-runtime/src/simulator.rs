#![forbid(unsafe_code)]

//! Headless program driver for tests.
//!
//! Wraps a [`Program`] with relative-time stepping so a test reads as a
//! script: dispatch an event, advance the clock, assert on signals. The
//! clock is the program's own — timers fire deterministically during
//! [`advance`](ProgramSimulator::advance), and no background thread is
//! involved unless the model declares subscriptions.

use scrollstage_core::Event;
use web_time::{Duration, Instant};

use crate::program::{Effect, Model, Program};

/// Deterministic driver over a [`Program`].
pub struct ProgramSimulator<M: Model> {
    program: Program<M>,
}

impl<M: Model> ProgramSimulator<M> {
    /// Start the program now.
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            program: Program::new(model, Instant::now()),
        }
    }

    /// Current clock reading.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.program.now()
    }

    /// The model under test.
    #[must_use]
    pub fn model(&self) -> &M {
        self.program.model()
    }

    /// Feed a host event.
    pub fn dispatch(&mut self, event: Event) {
        self.program.dispatch(event);
    }

    /// Feed a message.
    pub fn send(&mut self, msg: M::Message) {
        self.program.send(msg);
    }

    /// Move the clock forward, firing every timer that falls due.
    pub fn advance(&mut self, by: Duration) {
        let to = self.program.now() + by;
        self.program.advance(to);
    }

    /// Drain subscription messages into the model.
    pub fn pump(&mut self) {
        self.program.pump();
    }

    /// Take pending host effects.
    #[must_use]
    pub fn effects(&mut self) -> Vec<Effect> {
        self.program.drain_effects()
    }

    /// Number of pending one-shot timers (visibility for teardown tests).
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.program.pending_timers()
    }

    /// Tear the program down, cancelling timers and subscriptions.
    pub fn shutdown(self) {
        self.program.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Cmd;

    #[derive(Default)]
    struct Countdown {
        remaining: u32,
        fired: u32,
    }

    #[derive(Debug, Clone)]
    enum Msg {
        Host(Event),
        Beat,
    }

    impl From<Event> for Msg {
        fn from(event: Event) -> Self {
            Self::Host(event)
        }
    }

    impl Model for Countdown {
        type Message = Msg;

        fn init(&mut self) -> Cmd<Msg> {
            Cmd::tick(Duration::from_millis(10), Msg::Beat)
        }

        fn update(&mut self, msg: Msg) -> Cmd<Msg> {
            match msg {
                Msg::Host(_) => Cmd::none(),
                Msg::Beat => {
                    self.fired += 1;
                    if self.remaining > 0 {
                        self.remaining -= 1;
                        Cmd::tick(Duration::from_millis(10), Msg::Beat)
                    } else {
                        Cmd::none()
                    }
                }
            }
        }
    }

    #[test]
    fn advance_fires_self_rescheduling_chain_to_exhaustion() {
        let mut sim = ProgramSimulator::new(Countdown {
            remaining: 4,
            fired: 0,
        });
        sim.advance(Duration::from_millis(200));
        assert_eq!(sim.model().fired, 5);
        assert_eq!(sim.pending_timers(), 0);
    }

    #[test]
    fn partial_advance_fires_partial_chain() {
        let mut sim = ProgramSimulator::new(Countdown {
            remaining: 4,
            fired: 0,
        });
        sim.advance(Duration::from_millis(25));
        assert_eq!(sim.model().fired, 2);
        assert_eq!(sim.pending_timers(), 1);
    }

    #[test]
    fn shutdown_drops_pending_work() {
        let mut sim = ProgramSimulator::new(Countdown {
            remaining: 4,
            fired: 0,
        });
        sim.advance(Duration::from_millis(15));
        assert!(sim.pending_timers() > 0);
        sim.shutdown();
    }
}
