#![forbid(unsafe_code)]

//! Elm-style update loop with a deterministic timer queue.
//!
//! The program separates state ([`Model`]) from side effects ([`Cmd`]) and
//! owns the only clock in the engine. Host events enter through
//! [`dispatch`](Program::dispatch), timers fire through
//! [`advance`](Program::advance), and continuous sources (frame tickers)
//! arrive via the subscription system and [`pump`](Program::pump).
//!
//! Side effects the host must perform — smooth-scrolling to a section,
//! applying a computed offset — surface as [`Effect`] values from
//! [`drain_effects`](Program::drain_effects); the engine never touches the
//! platform directly.
//!
//! Scheduled ticks live in the program and die with it: dropping the program
//! cancels every pending timer and stops every subscription, so no callback
//! can observe a torn-down model.

use std::collections::VecDeque;

use scrollstage_core::{Event, SectionId};
use web_time::{Duration, Instant};

use crate::subscription::{Subscription, SubscriptionManager};

/// Application state and behavior.
pub trait Model: Sized {
    /// Message type driving state transitions. Host events must convert in.
    type Message: From<Event> + Send + 'static;

    /// Startup commands (initial timers, effects). Called once.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// The state transition function.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Continuous event sources the model currently wants.
    ///
    /// Re-evaluated after every update; the runtime starts and stops
    /// sources so the running set always matches.
    fn subscriptions(&self) -> Vec<Box<dyn Subscription<Self::Message>>> {
        Vec::new()
    }
}

/// A side effect requested by an update.
#[derive(Debug)]
pub enum Cmd<M> {
    /// Nothing.
    None,
    /// Several commands, order preserved.
    Batch(Vec<Cmd<M>>),
    /// Feed a message back into the model.
    Msg(M),
    /// Deliver `msg` after `after` elapses on the program clock.
    Tick {
        /// Delay before delivery.
        after: Duration,
        /// Message to deliver.
        msg: M,
    },
    /// Ask the host to smooth-scroll to a section (fire-and-forget).
    ScrollTo {
        /// Target section.
        target: SectionId,
    },
    /// Ask the host to set the document scroll offset.
    ApplyScroll {
        /// Absolute offset in pixels.
        offset: f64,
    },
}

impl<M> Cmd<M> {
    /// No-op command.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::None
    }

    /// Message command.
    #[inline]
    #[must_use]
    pub fn msg(msg: M) -> Self {
        Self::Msg(msg)
    }

    /// One-shot timer command.
    #[inline]
    #[must_use]
    pub fn tick(after: Duration, msg: M) -> Self {
        Self::Tick { after, msg }
    }

    /// Smooth-scroll request.
    #[inline]
    #[must_use]
    pub fn scroll_to(target: SectionId) -> Self {
        Self::ScrollTo { target }
    }

    /// Offset-application request.
    #[inline]
    #[must_use]
    pub fn apply_scroll(offset: f64) -> Self {
        Self::ApplyScroll { offset }
    }

    /// Batch, flattening the trivial cases.
    #[must_use]
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }
}

impl<M> Default for Cmd<M> {
    fn default() -> Self {
        Self::None
    }
}

/// A host-visible effect produced by the update loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Smooth-scroll the document to a section's region.
    ScrollTo {
        /// Target section.
        target: SectionId,
    },
    /// Set the document scroll offset (one frame of a tween).
    ApplyScroll {
        /// Absolute offset in pixels.
        offset: f64,
    },
}

impl Effect {
    /// The offset of an `ApplyScroll`, if that is what this is.
    #[must_use]
    pub fn offset(&self) -> Option<f64> {
        match self {
            Self::ApplyScroll { offset } => Some(*offset),
            Self::ScrollTo { .. } => None,
        }
    }
}

struct ScheduledTick<M> {
    deadline: Instant,
    seq: u64,
    msg: M,
}

/// The runtime: model, clock, timers, subscriptions, pending effects.
pub struct Program<M: Model> {
    model: M,
    now: Instant,
    timers: Vec<ScheduledTick<M::Message>>,
    next_seq: u64,
    effects: Vec<Effect>,
    subscriptions: SubscriptionManager<M::Message>,
}

impl<M: Model> Program<M> {
    /// Start the program at `now`, running the model's `init` commands.
    #[must_use]
    pub fn new(mut model: M, now: Instant) -> Self {
        let init_cmd = model.init();
        let mut program = Self {
            model,
            now,
            timers: Vec::new(),
            next_seq: 0,
            effects: Vec::new(),
            subscriptions: SubscriptionManager::new(),
        };
        program.run(VecDeque::new(), init_cmd);
        program
    }

    /// The model.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Current program clock.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Number of pending one-shot timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Feed a host event.
    pub fn dispatch(&mut self, event: Event) {
        self.send(M::Message::from(event));
    }

    /// Feed a message, running updates until the model settles.
    pub fn send(&mut self, msg: M::Message) {
        self.run(VecDeque::from([msg]), Cmd::None);
    }

    /// Advance the clock to `to`, firing due timers in deadline order.
    ///
    /// Timers scheduled while firing are honored within the same call when
    /// their deadline also falls before `to`.
    pub fn advance(&mut self, to: Instant) {
        loop {
            let due = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.deadline <= to)
                .min_by_key(|(_, t)| (t.deadline, t.seq))
                .map(|(i, _)| i);
            let Some(index) = due else { break };
            let tick = self.timers.swap_remove(index);
            if tick.deadline > self.now {
                self.now = tick.deadline;
            }
            self.send(tick.msg);
        }
        if to > self.now {
            self.now = to;
        }
    }

    /// Drain messages from running subscriptions into the model.
    pub fn pump(&mut self) {
        for msg in self.subscriptions.drain() {
            self.send(msg);
        }
    }

    /// Take the effects produced since the last drain.
    #[must_use]
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Stop all subscriptions and discard pending timers.
    pub fn shutdown(mut self) {
        self.timers.clear();
        self.subscriptions.stop_all();
    }

    fn run(&mut self, mut queue: VecDeque<M::Message>, first: Cmd<M::Message>) {
        self.interpret(first, &mut queue);
        while let Some(msg) = queue.pop_front() {
            let cmd = self.model.update(msg);
            self.interpret(cmd, &mut queue);
        }
        self.subscriptions.reconcile(self.model.subscriptions());
    }

    fn interpret(&mut self, cmd: Cmd<M::Message>, queue: &mut VecDeque<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.interpret(cmd, queue);
                }
            }
            Cmd::Msg(msg) => queue.push_back(msg),
            Cmd::Tick { after, msg } => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.timers.push(ScheduledTick {
                    deadline: self.now + after,
                    seq,
                    msg,
                });
            }
            Cmd::ScrollTo { target } => {
                tracing::debug!(%target, "scroll-to effect requested");
                self.effects.push(Effect::ScrollTo { target });
            }
            Cmd::ApplyScroll { offset } => {
                self.effects.push(Effect::ApplyScroll { offset });
            }
        }
    }
}
