#![forbid(unsafe_code)]

//! Subscription system for continuous event sources.
//!
//! Subscriptions are the declarative half of the runtime's timer story: the
//! model returns the set it currently wants (a frame ticker while a scroll
//! tween runs, nothing once it settles), and the runtime reconciles that set
//! after every update — new ones start, dropped ones stop, unchanged ones
//! keep running. One-shot delays use [`Cmd::tick`](crate::Cmd::tick)
//! instead.
//!
//! Cancellation is the point of this module. Every running subscription
//! carries a stop signal that is triggered when it leaves the declared set
//! and again when the manager drops, so no tick can arrive for a model that
//! no longer wants it.

use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use web_time::Duration;

/// Unique identifier for a subscription.
///
/// The runtime deduplicates by id across update cycles: declaring the same
/// id twice keeps the existing source running instead of restarting it.
pub type SubId = u64;

/// A continuous source of messages.
///
/// `run` is called on a background thread and should loop until the stop
/// signal fires or the channel disconnects.
pub trait Subscription<M: Send + 'static>: Send {
    /// Stable identifier for reconciliation.
    fn id(&self) -> SubId;

    /// Produce messages until stopped.
    fn run(&self, sender: mpsc::Sender<M>, stop: StopSignal);
}

/// Observer side of a stop request.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    fn new() -> (Self, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        (
            Self {
                inner: Arc::clone(&inner),
            },
            StopTrigger { inner },
        )
    }

    /// Whether a stop has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Block until stopped or until `duration` elapses.
    ///
    /// Returns `true` when stopped. This is the idiomatic tick loop: wait
    /// for one interval, bail if stopped, emit otherwise.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(|e| e.into_inner());
        if *stopped {
            return true;
        }
        let result = cvar
            .wait_timeout(stopped, duration)
            .unwrap_or_else(|e| e.into_inner());
        stopped = result.0;
        *stopped
    }
}

/// Control side of a stop request.
struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(|e| e.into_inner());
        *stopped = true;
        cvar.notify_all();
    }
}

struct RunningSubscription {
    id: SubId,
    trigger: StopTrigger,
    thread: Option<thread::JoinHandle<()>>,
}

impl RunningSubscription {
    fn stop(mut self) {
        self.trigger.stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RunningSubscription {
    fn drop(&mut self) {
        // Signal without joining: drop must not block the update loop.
        self.trigger.stop();
    }
}

/// Owns running subscriptions and the channel they feed.
pub(crate) struct SubscriptionManager<M: Send + 'static> {
    active: Vec<RunningSubscription>,
    sender: mpsc::Sender<M>,
    receiver: mpsc::Receiver<M>,
}

impl<M: Send + 'static> SubscriptionManager<M> {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            active: Vec::new(),
            sender,
            receiver,
        }
    }

    /// Reconcile the running set against the model's declared set.
    ///
    /// Declared-but-not-running starts; running-but-not-declared stops (and
    /// joins); running-and-declared is left alone. Duplicate declared ids
    /// keep the first instance.
    pub(crate) fn reconcile(&mut self, declared: Vec<Box<dyn Subscription<M>>>) {
        let declared_ids: HashSet<SubId> = declared.iter().map(|s| s.id()).collect();

        let mut kept = Vec::new();
        for running in self.active.drain(..) {
            if declared_ids.contains(&running.id) {
                kept.push(running);
            } else {
                tracing::debug!(sub_id = running.id, "stopping subscription");
                running.stop();
            }
        }
        self.active = kept;

        let mut live_ids: HashSet<SubId> = self.active.iter().map(|r| r.id).collect();
        for sub in declared {
            let id = sub.id();
            if !live_ids.insert(id) {
                continue;
            }
            tracing::debug!(sub_id = id, "starting subscription");
            let (signal, trigger) = StopSignal::new();
            let sender = self.sender.clone();
            let thread = thread::spawn(move || sub.run(sender, signal));
            self.active.push(RunningSubscription {
                id,
                trigger,
                thread: Some(thread),
            });
        }
    }

    /// Drain messages produced since the last call.
    pub(crate) fn drain(&self) -> Vec<M> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.receiver.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Stop and join everything.
    pub(crate) fn stop_all(&mut self) {
        for running in self.active.drain(..) {
            running.stop();
        }
    }
}

impl<M: Send + 'static> Drop for SubscriptionManager<M> {
    fn drop(&mut self) {
        self.stop_all();
    }
}

// --- Built-in subscriptions ---

/// Fires a message at a fixed interval.
///
/// The default id is derived from the interval; give concurrent same-interval
/// tickers distinct ids with [`with_id`](Every::with_id).
pub struct Every<M: Send + 'static> {
    id: SubId,
    interval: Duration,
    make_msg: Box<dyn Fn() -> M + Send + Sync>,
}

impl<M: Send + 'static> Every<M> {
    /// Tick every `interval`, producing `make_msg()`.
    pub fn new(interval: Duration, make_msg: impl Fn() -> M + Send + Sync + 'static) -> Self {
        let id = (interval.as_nanos() as u64) ^ 0x4652_414D; // "FRAM"
        Self::with_id(id, interval, make_msg)
    }

    /// Tick with an explicit id.
    pub fn with_id(
        id: SubId,
        interval: Duration,
        make_msg: impl Fn() -> M + Send + Sync + 'static,
    ) -> Self {
        Self {
            id,
            interval,
            make_msg: Box::new(make_msg),
        }
    }
}

impl<M: Send + 'static> Subscription<M> for Every<M> {
    fn id(&self) -> SubId {
        self.id
    }

    fn run(&self, sender: mpsc::Sender<M>, stop: StopSignal) {
        loop {
            if stop.wait_timeout(self.interval) {
                break;
            }
            if sender.send((self.make_msg)()).is_err() {
                break;
            }
        }
    }
}

/// Test double: emits a fixed message list immediately, then ends.
pub struct MockSubscription<M: Send + 'static> {
    id: SubId,
    messages: Vec<M>,
}

impl<M: Send + Clone + 'static> MockSubscription<M> {
    /// Create a mock that sends `messages` once.
    #[must_use]
    pub fn new(id: SubId, messages: Vec<M>) -> Self {
        Self { id, messages }
    }
}

impl<M: Send + Clone + 'static> Subscription<M> for MockSubscription<M> {
    fn id(&self) -> SubId {
        self.id
    }

    fn run(&self, sender: mpsc::Sender<M>, _stop: StopSignal) {
        for msg in &self.messages {
            if sender.send(msg.clone()).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum TestMsg {
        Frame,
        Value(u32),
    }

    #[test]
    fn stop_signal_round_trip() {
        let (signal, trigger) = StopSignal::new();
        assert!(!signal.is_stopped());
        trigger.stop();
        assert!(signal.is_stopped());
        assert!(signal.wait_timeout(Duration::from_millis(50)));
    }

    #[test]
    fn stop_signal_times_out_when_not_stopped() {
        let (signal, _trigger) = StopSignal::new();
        assert!(!signal.wait_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn mock_emits_queued_messages() {
        let sub = MockSubscription::new(1, vec![TestMsg::Value(1), TestMsg::Value(2)]);
        let (tx, rx) = mpsc::channel();
        let (signal, _trigger) = StopSignal::new();
        sub.run(tx, signal);
        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(got, vec![TestMsg::Value(1), TestMsg::Value(2)]);
    }

    #[test]
    fn every_fires_until_stopped() {
        let sub = Every::new(Duration::from_millis(5), || TestMsg::Frame);
        let (tx, rx) = mpsc::channel();
        let (signal, trigger) = StopSignal::new();
        let handle = thread::spawn(move || sub.run(tx, signal));

        thread::sleep(Duration::from_millis(40));
        trigger.stop();
        handle.join().unwrap();

        let got: Vec<_> = rx.try_iter().collect();
        assert!(!got.is_empty());
        assert!(got.iter().all(|m| *m == TestMsg::Frame));
    }

    #[test]
    fn every_ids_are_stable_per_interval() {
        let a = Every::<TestMsg>::new(Duration::from_millis(16), || TestMsg::Frame);
        let b = Every::<TestMsg>::new(Duration::from_millis(16), || TestMsg::Frame);
        let c = Every::<TestMsg>::new(Duration::from_millis(80), || TestMsg::Frame);
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn manager_starts_and_drains() {
        let mut mgr = SubscriptionManager::<TestMsg>::new();
        mgr.reconcile(vec![Box::new(MockSubscription::new(
            1,
            vec![TestMsg::Value(7)],
        ))]);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(mgr.drain(), vec![TestMsg::Value(7)]);
    }

    #[test]
    fn manager_dedupes_declared_ids() {
        let mut mgr = SubscriptionManager::<TestMsg>::new();
        mgr.reconcile(vec![
            Box::new(MockSubscription::new(3, vec![TestMsg::Value(1)])),
            Box::new(MockSubscription::new(3, vec![TestMsg::Value(2)])),
        ]);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(mgr.drain(), vec![TestMsg::Value(1)]);
    }

    #[test]
    fn reconcile_with_empty_set_stops_ticker() {
        let mut mgr = SubscriptionManager::<TestMsg>::new();
        mgr.reconcile(vec![Box::new(Every::with_id(
            9,
            Duration::from_millis(5),
            || TestMsg::Frame,
        ))]);
        thread::sleep(Duration::from_millis(25));
        assert!(!mgr.drain().is_empty());

        mgr.reconcile(vec![]);
        thread::sleep(Duration::from_millis(10));
        let _ = mgr.drain(); // buffered leftovers

        thread::sleep(Duration::from_millis(30));
        assert!(mgr.drain().is_empty(), "ticks after reconcile-away");
    }

    #[test]
    fn reconcile_keeps_unchanged_id_running() {
        let mut mgr = SubscriptionManager::<TestMsg>::new();
        let make = || {
            Box::new(Every::with_id(4, Duration::from_millis(5), || {
                TestMsg::Frame
            })) as Box<dyn Subscription<TestMsg>>
        };
        mgr.reconcile(vec![make()]);
        thread::sleep(Duration::from_millis(25));
        let _ = mgr.drain();

        mgr.reconcile(vec![make()]);
        thread::sleep(Duration::from_millis(25));
        assert!(!mgr.drain().is_empty());
    }

    #[test]
    fn stop_all_silences_everything() {
        let mut mgr = SubscriptionManager::<TestMsg>::new();
        mgr.reconcile(vec![
            Box::new(Every::with_id(1, Duration::from_millis(5), || {
                TestMsg::Value(1)
            })),
            Box::new(Every::with_id(2, Duration::from_millis(5), || {
                TestMsg::Value(2)
            })),
        ]);
        thread::sleep(Duration::from_millis(20));
        mgr.stop_all();
        let _ = mgr.drain();
        thread::sleep(Duration::from_millis(30));
        assert!(mgr.drain().is_empty());
    }
}
