#![forbid(unsafe_code)]

//! The assembled single-page engine.
//!
//! [`PageModel`] wires the trackers, the panel stack, the boot gate, and the
//! scroll lock into one [`Model`] the host can drive with raw events. It
//! produces exactly the output signals chrome consumes — active section id,
//! scroll progress, per-panel states, boot progress — via
//! [`signals`](PageModel::signals).
//!
//! Navigation intents are fulfilled without a completion callback. Two
//! behaviors:
//!
//! - [`NavBehavior::Tween`] (default): the engine animates the offset itself.
//!   A frame ticker subscription runs only while a tween is live; each frame
//!   emits an `ApplyScroll` effect the host applies verbatim. The ticker is
//!   reconciled away the moment the tween settles.
//! - [`NavBehavior::Delegated`]: the engine emits one `ScrollTo` effect and
//!   lets the host's native smooth scrolling take over.
//!
//! While the boot gate holds the scroll lock, wheel input and navigation
//! intents are dropped — the page is not interactive yet.

use scrollstage_core::{
    Event, NavIntent, ProgressConfig, ProgressSnapshot, ScrollTween, SectionId,
};
use scrollstage_stack::{PanelStack, StackSnapshot};
use scrollstage_track::{
    ActiveSectionTracker, BandConfig, GeometrySource, ScrollProgressTracker, TrackError,
};
use web_time::{Duration, Instant};

use crate::boot::{BootProgress, BootSequence, BootSpec};
use crate::program::{Cmd, Model};
use crate::scroll_lock::ScrollLock;
use crate::subscription::{Every, SubId, Subscription};

/// Subscription id of the navigation frame ticker.
const NAV_FRAME_SUB: SubId = 0x4E41_5646; // "NAVF"

/// How navigation intents are fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavBehavior {
    /// Engine-driven tween emitting per-frame `ApplyScroll` effects.
    #[default]
    Tween,
    /// Single `ScrollTo` effect; the host animates.
    Delegated,
}

/// Assembly configuration for a page.
#[derive(Debug, Clone)]
pub struct PageConfig {
    /// Ordered section ids to track.
    pub sections: Vec<SectionId>,
    /// Active id before any section reports in-band.
    pub initial_section: SectionId,
    /// Trigger band placement.
    pub band: BandConfig,
    /// Progress derivation tuning.
    pub progress: ProgressConfig,
    /// Content heights of the stacked slide panels, in order.
    pub panel_heights: Vec<f64>,
    /// Duration of an engine-driven section scroll.
    pub scroll_duration: Duration,
    /// Frame interval of the engine-driven tween ticker.
    pub frame_interval: Duration,
    /// Navigation fulfillment.
    pub nav: NavBehavior,
    /// Boot gate, if the page wants one.
    pub boot: Option<BootSpec>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            initial_section: SectionId::from("hero"),
            band: BandConfig::default(),
            progress: ProgressConfig::default(),
            panel_heights: Vec::new(),
            scroll_duration: Duration::from_millis(600),
            frame_interval: Duration::from_millis(16),
            nav: NavBehavior::default(),
            boot: None,
        }
    }
}

/// Messages driving the page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageMsg {
    /// A raw host event.
    Host(Event),
    /// Chrome asked to scroll to a section.
    Nav(NavIntent),
    /// Boot progress timer fired.
    BootProgressTick,
    /// Boot message-rotation timer fired.
    BootMessageTick,
    /// Boot dismissal delay elapsed.
    BootFinalize,
}

impl From<Event> for PageMsg {
    fn from(event: Event) -> Self {
        Self::Host(event)
    }
}

/// The four output signals, snapshotted together.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSignals {
    /// Currently active section. Always defined.
    pub active_section: SectionId,
    /// Document scroll progress and threshold flag.
    pub progress: ProgressSnapshot,
    /// Panel stack states.
    pub stack: StackSnapshot,
    /// Boot state, `None` when the page has no boot gate.
    pub boot: Option<BootProgress>,
    /// Whether page scrolling is currently suspended.
    pub scroll_locked: bool,
}

/// The engine: trackers, stack, boot gate, and navigation, behind one model.
pub struct PageModel<G: GeometrySource> {
    geometry: G,
    tracker: ActiveSectionTracker,
    progress: ScrollProgressTracker,
    stack: PanelStack,
    boot: Option<BootSequence>,
    lock: ScrollLock,
    nav: NavBehavior,
    scroll_duration: Duration,
    frame_interval: Duration,
    pending_nav: Option<SectionId>,
    tween: Option<ScrollTween>,
}

impl<G: GeometrySource> PageModel<G> {
    /// Assemble a page over a geometry source.
    ///
    /// Acquires the scroll lock immediately when a boot gate is configured;
    /// the guard lives inside the boot sequence and is released when it
    /// finishes or is torn down.
    pub fn new(geometry: G, config: PageConfig, lock: ScrollLock) -> Result<Self, TrackError> {
        let tracker =
            ActiveSectionTracker::new(config.sections, config.initial_section, config.band)?;
        let progress = ScrollProgressTracker::global(config.progress);
        let stack = PanelStack::new(config.panel_heights, geometry.viewport().height);
        let boot = config
            .boot
            .map(|spec| BootSequence::new(spec, lock.acquire()));
        Ok(Self {
            geometry,
            tracker,
            progress,
            stack,
            boot,
            lock,
            nav: config.nav,
            scroll_duration: config.scroll_duration,
            frame_interval: config.frame_interval,
            pending_nav: None,
            tween: None,
        })
    }

    /// The geometry source.
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Mutable geometry access, for hosts that push layout into the source.
    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    /// The panel stack.
    pub fn stack(&self) -> &PanelStack {
        &self.stack
    }

    /// The boot sequence, while one exists.
    pub fn boot(&self) -> Option<&BootSequence> {
        self.boot.as_ref()
    }

    /// Whether an engine-driven scroll is currently animating.
    pub fn is_navigating(&self) -> bool {
        self.tween.is_some() || self.pending_nav.is_some()
    }

    /// Snapshot every output signal.
    pub fn signals(&self) -> PageSignals {
        PageSignals {
            active_section: self.tracker.active_id().clone(),
            progress: self.progress.snapshot(),
            stack: self.stack.snapshot(),
            boot: self.boot.as_ref().map(BootSequence::progress),
            scroll_locked: self.lock.is_locked(),
        }
    }

    fn handle_host_event(&mut self, event: Event) -> Cmd<PageMsg> {
        // Trackers ignore event kinds that are not theirs.
        self.tracker.handle_event(&event, &self.geometry);
        self.progress.handle_event(&event, &self.geometry);

        match event {
            Event::Wheel { delta } => {
                if self.lock.is_locked() {
                    tracing::trace!(delta, "wheel dropped: scroll suspended");
                    return Cmd::none();
                }
                // User input takes over from any programmatic scroll.
                self.pending_nav = None;
                self.tween = None;
                self.stack.apply_wheel(delta);
                Cmd::none()
            }
            Event::Resized(metrics) => {
                self.stack.set_viewport(metrics.height);
                Cmd::none()
            }
            Event::Tick { now } => self.step_navigation(now),
            Event::Scrolled { .. } | Event::ContentResized { .. } => Cmd::none(),
        }
    }

    fn handle_nav(&mut self, intent: NavIntent) -> Cmd<PageMsg> {
        if self.lock.is_locked() {
            tracing::trace!(target = %intent.target, "nav dropped: scroll suspended");
            return Cmd::none();
        }
        match self.nav {
            NavBehavior::Delegated => Cmd::scroll_to(intent.target),
            NavBehavior::Tween => {
                // Resolution happens on the next frame so a section that is
                // still mounting gets its one retry for free.
                self.pending_nav = Some(intent.target);
                self.tween = None;
                Cmd::none()
            }
        }
    }

    /// Advance the engine-driven scroll by one frame.
    fn step_navigation(&mut self, now: Instant) -> Cmd<PageMsg> {
        if let Some(target) = self.pending_nav.take() {
            let Some(rect) = self.geometry.region_rect(&target) else {
                // Fire-and-forget: an unmounted target drops the intent.
                tracing::debug!(%target, "nav target not mounted, intent dropped");
                return Cmd::none();
            };
            let viewport = self.geometry.viewport();
            let from = viewport.scroll_y;
            let to = (from + rect.top()).clamp(0.0, viewport.max_scroll());
            tracing::debug!(%target, from, to, "smooth scroll started");
            self.tween = Some(ScrollTween::new(from, to, self.scroll_duration, now));
        }
        let Some(tween) = self.tween else {
            return Cmd::none();
        };
        let offset = tween.position_at(now);
        if tween.is_complete(now) {
            tracing::debug!(offset, "smooth scroll settled");
            self.tween = None;
        }
        Cmd::apply_scroll(offset)
    }
}

impl<G: GeometrySource> Model for PageModel<G> {
    type Message = PageMsg;

    fn init(&mut self) -> Cmd<PageMsg> {
        let Some(boot) = &self.boot else {
            return Cmd::none();
        };
        let config = boot.config();
        Cmd::batch(vec![
            Cmd::tick(config.progress_interval, PageMsg::BootProgressTick),
            Cmd::tick(config.message_interval, PageMsg::BootMessageTick),
        ])
    }

    fn update(&mut self, msg: PageMsg) -> Cmd<PageMsg> {
        match msg {
            PageMsg::Host(event) => self.handle_host_event(event),
            PageMsg::Nav(intent) => self.handle_nav(intent),
            PageMsg::BootProgressTick => {
                let Some(boot) = &mut self.boot else {
                    return Cmd::none();
                };
                let config = *boot.config();
                if boot.advance_progress() {
                    Cmd::tick(config.completion_delay, PageMsg::BootFinalize)
                } else if boot.phase() == crate::boot::BootPhase::Running {
                    Cmd::tick(config.progress_interval, PageMsg::BootProgressTick)
                } else {
                    Cmd::none()
                }
            }
            PageMsg::BootMessageTick => {
                let Some(boot) = &mut self.boot else {
                    return Cmd::none();
                };
                let config = *boot.config();
                if boot.phase() == crate::boot::BootPhase::Running {
                    boot.advance_message();
                    Cmd::tick(config.message_interval, PageMsg::BootMessageTick)
                } else {
                    Cmd::none()
                }
            }
            PageMsg::BootFinalize => {
                if let Some(boot) = &mut self.boot {
                    boot.finish();
                }
                Cmd::none()
            }
        }
    }

    fn subscriptions(&self) -> Vec<Box<dyn Subscription<PageMsg>>> {
        if !self.is_navigating() {
            return Vec::new();
        }
        vec![Box::new(Every::with_id(
            NAV_FRAME_SUB,
            self.frame_interval,
            || {
                PageMsg::Host(Event::Tick {
                    now: Instant::now(),
                })
            },
        ))]
    }
}
