#![forbid(unsafe_code)]

//! Input coalescing for high-frequency host events.
//!
//! Scroll listeners and resize observers can fire many times between frames,
//! particularly during trackpad momentum. Without coalescing, each event
//! triggers a full tracker re-evaluation. [`InputCoalescer`] batches the
//! coalescable kinds so the runtime processes at most one of each per frame:
//!
//! - Scroll offsets and viewport/content resizes: latest value wins.
//! - Wheel deltas: summed, so arbitration sees one combined delta.
//! - Ticks: pass through immediately (they are already frame-paced).
//!
//! The caller drains pending events once per frame via [`flush`](InputCoalescer::flush).

use crate::event::Event;
use crate::geometry::ViewportMetrics;

/// Coalesces host events between frames.
///
/// Not thread-safe; owned by the single event-processing loop. All
/// operations are O(1) and the coalescer holds at most four pending events.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputCoalescer {
    /// Latest document scroll offset, if any arrived this frame.
    pending_scroll: Option<f64>,

    /// Latest viewport metrics, if a resize arrived this frame.
    pending_resize: Option<ViewportMetrics>,

    /// Latest content height, if a content resize arrived this frame.
    pending_content: Option<f64>,

    /// Accumulated wheel delta this frame.
    wheel_delta: f64,
    wheel_events: u32,
}

impl InputCoalescer {
    /// Create an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event.
    ///
    /// Returns `Some(event)` if the event should be processed immediately,
    /// or `None` if it was absorbed into the pending set.
    pub fn push(&mut self, event: Event) -> Option<Event> {
        match event {
            Event::Scrolled { offset } => {
                self.pending_scroll = Some(offset);
                None
            }
            Event::Resized(metrics) => {
                self.pending_resize = Some(metrics);
                None
            }
            Event::ContentResized { content_height } => {
                self.pending_content = Some(content_height);
                None
            }
            Event::Wheel { delta } => {
                self.wheel_delta += delta;
                self.wheel_events += 1;
                None
            }
            tick @ Event::Tick { .. } => Some(tick),
        }
    }

    /// Whether anything is pending.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending_scroll.is_some()
            || self.pending_resize.is_some()
            || self.pending_content.is_some()
            || self.wheel_events > 0
    }

    /// Drain pending events for this frame and reset.
    ///
    /// Order matters for consumers: resize first (it invalidates geometry),
    /// then content growth, then the settled scroll offset, then the combined
    /// wheel delta.
    pub fn flush(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        if let Some(metrics) = self.pending_resize.take() {
            out.push(Event::Resized(metrics));
        }
        if let Some(content_height) = self.pending_content.take() {
            out.push(Event::ContentResized { content_height });
        }
        if let Some(offset) = self.pending_scroll.take() {
            out.push(Event::Scrolled { offset });
        }
        if self.wheel_events > 0 {
            out.push(Event::Wheel {
                delta: self.wheel_delta,
            });
            self.wheel_delta = 0.0;
            self.wheel_events = 0;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let c = InputCoalescer::new();
        assert!(!c.has_pending());
    }

    #[test]
    fn scroll_latest_wins() {
        let mut c = InputCoalescer::new();
        assert!(c.push(Event::Scrolled { offset: 10.0 }).is_none());
        assert!(c.push(Event::Scrolled { offset: 250.0 }).is_none());

        let flushed = c.flush();
        assert_eq!(flushed, vec![Event::Scrolled { offset: 250.0 }]);
        assert!(!c.has_pending());
    }

    #[test]
    fn wheel_deltas_accumulate() {
        let mut c = InputCoalescer::new();
        c.push(Event::Wheel { delta: 12.0 });
        c.push(Event::Wheel { delta: 30.0 });
        c.push(Event::Wheel { delta: -2.0 });

        let flushed = c.flush();
        assert_eq!(flushed, vec![Event::Wheel { delta: 40.0 }]);
    }

    #[test]
    fn tick_passes_through() {
        let mut c = InputCoalescer::new();
        let tick = Event::Tick {
            now: web_time::Instant::now(),
        };
        assert_eq!(c.push(tick), Some(tick));
        assert!(!c.has_pending());
    }

    #[test]
    fn flush_order_is_resize_content_scroll_wheel() {
        let mut c = InputCoalescer::new();
        c.push(Event::Wheel { delta: 5.0 });
        c.push(Event::Scrolled { offset: 100.0 });
        c.push(Event::ContentResized {
            content_height: 4000.0,
        });
        c.push(Event::Resized(ViewportMetrics::new(800.0, 600.0, 4000.0)));

        let kinds: Vec<_> = c
            .flush()
            .into_iter()
            .map(|e| match e {
                Event::Resized(_) => "resize",
                Event::ContentResized { .. } => "content",
                Event::Scrolled { .. } => "scroll",
                Event::Wheel { .. } => "wheel",
                Event::Tick { .. } => "tick",
            })
            .collect();
        assert_eq!(kinds, vec!["resize", "content", "scroll", "wheel"]);
    }

    #[test]
    fn flush_resets() {
        let mut c = InputCoalescer::new();
        c.push(Event::Wheel { delta: 5.0 });
        let _ = c.flush();
        assert!(c.flush().is_empty());
    }
}
