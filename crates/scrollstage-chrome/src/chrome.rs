#![forbid(unsafe_code)]

//! Header, dock, and footer view-model.
//!
//! [`NavigationChrome`] folds [`PageSignals`] into render-ready state. The
//! derivation is pure; calling [`observe`](NavigationChrome::observe) twice
//! with the same signals reports no change, so hosts can re-render only when
//! something actually moved.

use ahash::AHashMap;
use scrollstage_core::{NavIntent, SectionId};
use scrollstage_runtime::PageSignals;

/// Chrome tuning.
#[derive(Debug, Clone)]
pub struct ChromeConfig {
    /// Dock entries, in display order. Usually the tracked section list.
    pub dock_sections: Vec<SectionId>,
}

impl ChromeConfig {
    /// Chrome over the given dock entries.
    #[must_use]
    pub fn new(dock_sections: impl IntoIterator<Item = SectionId>) -> Self {
        Self {
            dock_sections: dock_sections.into_iter().collect(),
        }
    }
}

/// Render-ready chrome state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromeState {
    /// Header switches to its condensed treatment once the page has
    /// scrolled at all.
    pub header_condensed: bool,
    /// Dock is hidden while the boot overlay still gates interaction.
    pub dock_visible: bool,
    /// Index into the dock entries for the active section, when it has one.
    pub active_nav: Option<usize>,
    /// Footer progress meter, `[0, 1]`.
    pub footer_progress: f64,
    /// Whether the boot overlay is on screen.
    pub boot_overlay_visible: bool,
}

impl Default for ChromeState {
    fn default() -> Self {
        Self {
            header_condensed: false,
            dock_visible: true,
            active_nav: None,
            footer_progress: 0.0,
            boot_overlay_visible: false,
        }
    }
}

/// The chrome view-model.
pub struct NavigationChrome {
    config: ChromeConfig,
    nav_index: AHashMap<SectionId, usize>,
    state: ChromeState,
}

impl NavigationChrome {
    /// Build chrome from its config.
    #[must_use]
    pub fn new(config: ChromeConfig) -> Self {
        let nav_index = config
            .dock_sections
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index))
            .collect();
        Self {
            config,
            nav_index,
            state: ChromeState::default(),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &ChromeState {
        &self.state
    }

    /// Fold a signals snapshot into chrome state.
    ///
    /// Returns the new state when anything changed, `None` otherwise.
    pub fn observe(&mut self, signals: &PageSignals) -> Option<&ChromeState> {
        let boot_active = signals
            .boot
            .as_ref()
            .is_some_and(|boot| !boot.is_complete);
        let next = ChromeState {
            header_condensed: signals.progress.past_threshold,
            dock_visible: !boot_active,
            active_nav: self.nav_index.get(&signals.active_section).copied(),
            footer_progress: signals.progress.ratio,
            boot_overlay_visible: boot_active,
        };
        if next == self.state {
            return None;
        }
        self.state = next;
        Some(&self.state)
    }

    /// Translate a dock click into a navigation intent.
    ///
    /// Out-of-range indices return `None`; chrome never fabricates targets.
    #[must_use]
    pub fn nav_intent(&self, index: usize) -> Option<NavIntent> {
        self.config
            .dock_sections
            .get(index)
            .map(|target| NavIntent {
                target: target.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollstage_core::ProgressSnapshot;
    use scrollstage_runtime::BootProgress;
    use scrollstage_stack::StackSnapshot;

    fn signals(ratio: f64, active: &str, boot: Option<BootProgress>) -> PageSignals {
        PageSignals {
            active_section: active.into(),
            progress: ProgressSnapshot {
                ratio,
                past_threshold: ratio > 0.01,
            },
            stack: StackSnapshot {
                offset: 0.0,
                pinned: None,
                states: Vec::new(),
            },
            boot,
            scroll_locked: boot.is_some_and(|b| !b.is_complete),
        }
    }

    fn chrome() -> NavigationChrome {
        NavigationChrome::new(ChromeConfig::new([
            SectionId::from("hero"),
            SectionId::from("projects"),
            SectionId::from("contact"),
        ]))
    }

    #[test]
    fn condenses_header_after_scroll_threshold() {
        let mut chrome = chrome();
        let state = chrome.observe(&signals(0.2, "hero", None)).unwrap();
        assert!(state.header_condensed);
        assert!((state.footer_progress - 0.2).abs() < 1e-12);
    }

    #[test]
    fn at_rest_header_is_expanded() {
        let mut chrome = chrome();
        // Default state already matches an at-rest page with no boot gate.
        assert!(chrome.observe(&signals(0.0, "hero", None)).is_none());
        assert!(!chrome.state().header_condensed);
    }

    #[test]
    fn active_section_maps_to_dock_index() {
        let mut chrome = chrome();
        let state = chrome.observe(&signals(0.5, "projects", None)).unwrap();
        assert_eq!(state.active_nav, Some(1));
    }

    #[test]
    fn unknown_active_section_clears_highlight() {
        let mut chrome = chrome();
        chrome.observe(&signals(0.5, "projects", None));
        let state = chrome.observe(&signals(0.5, "colophon", None)).unwrap();
        assert_eq!(state.active_nav, None);
    }

    #[test]
    fn boot_overlay_hides_dock_until_complete() {
        let mut chrome = chrome();
        let running = BootProgress {
            percent: 40.0,
            message_index: 1,
            is_complete: false,
        };
        let state = chrome.observe(&signals(0.0, "hero", Some(running))).unwrap();
        assert!(state.boot_overlay_visible);
        assert!(!state.dock_visible);

        let done = BootProgress {
            percent: 100.0,
            message_index: 4,
            is_complete: true,
        };
        let state = chrome.observe(&signals(0.0, "hero", Some(done))).unwrap();
        assert!(!state.boot_overlay_visible);
        assert!(state.dock_visible);
    }

    #[test]
    fn unchanged_signals_report_no_change() {
        let mut chrome = chrome();
        assert!(chrome.observe(&signals(0.3, "projects", None)).is_some());
        assert!(chrome.observe(&signals(0.3, "projects", None)).is_none());
    }

    #[test]
    fn dock_click_yields_intent() {
        let chrome = chrome();
        let intent = chrome.nav_intent(2).unwrap();
        assert_eq!(intent.target.as_str(), "contact");
        assert!(chrome.nav_intent(9).is_none());
    }
}
