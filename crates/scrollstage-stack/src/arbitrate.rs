#![forbid(unsafe_code)]

//! Scroll arbitration between a panel's inner overflow and the outer stack.
//!
//! Called for the panel currently pinned *at rest* (its slot top aligned
//! with the viewport top). The rule is scroll chaining in the direction of
//! travel: the inner region consumes input while it still has room that way,
//! and hands the remainder to the outer scroll at its boundary. Every unit
//! of input is consumed exactly once — `inner + outer == delta` always, so
//! there are no dead zones and no double-scroll.
//!
//! The function is pure and total: feed it synthetic deltas in tests, no
//! layout engine required.

use serde::{Deserialize, Serialize};

/// How a scroll delta splits between a panel's inner region and the outer
/// stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arbitration {
    /// Signed pixels consumed by the inner overflow region.
    pub inner: f64,
    /// Signed pixels handed to the outer document scroll.
    pub outer: f64,
}

/// Split `delta` between inner overflow and outer scroll.
///
/// `inner_offset` is the inner region's current scroll position,
/// `inner_content_height` its full content height, `viewport_height` the
/// height of the visible slot. Positive deltas scroll downward.
///
/// Invariants:
/// - `inner + outer == delta` (exact; `outer` is computed by subtraction).
/// - `inner` never scrolls the region past its content
///   (`0 <= inner_offset + inner <= max(0, content - viewport)`).
/// - Non-finite input yields a no-op split.
#[must_use]
pub fn arbitrate(
    delta: f64,
    inner_offset: f64,
    inner_content_height: f64,
    viewport_height: f64,
) -> Arbitration {
    if !delta.is_finite() {
        return Arbitration {
            inner: 0.0,
            outer: 0.0,
        };
    }
    let overflow = (finite_or_zero(inner_content_height) - finite_or_zero(viewport_height)).max(0.0);
    let position = finite_or_zero(inner_offset).clamp(0.0, overflow);

    let inner = if delta >= 0.0 {
        delta.min(overflow - position)
    } else {
        delta.max(-position)
    };
    Arbitration {
        inner,
        outer: delta - inner,
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // --- forward (downward) ---

    #[test]
    fn forward_drains_inner_first() {
        // 1400px of content in a 600px slot: 800px of inner overflow.
        let arb = arbitrate(300.0, 0.0, 1400.0, 600.0);
        assert_eq!(arb.inner, 300.0);
        assert_eq!(arb.outer, 0.0);
    }

    #[test]
    fn forward_hands_remainder_to_outer_at_bottom() {
        let arb = arbitrate(300.0, 700.0, 1400.0, 600.0);
        assert_eq!(arb.inner, 100.0); // only 100px of overflow left
        assert_eq!(arb.outer, 200.0);
    }

    #[test]
    fn forward_with_no_overflow_is_all_outer() {
        let arb = arbitrate(250.0, 0.0, 600.0, 600.0);
        assert_eq!(arb.inner, 0.0);
        assert_eq!(arb.outer, 250.0);
    }

    #[test]
    fn forward_with_zero_content_is_all_outer() {
        let arb = arbitrate(250.0, 0.0, 0.0, 600.0);
        assert_eq!(arb.inner, 0.0);
        assert_eq!(arb.outer, 250.0);
    }

    // --- backward (upward) ---

    #[test]
    fn backward_unwinds_inner_first() {
        let arb = arbitrate(-150.0, 400.0, 1400.0, 600.0);
        assert_eq!(arb.inner, -150.0);
        assert_eq!(arb.outer, 0.0);
    }

    #[test]
    fn backward_hands_remainder_to_outer_at_top() {
        let arb = arbitrate(-500.0, 120.0, 1400.0, 600.0);
        assert_eq!(arb.inner, -120.0);
        assert_eq!(arb.outer, -380.0);
    }

    #[test]
    fn backward_with_inner_at_top_is_all_outer() {
        let arb = arbitrate(-90.0, 0.0, 1400.0, 600.0);
        assert_eq!(arb.inner, 0.0);
        assert_eq!(arb.outer, -90.0);
    }

    // --- degenerate input ---

    #[test]
    fn zero_delta_is_noop() {
        let arb = arbitrate(0.0, 100.0, 1400.0, 600.0);
        assert_eq!(arb.inner, 0.0);
        assert_eq!(arb.outer, 0.0);
    }

    #[test]
    fn out_of_range_inner_offset_is_clamped() {
        // Offset past the overflow (stale after a content shrink).
        let arb = arbitrate(50.0, 9000.0, 1400.0, 600.0);
        assert_eq!(arb.inner, 0.0);
        assert_eq!(arb.outer, 50.0);

        let arb = arbitrate(-50.0, -20.0, 1400.0, 600.0);
        assert_eq!(arb.inner, 0.0);
        assert_eq!(arb.outer, -50.0);
    }

    #[test]
    fn non_finite_delta_is_noop() {
        for delta in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let arb = arbitrate(delta, 0.0, 1400.0, 600.0);
            assert_eq!(arb.inner, 0.0);
            assert_eq!(arb.outer, 0.0);
        }
    }

    // --- properties ---

    proptest! {
        #[test]
        fn conservation_holds(
            delta in -1e6f64..1e6,
            offset in -1e3f64..1e6,
            content in -1e3f64..1e6,
            viewport in 0f64..1e4,
        ) {
            let arb = arbitrate(delta, offset, content, viewport);
            // Conserved up to one rounding of the reconstruction sum.
            prop_assert!((arb.inner + arb.outer - delta).abs() <= delta.abs() * 1e-12);
        }

        #[test]
        fn inner_stays_within_overflow(
            delta in -1e6f64..1e6,
            offset in 0f64..1e6,
            content in 0f64..1e6,
            viewport in 0f64..1e4,
        ) {
            let overflow = (content - viewport).max(0.0);
            let position = offset.clamp(0.0, overflow);
            let arb = arbitrate(delta, offset, content, viewport);
            let landed = position + arb.inner;
            prop_assert!((-1e-9..=overflow + 1e-9).contains(&landed));
        }

        #[test]
        fn inner_consumption_matches_direction(
            delta in -1e6f64..1e6,
            offset in 0f64..1e6,
            content in 0f64..1e6,
        ) {
            let arb = arbitrate(delta, offset, content, 600.0);
            if delta >= 0.0 {
                prop_assert!(arb.inner >= 0.0 && arb.outer >= 0.0);
            } else {
                prop_assert!(arb.inner <= 0.0 && arb.outer <= 0.0);
            }
        }
    }
}
