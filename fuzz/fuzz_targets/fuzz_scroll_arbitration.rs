#![no_main]

use libfuzzer_sys::fuzz_target;
use scrollstage_stack::arbitrate;

fuzz_target!(|data: (f64, f64, f64, f64)| {
    let (delta, inner_offset, content, viewport) = data;
    let arb = arbitrate(delta, inner_offset, content, viewport);

    // Post-conditions that must always hold:
    if delta.is_finite() {
        let reconstructed = arb.inner + arb.outer;
        assert!(
            (reconstructed - delta).abs() <= delta.abs() * 1e-12,
            "delta not conserved: {reconstructed} vs {delta}"
        );
    } else {
        assert_eq!(arb.inner, 0.0);
        assert_eq!(arb.outer, 0.0);
    }

    // Inner consumption never exceeds the overflow range.
    let overflow = if content.is_finite() && viewport.is_finite() {
        (content - viewport).max(0.0)
    } else {
        0.0
    };
    let position = if inner_offset.is_finite() {
        inner_offset.clamp(0.0, overflow)
    } else {
        0.0
    };
    let landed = position + arb.inner;
    assert!(
        landed >= -1e-9 && landed <= overflow + 1e-9,
        "inner position escaped its bounds: {landed} vs {overflow}"
    );

    // Consumption is direction-consistent.
    if delta.is_finite() {
        if delta >= 0.0 {
            assert!(arb.inner >= 0.0 && arb.outer >= 0.0);
        } else {
            assert!(arb.inner <= 0.0 && arb.outer <= 0.0);
        }
    }
});
