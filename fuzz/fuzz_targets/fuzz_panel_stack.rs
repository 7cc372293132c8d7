#![no_main]

use libfuzzer_sys::fuzz_target;
use scrollstage_stack::{PanelState, PanelStack};

fuzz_target!(|data: &[u8]| {
    // First byte picks the panel count (1..=8), the next bytes seed content
    // heights, the rest become wheel deltas.
    if data.len() < 2 {
        return;
    }
    let panel_count = (data[0] % 8) as usize + 1;
    if data.len() < 1 + panel_count {
        return;
    }
    let viewport = 600.0;
    let heights: Vec<f64> = data[1..=panel_count]
        .iter()
        .map(|b| f64::from(*b) * 8.0) // 0..2040px of content
        .collect();
    let mut stack = PanelStack::new(heights, viewport);

    for chunk in data[1 + panel_count..].chunks(2) {
        let raw = i16::from(chunk[0] as i8) * 16 + i16::from(*chunk.get(1).unwrap_or(&0) as i8);
        let delta = f64::from(raw);
        let out = stack.apply_wheel(delta);

        // Post-conditions that must always hold:
        assert!(
            (out.inner + out.outer + out.discarded - delta).abs() < 1e-6,
            "wheel delta not conserved"
        );
        assert!(
            stack.offset() >= 0.0 && stack.offset() <= stack.max_offset(),
            "outer offset escaped the stack"
        );

        let states: Vec<PanelState> = stack.snapshot().states;
        let pinned = states.iter().filter(|s| **s == PanelState::Pinned).count();
        assert_eq!(pinned, 1, "exactly one panel must be pinned");

        // Covered panels precede the pinned panel; Below panels follow it.
        let pinned_at = states
            .iter()
            .position(|s| *s == PanelState::Pinned)
            .unwrap();
        assert!(
            states[..pinned_at]
                .iter()
                .all(|s| *s == PanelState::Covered)
        );
        assert!(states[pinned_at + 1..].iter().all(|s| *s == PanelState::Below));
    }
});
