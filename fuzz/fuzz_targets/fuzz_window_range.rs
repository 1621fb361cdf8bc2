#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vlist_core::{ScrollWindow, WindowError, WindowSpec};

#[derive(Debug, Arbitrary)]
struct Input {
    item_count: u32,
    item_height: f64,
    viewport_height: f64,
    overscan: i16,
    offsets: Vec<f64>,
}

fuzz_target!(|input: Input| {
    let count = input.item_count as usize;
    let spec = match WindowSpec::new(count, input.item_height, input.viewport_height) {
        Ok(spec) => spec,
        Err(WindowError::NonPositiveItemHeight(h)) => {
            assert!(!(h.is_finite() && h > 0.0), "valid item height rejected: {h}");
            return;
        }
        Err(WindowError::NonPositiveViewportHeight(h)) => {
            assert!(!(h.is_finite() && h > 0.0), "valid viewport rejected: {h}");
            return;
        }
        Err(err) => panic!("unexpected construction error: {err}"),
    };
    let spec = match spec.try_with_overscan(i64::from(input.overscan)) {
        Ok(spec) => spec,
        Err(_) => {
            assert!(input.overscan < 0);
            return;
        }
    };
    let overscan = spec.overscan();

    let mut tracker = ScrollWindow::new(spec);
    for offset in input.offsets.into_iter().take(64) {
        let before = tracker.range();
        let changed = tracker.on_scroll(offset);
        let window = spec.window(offset);

        // Tracker and pure computation agree.
        assert_eq!(tracker.range(), window.range);
        assert_eq!(changed.is_some(), before != window.range);

        // Offset clamp.
        assert!(window.effective_offset >= 0.0);
        assert!(window.effective_offset <= spec.max_scroll_offset());

        // Range bounds.
        let range = window.range;
        assert!(range.start <= range.end);
        assert!(range.end <= count);
        assert_eq!(range.is_empty(), count == 0);
        if count > 0 {
            assert!(range.contains(window.first_visible));
            let bound = window
                .visible_count
                .saturating_add(overscan.saturating_mul(2))
                .saturating_add(1);
            assert!(range.len() <= bound);
        }
    }
});
